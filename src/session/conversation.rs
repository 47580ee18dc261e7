//! Conversational session
//!
//! Owns the turn log and the single reveal scheduler. Assistant turns move
//! pending → revealing → settled; at most one turn is revealing, and starting
//! a new reveal settles the previous one on the spot.

use crate::audio::AudioHandle;
use crate::messages::{ConversationTurn, RevealState, TurnLog};
use crate::session::reveal::{RevealScheduler, RevealStep, DEFAULT_TYPING_INTERVAL};
use crate::session::scroll::ScrollRequest;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub struct ConversationSession {
    log: TurnLog,
    reveal: Option<RevealScheduler>,
    interval: Duration,
    initial_turn: Option<Uuid>,
    epoch: u64,
    scroll: Option<ScrollRequest>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_INTERVAL)
    }
}

impl ConversationSession {
    pub fn new(interval: Duration) -> Self {
        Self {
            log: TurnLog::new(),
            reveal: None,
            interval,
            initial_turn: None,
            epoch: 0,
            scroll: None,
        }
    }

    /// Changes whenever the conversation is replaced or discarded
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.log.get_all()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn turn(&self, id: Uuid) -> Option<ConversationTurn> {
        self.log.get(id)
    }

    /// Start a new conversation with `text` as its initial narrative
    pub fn begin_initial(
        &mut self,
        text: impl Into<String>,
        audio: Option<AudioHandle>,
        now: Instant,
    ) -> Uuid {
        self.settle_revealing();
        self.log.clear();
        self.epoch += 1;

        let id = self.append_assistant(text.into(), audio, now);
        self.initial_turn = Some(id);
        debug!("Conversation {} started with turn {}", self.epoch, id);
        id
    }

    pub fn push_user_turn(&mut self, text: impl Into<String>) -> Uuid {
        let turn = ConversationTurn::user(text);
        let id = turn.id;
        self.log.push(turn);
        self.request_scroll(ScrollRequest::Bottom);
        id
    }

    pub fn push_assistant_turn(
        &mut self,
        text: impl Into<String>,
        audio: Option<AudioHandle>,
        now: Instant,
    ) -> Uuid {
        self.settle_revealing();
        self.append_assistant(text.into(), audio, now)
    }

    fn append_assistant(&mut self, text: String, audio: Option<AudioHandle>, now: Instant) -> Uuid {
        let turn = ConversationTurn::assistant(text, audio);
        let id = turn.id;
        self.request_scroll(ScrollRequest::Bottom);

        if turn.text.is_empty() {
            self.log.push(turn);
            self.log.set_reveal(id, RevealState::Settled, 0);
            return id;
        }

        let scheduler = RevealScheduler::new(id, &turn.text, self.interval, now);
        self.log.push(turn);
        self.log.set_reveal(id, RevealState::Revealing, 0);
        self.reveal = Some(scheduler);
        id
    }

    /// Cancel the running reveal and show its turn in full
    fn settle_revealing(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            reveal.cancel();
            let id = reveal.turn_id();
            debug!("Settling turn {} early", id);
            self.log.set_reveal(id, RevealState::Settled, reveal.total_chars());
        }
    }

    pub fn revealing_turn(&self) -> Option<Uuid> {
        self.reveal
            .as_ref()
            .filter(|r| r.is_active())
            .map(|r| r.turn_id())
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing_turn().is_some()
    }

    /// Reveal one more character of the current turn
    pub fn tick(&mut self) -> RevealStep {
        let Some(reveal) = self.reveal.as_mut() else {
            return RevealStep::Idle;
        };
        let step = reveal.tick();
        let id = reveal.turn_id();
        match step {
            RevealStep::Revealed(n) => {
                self.log.set_reveal(id, RevealState::Revealing, n);
                self.request_scroll(ScrollRequest::Reveal(n));
            }
            RevealStep::Finished(n) => {
                self.log.set_reveal(id, RevealState::Settled, n);
                self.reveal = None;
                self.request_scroll(ScrollRequest::Bottom);
            }
            RevealStep::Idle => {}
        }
        step
    }

    /// Apply every tick due by `now`; returns how many characters appeared
    pub fn advance(&mut self, now: Instant) -> usize {
        let due = match self.reveal.as_mut() {
            Some(reveal) => reveal.due_ticks(now),
            None => return 0,
        };
        (0..due)
            .take_while(|_| self.tick() != RevealStep::Idle)
            .count()
    }

    /// `Bottom` outranks a reveal step until the view takes it
    fn request_scroll(&mut self, request: ScrollRequest) {
        if self.scroll != Some(ScrollRequest::Bottom) {
            self.scroll = Some(request);
        }
    }

    /// Scroll work left over since the last frame; cleared by the call
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll.take()
    }

    /// The first assistant turn of this conversation
    pub fn initial_narrative(&self) -> Option<ConversationTurn> {
        self.initial_turn.and_then(|id| self.log.get(id))
    }

    /// Audio for the headline player, once the initial narrative has settled
    pub fn headline_audio(&self) -> Option<(Uuid, AudioHandle)> {
        let turn = self.initial_narrative()?;
        if !turn.audio_visible() {
            return None;
        }
        turn.audio.map(|audio| (turn.id, audio))
    }

    /// Drop the whole conversation
    pub fn reset(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            reveal.cancel();
        }
        self.log.clear();
        self.initial_turn = None;
        self.scroll = None;
        self.epoch += 1;
    }
}
