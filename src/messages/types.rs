use crate::audio::AudioHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// Typewriter progress of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    Pending,
    Revealing,
    Settled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub audio: Option<AudioHandle>,
    pub reveal_state: RevealState,
    /// Characters currently on screen
    pub revealed_chars: usize,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    /// A user question; shown in full immediately
    pub fn user(text: impl Into<String>) -> Self {
        let text = text.into();
        let revealed_chars = text.chars().count();
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text,
            audio: None,
            reveal_state: RevealState::Settled,
            revealed_chars,
            created_at: Utc::now(),
        }
    }

    /// An assistant answer waiting to be revealed
    pub fn assistant(text: impl Into<String>, audio: Option<AudioHandle>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Assistant,
            text: text.into(),
            audio,
            reveal_state: RevealState::Pending,
            revealed_chars: 0,
            created_at: Utc::now(),
        }
    }

    pub fn visible_text(&self) -> String {
        match self.reveal_state {
            RevealState::Settled => self.text.clone(),
            _ => self.text.chars().take(self.revealed_chars).collect(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.reveal_state == RevealState::Settled
    }

    /// The audio player is shown only after the text has fully appeared
    pub fn audio_visible(&self) -> bool {
        self.is_settled() && self.audio.is_some() && !self.text.is_empty()
    }
}
