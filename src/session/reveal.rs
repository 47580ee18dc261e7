//! Typewriter reveal scheduler
//!
//! Cooperative: nothing runs in the background. The owner calls
//! [`RevealScheduler::due_ticks`] from its frame loop and applies that many
//! [`RevealScheduler::tick`]s. [`RevealScheduler::cancel`] is the only way to
//! stop early, after which every call is a no-op.

use std::time::{Duration, Instant};
use uuid::Uuid;

pub const DEFAULT_TYPING_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// `n` characters are now visible and more remain
    Revealed(usize),
    /// The last character is visible
    Finished(usize),
    /// Nothing to do (finished or cancelled)
    Idle,
}

#[derive(Debug, Clone)]
pub struct RevealScheduler {
    turn_id: Uuid,
    total_chars: usize,
    revealed: usize,
    interval: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl RevealScheduler {
    pub fn new(turn_id: Uuid, text: &str, interval: Duration, now: Instant) -> Self {
        Self {
            turn_id,
            total_chars: text.chars().count(),
            revealed: 0,
            interval,
            next_due: now + interval,
            cancelled: false,
        }
    }

    pub fn turn_id(&self) -> Uuid {
        self.turn_id
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && self.revealed < self.total_chars
    }

    /// Expose one more character
    pub fn tick(&mut self) -> RevealStep {
        if !self.is_active() {
            return RevealStep::Idle;
        }
        self.revealed += 1;
        if self.revealed >= self.total_chars {
            RevealStep::Finished(self.revealed)
        } else {
            RevealStep::Revealed(self.revealed)
        }
    }

    /// How many ticks have come due by `now`; consumes them
    pub fn due_ticks(&mut self, now: Instant) -> usize {
        if !self.is_active() || now < self.next_due {
            return 0;
        }
        let interval_nanos = self.interval.as_nanos().max(1);
        let late = now.duration_since(self.next_due).as_nanos();
        let due = (late / interval_nanos) as usize + 1;
        let due = due.min(self.total_chars - self.revealed);
        self.next_due += self.interval * due as u32;
        due
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
