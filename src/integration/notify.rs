//! Dismissible user notifications

use crate::NarratorError;
use std::collections::VecDeque;

/// Oldest notifications are dropped beyond this
const MAX_NOTIFICATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if self.items.len() >= MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            id,
            level,
            title: title.into(),
            message: message.into(),
        });
        id
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, title, message)
    }

    /// Report an error with its user-facing message
    pub fn error(&mut self, title: impl Into<String>, err: &NarratorError) -> u64 {
        let level = if err.is_warning() {
            NotificationLevel::Warning
        } else {
            NotificationLevel::Error
        };
        self.push(level, title, err.user_message())
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.back()
    }
}
