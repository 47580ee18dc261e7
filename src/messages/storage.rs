use super::types::{ConversationTurn, RevealState};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Append-only turn log for one conversation.
///
/// Turns are never removed or reordered; only their reveal progress changes.
/// `clear` drops the whole conversation at once.
#[derive(Debug, Clone)]
pub struct TurnLog {
    turns: Arc<RwLock<Vec<ConversationTurn>>>,
}

impl TurnLog {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn push(&self, turn: ConversationTurn) {
        self.turns.write().push(turn);
    }

    pub fn get_all(&self) -> Vec<ConversationTurn> {
        self.turns.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<ConversationTurn> {
        self.turns.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn first(&self) -> Option<ConversationTurn> {
        self.turns.read().first().cloned()
    }

    pub fn set_reveal(&self, id: Uuid, state: RevealState, revealed_chars: usize) {
        if let Some(turn) = self.turns.write().iter_mut().find(|t| t.id == id) {
            turn.reveal_state = state;
            turn.revealed_chars = revealed_chars;
        }
    }

    pub fn clear(&self) {
        self.turns.write().clear();
    }

    pub fn len(&self) -> usize {
        self.turns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.read().is_empty()
    }
}

impl Default for TurnLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let log = TurnLog::new();
        log.push(ConversationTurn::assistant("first", None));
        log.push(ConversationTurn::user("second"));

        let texts: Vec<_> = log.get_all().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_set_reveal_updates_in_place() {
        let log = TurnLog::new();
        let turn = ConversationTurn::assistant("Hi", None);
        let id = turn.id;
        log.push(turn);

        log.set_reveal(id, RevealState::Revealing, 1);
        let stored = log.get(id).unwrap();
        assert_eq!(stored.reveal_state, RevealState::Revealing);
        assert_eq!(stored.visible_text(), "H");
        assert_eq!(log.len(), 1);
    }
}
