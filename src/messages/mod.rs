pub mod storage;
pub mod types;

pub use storage::TurnLog;
pub use types::{ConversationTurn, RevealState, Sender};
