pub mod conversation;
pub mod reveal;
pub mod scroll;

pub use conversation::ConversationSession;
pub use reveal::{RevealScheduler, RevealStep, DEFAULT_TYPING_INTERVAL};
pub use scroll::{ScrollPolicy, ScrollRequest, ViewportMetrics};
