//! Narrative generation for a place and follow-up questions about it

pub mod form;
pub mod orchestrator;
pub mod request;
pub mod result;

pub use form::NarratorForm;
pub use orchestrator::NarrationOrchestrator;
pub use request::{InformationStyle, NarrationRequest};
pub use result::{InitialNarration, NarrationContext, NarrationResult};
