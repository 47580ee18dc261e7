use crate::audio::AudioHandle;
use crate::location::{Coordinates, ResolvedLocation};
use crate::narration::request::InformationStyle;
use crate::NarratorError;

/// Narrative or answer text, with audio when synthesis succeeded
#[derive(Debug, Clone)]
pub struct NarrationResult {
    pub text: String,
    pub audio: Option<AudioHandle>,
    /// Non-fatal problem, e.g. synthesis failed and only text is available
    pub warning: Option<NarratorError>,
}

/// Everything a follow-up needs to stay on the same place
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationContext {
    pub location: ResolvedLocation,
    pub language: String,
    pub style: InformationStyle,
    pub user_id: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone)]
pub struct InitialNarration {
    pub result: NarrationResult,
    pub context: NarrationContext,
}
