//! Speech in and out
//!
//! Synthesis turns narrative text into audio through an external service;
//! capture turns the user's voice into a follow-up question.

pub mod capture;
pub mod google;
pub mod synthesis;
pub mod voice;

pub use capture::{
    CaptureBackend, CaptureEvent, ChannelCapture, RecordingSession, RecordingState,
    UnavailableCapture, VoiceCapture,
};
pub use google::GoogleTts;
pub use synthesis::SpeechSynthesis;
pub use voice::{select_voice, VoiceGender, VoiceSelection};
