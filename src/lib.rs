pub mod audio;
pub mod identity;
pub mod integration;
pub mod location;
pub mod messages;
pub mod narration;
pub mod places;
pub mod services;
pub mod session;
pub mod speech;
pub mod ui;

use std::fmt;
use thiserror::Error;

/// A validation message addressed to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone)]
pub enum NarratorError {
    #[error("Invalid input: {}", join_field_errors(.0))]
    InvalidInput(Vec<FieldError>),

    #[error("User ID is missing")]
    MissingUserId,

    #[error("No location provided")]
    NoLocationProvided,

    #[error("Image description failed: {0}")]
    ImageDescriptionFailed(String),

    #[error("Narration service failed: {0}")]
    NarrationServiceFailed(String),

    #[error("Follow-up question is empty")]
    EmptyQuestion,

    #[error("A follow-up is already being answered")]
    FollowUpPending,

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Autocomplete failed: {0}")]
    AutocompleteFailed(String),

    #[error("Nearby lookup failed: {0}")]
    NearbyLookupFailed(String),

    #[error("Voice capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Microphone permission denied")]
    CapturePermissionDenied,

    #[error("Voice capture error: {0}")]
    CaptureGenericError(String),

    #[error("Audio playback error: {0}")]
    PlaybackError(String),

    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for NarratorError {
    fn from(e: std::io::Error) -> Self {
        NarratorError::IOError(e.to_string())
    }
}

impl NarratorError {
    /// Check if the user can simply retry after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            NarratorError::InvalidInput(_) => true,
            // The identifier is generated at startup; missing means storage is broken
            NarratorError::MissingUserId => false,
            NarratorError::NoLocationProvided => true,
            NarratorError::ImageDescriptionFailed(_) => true,
            NarratorError::NarrationServiceFailed(_) => true,
            NarratorError::EmptyQuestion => true,
            NarratorError::FollowUpPending => true,
            NarratorError::SynthesisFailed(_) => true,
            NarratorError::AutocompleteFailed(_) => true,
            NarratorError::NearbyLookupFailed(_) => true,
            NarratorError::CaptureUnavailable(_) => false,
            NarratorError::CapturePermissionDenied => false,
            NarratorError::CaptureGenericError(_) => true,
            NarratorError::PlaybackError(_) => true,
            NarratorError::GeolocationUnavailable(_) => false,
            NarratorError::ConfigError(_) => false,
            NarratorError::IOError(_) => false,
            NarratorError::ChannelError(_) => false,
        }
    }

    /// Non-fatal kinds: the caller still has something usable
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            NarratorError::SynthesisFailed(_)
                | NarratorError::CaptureUnavailable(_)
                | NarratorError::FollowUpPending
        )
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            NarratorError::InvalidInput(errors) => {
                format!("Please check the form: {}", join_field_errors(errors))
            }
            NarratorError::MissingUserId => {
                "User ID is missing. Cannot proceed.".to_string()
            }
            NarratorError::NoLocationProvided => {
                "Please provide a location: type a place, use your current location, or attach a photo."
                    .to_string()
            }
            NarratorError::ImageDescriptionFailed(_) => {
                "Could not recognise a place in that image. Please try a clearer photo.".to_string()
            }
            NarratorError::NarrationServiceFailed(detail) => {
                format!("Failed to get a narrative from the guide. {}", detail)
            }
            NarratorError::EmptyQuestion => {
                "Please type or say a question first.".to_string()
            }
            NarratorError::FollowUpPending => {
                "Your guide is still answering. Ask again once the answer arrives.".to_string()
            }
            NarratorError::SynthesisFailed(_) => {
                "Audio is unavailable for this answer. The text is shown instead.".to_string()
            }
            NarratorError::AutocompleteFailed(_) => {
                "Place suggestions are unavailable right now.".to_string()
            }
            NarratorError::NearbyLookupFailed(_) => {
                "Nearby places are unavailable right now.".to_string()
            }
            NarratorError::CaptureUnavailable(_) => {
                "Voice input is not available here. You can still type your question.".to_string()
            }
            NarratorError::CapturePermissionDenied => {
                "Microphone access was denied. Please enable microphone permission and try again."
                    .to_string()
            }
            NarratorError::CaptureGenericError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            NarratorError::PlaybackError(_) => "Could not play this audio.".to_string(),
            NarratorError::GeolocationUnavailable(_) => {
                "Your current location could not be determined.".to_string()
            }
            NarratorError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            NarratorError::IOError(_) => "File system error occurred.".to_string(),
            NarratorError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NarratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_lists_every_field() {
        let err = NarratorError::InvalidInput(vec![
            FieldError::new("informationStyle", "must be one of Historical, Curious, Legends"),
            FieldError::new("imageDataUri", "not an image"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input: informationStyle: must be one of Historical, Curious, Legends; imageDataUri: not an image"
        );
    }

    #[test]
    fn test_warning_kinds() {
        assert!(NarratorError::SynthesisFailed("x".into()).is_warning());
        assert!(NarratorError::CaptureUnavailable("x".into()).is_warning());
        assert!(!NarratorError::NarrationServiceFailed("x".into()).is_warning());
    }

    #[test]
    fn test_capture_errors_give_distinct_guidance() {
        let denied = NarratorError::CapturePermissionDenied.user_message();
        let generic = NarratorError::CaptureGenericError("network".into()).user_message();
        assert!(denied.contains("permission"));
        assert!(generic.contains("try again"));
        assert_ne!(denied, generic);
    }
}
