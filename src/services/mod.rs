//! External collaborators
//!
//! The narrator never implements image understanding, narrative writing or
//! speech synthesis itself. Each of those is a black box behind one of the
//! traits below; the HTTP clients in the submodules are the production
//! implementations.

pub mod vision;
pub mod webhook;

use crate::narration::NarrationRequest;
use crate::speech::VoiceSelection;
use crate::{NarratorError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub use vision::GeminiImageDescriber;
pub use webhook::WebhookNarrator;

/// Turns a photo into a short description of the place it shows
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Returns `None` (or an empty string) when nothing could be recognised
    async fn describe(&self, image_data_uri: &str) -> Result<Option<String>>;
}

/// Produces narrative and follow-up answer text
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Returns the raw response body on success
    async fn generate(&self, request: &NarrationRequest) -> Result<String>;
}

/// Converts text to encoded audio bytes
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Vec<u8>>;
}

/// Shared reqwest client setup for the HTTP collaborators
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| NarratorError::ConfigError(format!("HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_builds_with_and_without_timeout() {
        assert!(http_client(Some(Duration::from_millis(250))).is_ok());
        assert!(http_client(None).is_ok());
    }
}
