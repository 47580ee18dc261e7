//! Text-to-speech front door used by narration

use crate::audio::AudioHandle;
use crate::services::SpeechSynthesizer;
use crate::speech::voice::select_voice;
use crate::{NarratorError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct SpeechSynthesis {
    synth: Option<Arc<dyn SpeechSynthesizer>>,
}

impl SpeechSynthesis {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synth: Some(synth) }
    }

    /// Text-only mode: every call yields no audio
    pub fn disabled() -> Self {
        Self { synth: None }
    }

    /// Synthesize `text` in `language`.
    ///
    /// Blank text yields `Ok(None)` without calling the synthesizer. An empty
    /// audio payload counts as a failure.
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<Option<AudioHandle>> {
        let Some(synth) = &self.synth else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            debug!("Skipping synthesis of blank text");
            return Ok(None);
        }

        let voice = select_voice(language);
        debug!(
            "Synthesizing {} chars with voice {:?} ({})",
            text.len(),
            voice.name,
            voice.language_code
        );

        let bytes = synth.synthesize(text, &voice).await.map_err(|e| {
            warn!("Speech synthesis failed: {}", e);
            match e {
                NarratorError::SynthesisFailed(_) => e,
                other => NarratorError::SynthesisFailed(other.to_string()),
            }
        })?;

        if bytes.is_empty() {
            return Err(NarratorError::SynthesisFailed(
                "no audio content returned".to_string(),
            ));
        }

        Ok(Some(AudioHandle::mpeg(bytes)))
    }
}
