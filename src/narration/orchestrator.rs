//! Narration orchestrator
//!
//! Drives validate → resolve → generate → synthesize for the first narrative
//! and generate → synthesize for every follow-up. Steps run strictly in
//! sequence; any failure before generation means no generation call is made.
//! Synthesis failures never abort: the text is returned without audio and the
//! failure is carried as a warning.

use crate::location::{Coordinates, LocationResolver};
use crate::narration::form::NarratorForm;
use crate::narration::request::NarrationRequest;
use crate::narration::result::{InitialNarration, NarrationContext, NarrationResult};
use crate::services::NarrativeService;
use crate::speech::SpeechSynthesis;
use crate::{NarratorError, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct NarrationOrchestrator {
    resolver: Arc<LocationResolver>,
    narrator: Arc<dyn NarrativeService>,
    speech: SpeechSynthesis,
}

impl NarrationOrchestrator {
    pub fn new(
        resolver: Arc<LocationResolver>,
        narrator: Arc<dyn NarrativeService>,
        speech: SpeechSynthesis,
    ) -> Self {
        Self {
            resolver,
            narrator,
            speech,
        }
    }

    pub async fn generate_initial(
        &self,
        form: &NarratorForm,
        language: &str,
        user_id: &str,
        coords: Option<Coordinates>,
    ) -> Result<InitialNarration> {
        let start = Instant::now();

        let style = form.validate()?;
        if user_id.trim().is_empty() {
            return Err(NarratorError::MissingUserId);
        }

        let location = self.resolver.resolve(&form.inputs(), coords).await?;
        info!(
            "Generating {} narrative in {:?} from {}",
            style,
            language,
            location.source()
        );

        let coordinates = location.coordinates().or(coords);
        let request = NarrationRequest {
            location_description: location.description().to_string(),
            information_style: style,
            output_language: language.to_string(),
            user_id: user_id.to_string(),
            is_follow_up: false,
            follow_up_question: None,
            prior_narrative: None,
            coordinates,
        };

        let text = self.generate_text(&request).await?;
        let result = self.attach_audio(text, language).await;

        debug!("Initial narrative ready in {:?}", start.elapsed());
        Ok(InitialNarration {
            result,
            context: NarrationContext {
                location,
                language: language.to_string(),
                style,
                user_id: user_id.to_string(),
                coordinates,
            },
        })
    }

    /// Answer a question about the place in `context`.
    ///
    /// `prior_narrative` stays local; only the resolved description is sent
    /// as location context.
    pub async fn generate_follow_up(
        &self,
        context: &NarrationContext,
        prior_narrative: &str,
        question: &str,
    ) -> Result<NarrationResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(NarratorError::EmptyQuestion);
        }
        if context.user_id.trim().is_empty() {
            return Err(NarratorError::MissingUserId);
        }

        info!("Generating follow-up answer ({} chars)", question.len());
        let request = NarrationRequest {
            location_description: context.location.description().to_string(),
            information_style: context.style,
            output_language: context.language.clone(),
            user_id: context.user_id.clone(),
            is_follow_up: true,
            follow_up_question: Some(question.to_string()),
            prior_narrative: Some(prior_narrative.to_string()),
            coordinates: context.coordinates,
        };

        let text = self.generate_text(&request).await?;
        Ok(self.attach_audio(text, &context.language).await)
    }

    async fn generate_text(&self, request: &NarrationRequest) -> Result<String> {
        let text = self.narrator.generate(request).await.map_err(|e| match e {
            NarratorError::NarrationServiceFailed(_) => e,
            other => NarratorError::NarrationServiceFailed(other.to_string()),
        })?;

        if text.is_empty() {
            warn!("Narration service returned an empty body");
            return Err(NarratorError::NarrationServiceFailed(
                "empty response".to_string(),
            ));
        }
        Ok(text)
    }

    async fn attach_audio(&self, text: String, language: &str) -> NarrationResult {
        match self.speech.synthesize(&text, language).await {
            Ok(audio) => NarrationResult {
                text,
                audio,
                warning: None,
            },
            Err(e) => {
                warn!("Continuing without audio: {}", e);
                NarrationResult {
                    text,
                    audio: None,
                    warning: Some(e),
                }
            }
        }
    }
}
