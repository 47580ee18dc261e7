//! Narration pipeline
//!
//! Runs the orchestrator and place lookups on a worker thread that owns a
//! tokio runtime, so the UI thread only ever touches channels. Every command
//! is spawned as its own task: a slow narration never holds up suggestions.

use crate::integration::config::NarratorConfig;
use crate::location::{Coordinates, LocationResolver};
use crate::narration::{
    InitialNarration, NarrationContext, NarrationOrchestrator, NarrationResult, NarratorForm,
};
use crate::places::{GooglePlaces, PlaceLookup, PlaceSuggestion};
use crate::services::{GeminiImageDescriber, WebhookNarrator};
use crate::speech::{GoogleTts, SpeechSynthesis};
use crate::{NarratorError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Identifies one request within one conversation.
///
/// A response is applied only if its tag is still the one the controller is
/// waiting for; anything else is stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag {
    pub epoch: u64,
    pub request_id: Uuid,
}

impl RequestTag {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            request_id: Uuid::new_v4(),
        }
    }
}

/// Commands that can be sent to the narration pipeline
#[derive(Debug, Clone)]
pub enum NarrationCommand {
    /// Resolve the form's location and narrate it
    Initial {
        tag: RequestTag,
        form: NarratorForm,
        language: String,
        user_id: String,
        coords: Option<Coordinates>,
    },

    /// Answer a question about an already narrated place
    FollowUp {
        tag: RequestTag,
        context: NarrationContext,
        prior_narrative: String,
        question: String,
    },

    Autocomplete {
        tag: RequestTag,
        query: String,
    },

    Nearby {
        tag: RequestTag,
        coords: Coordinates,
    },

    Shutdown,
}

/// Events emitted by the narration pipeline
#[derive(Debug, Clone)]
pub enum NarrationEvent {
    InitialReady {
        tag: RequestTag,
        narration: InitialNarration,
    },

    FollowUpReady {
        tag: RequestTag,
        result: NarrationResult,
    },

    /// A narration or follow-up failed
    Failed {
        tag: RequestTag,
        error: NarratorError,
    },

    Suggestions {
        tag: RequestTag,
        result: Result<Vec<PlaceSuggestion>>,
    },

    /// Pipeline has shut down
    Shutdown,
}

pub struct NarrationPipeline {
    orchestrator: NarrationOrchestrator,
    places: Arc<dyn PlaceLookup>,

    command_tx: Sender<NarrationCommand>,
    command_rx: Receiver<NarrationCommand>,
    event_tx: Sender<NarrationEvent>,
    event_rx: Receiver<NarrationEvent>,
}

impl NarrationPipeline {
    pub fn new(orchestrator: NarrationOrchestrator, places: Arc<dyn PlaceLookup>) -> Self {
        let (command_tx, command_rx) = bounded(100);
        // Tasks must never block a runtime thread on a slow UI
        let (event_tx, event_rx) = unbounded();

        Self {
            orchestrator,
            places,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Build the production collaborators described by `config`
    pub fn from_config(config: &NarratorConfig) -> Result<Self> {
        let describer = GeminiImageDescriber::new(
            config.vision.api_url.clone(),
            config.vision.api_key.clone(),
            config.vision.model.clone(),
            Duration::from_millis(config.vision.timeout_ms),
        )?;
        let narrator = WebhookNarrator::new(
            config.narration.webhook_url.clone(),
            config.narration.timeout_ms.map(Duration::from_millis),
        )?;
        let speech = if config.speech.enabled {
            SpeechSynthesis::new(Arc::new(GoogleTts::new(
                config.speech.api_url.clone(),
                config.speech.api_key.clone(),
                Duration::from_millis(config.speech.timeout_ms),
            )?))
        } else {
            SpeechSynthesis::disabled()
        };
        let places = GooglePlaces::new(
            config.places.api_url.clone(),
            config.places.api_key.clone(),
            config.places_timeout(),
        )?;

        let orchestrator = NarrationOrchestrator::new(
            Arc::new(LocationResolver::new(Arc::new(describer))),
            Arc::new(narrator),
            speech,
        );
        Ok(Self::new(orchestrator, Arc::new(places)))
    }

    pub fn command_sender(&self) -> Sender<NarrationCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<NarrationEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread; it runs until `Shutdown` or every sender is gone
    pub fn start_worker(self) -> Result<JoinHandle<()>> {
        let NarrationPipeline {
            orchestrator,
            places,
            command_rx,
            event_tx,
            ..
        } = self;

        let handle = std::thread::Builder::new()
            .name("narration-pipeline".to_string())
            .spawn(move || {
                info!("Narration pipeline worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(NarrationEvent::Shutdown);
                        return;
                    }
                };

                while let Ok(command) = command_rx.recv() {
                    if matches!(command, NarrationCommand::Shutdown) {
                        info!("Narration pipeline shutting down");
                        break;
                    }
                    let orchestrator = orchestrator.clone();
                    let places = places.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = run_command(&orchestrator, places.as_ref(), command).await;
                        if let Some(event) = event {
                            if event_tx.send(event).is_err() {
                                debug!("Event receiver gone; dropping result");
                            }
                        }
                    });
                }

                runtime.shutdown_background();
                let _ = event_tx.send(NarrationEvent::Shutdown);
            })?;

        Ok(handle)
    }
}

async fn run_command(
    orchestrator: &NarrationOrchestrator,
    places: &dyn PlaceLookup,
    command: NarrationCommand,
) -> Option<NarrationEvent> {
    let event = match command {
        NarrationCommand::Initial {
            tag,
            form,
            language,
            user_id,
            coords,
        } => {
            debug!("Processing initial narration: {}", tag.request_id);
            match orchestrator
                .generate_initial(&form, &language, &user_id, coords)
                .await
            {
                Ok(narration) => NarrationEvent::InitialReady { tag, narration },
                Err(error) => NarrationEvent::Failed { tag, error },
            }
        }
        NarrationCommand::FollowUp {
            tag,
            context,
            prior_narrative,
            question,
        } => {
            debug!("Processing follow-up: {}", tag.request_id);
            match orchestrator
                .generate_follow_up(&context, &prior_narrative, &question)
                .await
            {
                Ok(result) => NarrationEvent::FollowUpReady { tag, result },
                Err(error) => NarrationEvent::Failed { tag, error },
            }
        }
        NarrationCommand::Autocomplete { tag, query } => NarrationEvent::Suggestions {
            tag,
            result: places.autocomplete(&query).await,
        },
        NarrationCommand::Nearby { tag, coords } => NarrationEvent::Suggestions {
            tag,
            result: places.nearby(coords).await,
        },
        NarrationCommand::Shutdown => return None,
    };
    Some(event)
}
