//! Scripted collaborators shared by the integration tests

#![allow(dead_code)]

use aijolot::integration::{NarrationCommand, NarrationEvent, SessionController, SessionSettings};
use aijolot::location::{Coordinates, LocationResolver};
use aijolot::narration::{NarrationOrchestrator, NarrationRequest};
use aijolot::places::{PlaceLookup, PlaceSuggestion};
use aijolot::services::{ImageDescriber, NarrativeService, SpeechSynthesizer};
use aijolot::speech::{SpeechSynthesis, VoiceSelection};
use aijolot::{NarratorError, Result};
use async_trait::async_trait;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Describes every image as the same place
pub struct ScriptedDescriber {
    pub description: Option<String>,
    pub calls: AtomicUsize,
}

impl ScriptedDescriber {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            description: description.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageDescriber for ScriptedDescriber {
    async fn describe(&self, _image_data_uri: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.description.clone())
    }
}

/// Replies with a fixed body and records every request it receives
pub struct ScriptedNarrator {
    pub reply: String,
    pub requests: Mutex<Vec<NarrationRequest>>,
    pub calls: AtomicUsize,
}

impl ScriptedNarrator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<NarrationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl NarrativeService for ScriptedNarrator {
    async fn generate(&self, request: &NarrationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Returns fixed bytes, or fails when `fail` is set
pub struct ScriptedSynth {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl ScriptedSynth {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn broken() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynth {
    async fn synthesize(&self, _text: &str, _voice: &VoiceSelection) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(NarratorError::SynthesisFailed("quota exceeded".to_string()))
        } else {
            Ok(vec![0xFF, 0xFB, 0x90, 0x00])
        }
    }
}

/// Always suggests the same places
pub struct ScriptedPlaces {
    pub places: Vec<PlaceSuggestion>,
    pub calls: AtomicUsize,
}

impl ScriptedPlaces {
    pub fn new(names: &[&str]) -> Self {
        Self {
            places: names
                .iter()
                .enumerate()
                .map(|(i, name)| PlaceSuggestion {
                    description: name.to_string(),
                    id: format!("place-{}", i),
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PlaceLookup for ScriptedPlaces {
    async fn autocomplete(&self, _query: &str) -> Result<Vec<PlaceSuggestion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.clone())
    }

    async fn nearby(&self, _coords: Coordinates) -> Result<Vec<PlaceSuggestion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.clone())
    }
}

/// Orchestrator plus handles on each collaborator
pub struct Scripted {
    pub describer: Arc<ScriptedDescriber>,
    pub narrator: Arc<ScriptedNarrator>,
    pub synth: Arc<ScriptedSynth>,
    pub orchestrator: NarrationOrchestrator,
}

pub fn orchestrator(reply: &str, synth: ScriptedSynth) -> Scripted {
    let describer = Arc::new(ScriptedDescriber::new(Some("The Eiffel Tower in Paris")));
    let narrator = Arc::new(ScriptedNarrator::new(reply));
    let synth = Arc::new(synth);

    let orchestrator = NarrationOrchestrator::new(
        Arc::new(LocationResolver::new(describer.clone())),
        narrator.clone(),
        SpeechSynthesis::new(synth.clone()),
    );

    Scripted {
        describer,
        narrator,
        synth,
        orchestrator,
    }
}

/// Controller wired to bare channels; the test plays the pipeline
pub fn controller() -> (
    SessionController,
    Receiver<NarrationCommand>,
    Sender<NarrationEvent>,
) {
    let (command_tx, command_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();
    let settings = SessionSettings {
        language: "en".to_string(),
        user_id: "3f2b9c1e-0000-4000-8000-000000000000".to_string(),
    };
    (
        SessionController::new(settings, command_tx, event_rx),
        command_rx,
        event_tx,
    )
}
