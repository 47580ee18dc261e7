//! Session controller
//!
//! Turns user actions into pipeline commands and pipeline events into session
//! state. Owns everything the UI reads; widgets never talk to the pipeline
//! directly.

use crate::audio::AudioPlayback;
use crate::integration::geolocation::{ConfiguredGeolocation, GeolocationProvider};
use crate::integration::notify::Notifications;
use crate::integration::pipeline::{NarrationCommand, NarrationEvent, RequestTag};
use crate::location::image::data_uri_from_file;
use crate::location::LocationInput;
use crate::narration::{InformationStyle, NarrationContext, NarratorForm};
use crate::places::{wants_autocomplete, PlaceSuggestion};
use crate::session::{ConversationSession, ScrollPolicy, ScrollRequest, DEFAULT_TYPING_INTERVAL};
use crate::speech::{CaptureEvent, VoiceCapture};
use crate::{NarratorError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-session values injected by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub language: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    CollectingInput,
    Conversing,
}

pub struct SessionController {
    settings: SessionSettings,
    mode: ScreenMode,
    form: NarratorForm,
    default_style: InformationStyle,
    session: ConversationSession,
    capture: VoiceCapture,
    playback: AudioPlayback,
    geolocation: Box<dyn GeolocationProvider>,
    scroll: ScrollPolicy,
    pub notifications: Notifications,

    command_tx: Sender<NarrationCommand>,
    event_rx: Receiver<NarrationEvent>,

    pending_initial: Option<RequestTag>,
    pending_follow_up: Option<RequestTag>,
    pending_suggestions: Option<RequestTag>,

    context: Option<NarrationContext>,
    /// Text in the follow-up box
    pub question_input: String,
    suggestions: Vec<PlaceSuggestion>,
}

impl SessionController {
    pub fn new(
        settings: SessionSettings,
        command_tx: Sender<NarrationCommand>,
        event_rx: Receiver<NarrationEvent>,
    ) -> Self {
        Self {
            settings,
            mode: ScreenMode::CollectingInput,
            form: NarratorForm::default(),
            default_style: InformationStyle::Curious,
            session: ConversationSession::new(DEFAULT_TYPING_INTERVAL),
            capture: VoiceCapture::unavailable(),
            playback: AudioPlayback::silent(),
            geolocation: Box::new(ConfiguredGeolocation::default()),
            scroll: ScrollPolicy::default(),
            notifications: Notifications::new(),
            command_tx,
            event_rx,
            pending_initial: None,
            pending_follow_up: None,
            pending_suggestions: None,
            context: None,
            question_input: String::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_capture(mut self, capture: VoiceCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_playback(mut self, playback: AudioPlayback) -> Self {
        self.playback = playback;
        self
    }

    pub fn with_geolocation(mut self, geolocation: Box<dyn GeolocationProvider>) -> Self {
        self.geolocation = geolocation;
        self
    }

    pub fn with_typing_interval(mut self, interval: Duration) -> Self {
        self.session = ConversationSession::new(interval);
        self
    }

    pub fn with_scroll_policy(mut self, scroll: ScrollPolicy) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_default_style(mut self, style: InformationStyle) -> Self {
        self.default_style = style;
        self.form.set_style(style);
        self
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn form(&self) -> &NarratorForm {
        &self.form
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn capture(&self) -> &VoiceCapture {
        &self.capture
    }

    pub fn playback(&self) -> &AudioPlayback {
        &self.playback
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.session.take_scroll_request()
    }

    pub fn scroll_policy(&self) -> ScrollPolicy {
        self.scroll
    }

    pub fn context(&self) -> Option<&NarrationContext> {
        self.context.as_ref()
    }

    pub fn suggestions(&self) -> &[PlaceSuggestion] {
        &self.suggestions
    }

    pub fn is_narrating(&self) -> bool {
        self.pending_initial.is_some()
    }

    pub fn is_answering(&self) -> bool {
        self.pending_follow_up.is_some()
    }

    pub fn can_submit_form(&self) -> bool {
        self.pending_initial.is_none()
    }

    pub fn can_send_question(&self) -> bool {
        self.context.is_some() && self.pending_follow_up.is_none() && !self.capture.is_recording()
    }

    /// Output language for future requests
    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        info!("Output language set to {}", language);
        if let Some(context) = self.context.as_mut() {
            context.language = language.clone();
        }
        self.settings.language = language;
    }

    pub fn set_style(&mut self, style: InformationStyle) {
        self.form.set_style(style);
    }

    /// Typing in the place box; looks up suggestions once long enough
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.form.set_query(query.clone());
        self.request_autocomplete(&query);
    }

    pub fn request_autocomplete(&mut self, query: &str) {
        if !wants_autocomplete(query) {
            self.suggestions.clear();
            self.pending_suggestions = None;
            return;
        }
        let tag = RequestTag::new(self.session.epoch());
        if self.send(NarrationCommand::Autocomplete {
            tag,
            query: query.trim().to_string(),
        }) {
            self.pending_suggestions = Some(tag);
        }
    }

    pub fn select_suggestion(&mut self, suggestion: &PlaceSuggestion) {
        self.form.select_place(suggestion.description.clone());
        self.suggestions.clear();
        self.pending_suggestions = None;
    }

    /// Ask the device where it is, then look up what is nearby
    pub fn use_current_location(&mut self) {
        match self.geolocation.current_position() {
            Ok(coords) => {
                info!("Using current location {}", coords);
                self.form.request_current_location(Some(coords));
                let tag = RequestTag::new(self.session.epoch());
                if self.send(NarrationCommand::Nearby { tag, coords }) {
                    self.pending_suggestions = Some(tag);
                }
            }
            Err(e) => {
                warn!("Current location unavailable: {}", e);
                self.notifications.error("Location", &e);
            }
        }
    }

    pub fn attach_image_file(&mut self, path: impl AsRef<Path>) {
        match data_uri_from_file(path) {
            Ok(data_uri) => {
                self.form.attach_image(data_uri);
                self.suggestions.clear();
            }
            Err(e) => {
                self.notifications.error("Image", &e);
            }
        }
    }

    pub fn attach_image_data_uri(&mut self, data_uri: impl Into<String>) {
        self.form.attach_image(data_uri);
        self.suggestions.clear();
    }

    pub fn clear_location(&mut self) {
        self.form.clear_location();
        self.suggestions.clear();
    }

    /// Request the initial narrative for the form's location
    pub fn submit_form(&mut self) -> bool {
        if self.pending_initial.is_some() {
            debug!("Initial narrative already outstanding");
            return false;
        }

        let coords = match &self.form.location {
            Some(LocationInput::CurrentLocation { coords }) => *coords,
            _ => None,
        };
        let tag = RequestTag::new(self.session.epoch());
        let command = NarrationCommand::Initial {
            tag,
            form: self.form.clone(),
            language: self.settings.language.clone(),
            user_id: self.settings.user_id.clone(),
            coords,
        };

        if self.send(command) {
            info!("Requested initial narrative {}", tag.request_id);
            self.pending_initial = Some(tag);
            self.suggestions.clear();
            true
        } else {
            false
        }
    }

    /// Ask the text in the question box
    pub fn submit_question(&mut self) -> Result<()> {
        let question = self.question_input.trim().to_string();
        if question.is_empty() {
            return Err(NarratorError::EmptyQuestion);
        }
        if self.pending_follow_up.is_some() {
            debug!("Follow-up already outstanding");
            return Err(NarratorError::FollowUpPending);
        }
        let Some(context) = self.context.clone() else {
            return Err(NarratorError::NoLocationProvided);
        };

        let prior_narrative = self
            .session
            .initial_narrative()
            .map(|turn| turn.text)
            .unwrap_or_default();

        let tag = RequestTag::new(self.session.epoch());
        let command = NarrationCommand::FollowUp {
            tag,
            context,
            prior_narrative,
            question: question.clone(),
        };
        if !self.send(command) {
            return Err(NarratorError::ChannelError(
                "narration pipeline is not running".to_string(),
            ));
        }

        self.session.push_user_turn(question);
        self.question_input.clear();
        self.pending_follow_up = Some(tag);
        Ok(())
    }

    /// Single mic control: start or stop recording
    pub fn toggle_recording(&mut self) {
        let language = self.settings.language.clone();
        if let Err(e) = self.capture.toggle(&language) {
            self.notifications.error("Voice input", &e);
        }
    }

    pub fn toggle_audio(&mut self, turn_id: Uuid) {
        let Some(audio) = self.session.turn(turn_id).and_then(|t| t.audio) else {
            return;
        };
        if let Err(e) = self.playback.toggle(turn_id, &audio) {
            self.notifications.error("Audio", &e);
        }
    }

    /// Drop the conversation and go back to the form
    pub fn explore_new_location(&mut self) {
        info!("Starting a new exploration");
        self.session.reset();
        self.playback.stop();
        self.capture.stop();
        self.context = None;
        self.pending_initial = None;
        self.pending_follow_up = None;
        self.pending_suggestions = None;
        self.question_input.clear();
        self.suggestions.clear();
        self.form = NarratorForm::new(self.default_style);
        self.mode = ScreenMode::CollectingInput;
    }

    /// Drain pipeline and recognizer events; call once per frame
    pub fn poll_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event, now);
        }
        while let Some(event) = self.capture.poll() {
            self.handle_capture_event(event);
        }
    }

    /// Apply one pipeline event; returns false if it was stale and dropped
    pub fn handle_event(&mut self, event: NarrationEvent, now: Instant) -> bool {
        match event {
            NarrationEvent::InitialReady { tag, narration } => {
                if !self.is_current(self.pending_initial, tag) {
                    debug!("Discarding stale narrative {}", tag.request_id);
                    return false;
                }
                self.pending_initial = None;
                self.playback.stop();

                let result = narration.result;
                self.session.begin_initial(result.text, result.audio, now);
                self.context = Some(narration.context);
                self.mode = ScreenMode::Conversing;

                if let Some(warning) = &result.warning {
                    self.notifications.error("Audio unavailable", warning);
                }
                self.notifications
                    .info("Narrative ready", "Your tour guide is ready to talk.");
                true
            }
            NarrationEvent::FollowUpReady { tag, result } => {
                if !self.is_current(self.pending_follow_up, tag) {
                    debug!("Discarding stale answer {}", tag.request_id);
                    return false;
                }
                self.pending_follow_up = None;
                self.session.push_assistant_turn(result.text, result.audio, now);

                if let Some(warning) = &result.warning {
                    self.notifications.error("Audio unavailable", warning);
                }
                self.notifications.info("Answer ready", "Your guide has answered.");
                true
            }
            NarrationEvent::Failed { tag, error } => {
                if self.is_current(self.pending_initial, tag) {
                    self.pending_initial = None;
                    warn!("Initial narrative failed: {}", error);
                    self.notifications.error("Error", &error);
                    true
                } else if self.is_current(self.pending_follow_up, tag) {
                    self.pending_follow_up = None;
                    warn!("Follow-up failed: {}", error);
                    self.notifications.error("Error", &error);
                    true
                } else {
                    debug!("Discarding stale failure {}: {}", tag.request_id, error);
                    false
                }
            }
            NarrationEvent::Suggestions { tag, result } => {
                if !self.is_current(self.pending_suggestions, tag) {
                    return false;
                }
                self.pending_suggestions = None;
                match result {
                    Ok(places) => self.suggestions = places,
                    Err(e) => {
                        warn!("No suggestions: {}", e);
                        self.suggestions.clear();
                    }
                }
                true
            }
            NarrationEvent::Shutdown => {
                info!("Narration pipeline shut down");
                false
            }
        }
    }

    /// Apply a recognizer event; a final transcript is asked right away
    pub fn handle_capture_event(&mut self, event: CaptureEvent) {
        match self.capture.handle_event(event) {
            Ok(Some(transcript)) => {
                self.question_input = transcript;
                if let Err(e) = self.submit_question() {
                    self.notifications.error("Follow-up", &e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.notifications.error("Voice input", &e);
            }
        }
    }

    /// Advance the reveal and playback; returns characters revealed
    pub fn tick(&mut self, now: Instant) -> usize {
        self.playback.poll();
        self.session.advance(now)
    }

    fn is_current(&self, pending: Option<RequestTag>, tag: RequestTag) -> bool {
        pending == Some(tag) && tag.epoch == self.session.epoch()
    }

    fn send(&mut self, command: NarrationCommand) -> bool {
        match self.command_tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                let err = NarratorError::ChannelError(e.to_string());
                warn!("Failed to reach narration pipeline: {}", err);
                self.notifications.error("Error", &err);
                false
            }
        }
    }
}
