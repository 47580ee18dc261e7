//! Voice capture adapter
//!
//! Wraps a host speech recognizer (anything that yields a final transcript)
//! in a start/stop/result/error state machine. The microphone is exclusive:
//! it is released exactly once for every successful start, whichever of
//! stop, error or end comes first.

use crate::{NarratorError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

/// Something the recognizer reported while recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Final transcript of the utterance
    Transcript(String),
    /// The user (or OS) refused microphone access
    PermissionDenied,
    /// Any other recognition failure
    Failed(String),
    /// The recognizer stopped on its own
    Ended,
}

/// Host speech recognition capability
pub trait CaptureBackend: Send {
    fn available(&self) -> bool;

    /// Acquire the microphone and start recognizing in `language`
    fn start(&mut self, language: &str) -> Result<()>;

    /// Release the microphone
    fn stop(&mut self);

    /// Next pending recognizer event, if any
    fn poll_event(&mut self) -> Option<CaptureEvent>;
}

/// Backend for hosts without speech recognition
#[derive(Debug, Default)]
pub struct UnavailableCapture;

impl CaptureBackend for UnavailableCapture {
    fn available(&self) -> bool {
        false
    }

    fn start(&mut self, _language: &str) -> Result<()> {
        Err(NarratorError::CaptureUnavailable(
            "speech recognition is not supported on this host".to_string(),
        ))
    }

    fn stop(&mut self) {}

    fn poll_event(&mut self) -> Option<CaptureEvent> {
        None
    }
}

/// Backend fed by an external recognizer through a channel.
///
/// The recognizer process pushes [`CaptureEvent`]s into the [`Sender`]
/// returned by [`ChannelCapture::new`]; start and stop are forwarded as
/// [`CaptureControl`] messages.
pub struct ChannelCapture {
    control_tx: Sender<CaptureControl>,
    event_rx: Receiver<CaptureEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureControl {
    Start { language: String },
    Stop,
}

impl ChannelCapture {
    /// Returns the backend plus the recognizer's ends of both channels
    pub fn new() -> (Self, Receiver<CaptureControl>, Sender<CaptureEvent>) {
        let (control_tx, control_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        (
            Self {
                control_tx,
                event_rx,
            },
            control_rx,
            event_tx,
        )
    }
}

impl CaptureBackend for ChannelCapture {
    fn available(&self) -> bool {
        true
    }

    fn start(&mut self, language: &str) -> Result<()> {
        self.control_tx
            .send(CaptureControl::Start {
                language: language.to_string(),
            })
            .map_err(|_| NarratorError::CaptureGenericError("recognizer disconnected".into()))
    }

    fn stop(&mut self) {
        let _ = self.control_tx.send(CaptureControl::Stop);
    }

    fn poll_event(&mut self) -> Option<CaptureEvent> {
        self.event_rx.try_recv().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Error,
}

#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub state: RecordingState,
    pub last_transcript: Option<String>,
    pub last_error: Option<NarratorError>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self {
            state: RecordingState::Idle,
            last_transcript: None,
            last_error: None,
        }
    }
}

pub struct VoiceCapture {
    backend: Box<dyn CaptureBackend>,
    session: RecordingSession,
    mic_held: bool,
}

impl VoiceCapture {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            session: RecordingSession::default(),
            mic_held: false,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(Box::new(UnavailableCapture))
    }

    pub fn is_available(&self) -> bool {
        self.backend.available()
    }

    pub fn is_recording(&self) -> bool {
        self.session.state == RecordingState::Recording
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Start recording if idle, stop if recording
    pub fn toggle(&mut self, language: &str) -> Result<()> {
        if self.is_recording() {
            self.stop();
            Ok(())
        } else {
            self.start(language)
        }
    }

    pub fn start(&mut self, language: &str) -> Result<()> {
        if !self.backend.available() {
            let err = NarratorError::CaptureUnavailable(
                "speech recognition is not supported on this host".to_string(),
            );
            warn!("{}", err);
            return Err(err);
        }

        // A new capture always starts from a released microphone
        self.release();
        self.session = RecordingSession::default();

        match self.backend.start(language) {
            Ok(()) => {
                info!("Recording started ({})", language);
                self.mic_held = true;
                self.session.state = RecordingState::Recording;
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    NarratorError::CapturePermissionDenied
                    | NarratorError::CaptureUnavailable(_) => e,
                    other => NarratorError::CaptureGenericError(other.to_string()),
                };
                warn!("Failed to start recording: {}", err);
                self.session.state = RecordingState::Error;
                self.session.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn stop(&mut self) {
        debug!("Recording stopped by user");
        self.release();
        if self.session.state == RecordingState::Recording {
            self.session.state = RecordingState::Idle;
        }
    }

    /// Next recognizer event, if any
    pub fn poll(&mut self) -> Option<CaptureEvent> {
        self.backend.poll_event()
    }

    /// Apply a recognizer event.
    ///
    /// Returns the transcript to submit as a question, if the event carried a
    /// non-empty one.
    pub fn handle_event(&mut self, event: CaptureEvent) -> Result<Option<String>> {
        match event {
            CaptureEvent::Transcript(text) => {
                self.release();
                self.session.state = RecordingState::Idle;
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Ok(None);
                }
                info!("Transcript received ({} chars)", text.len());
                self.session.last_transcript = Some(text.clone());
                Ok(Some(text))
            }
            CaptureEvent::PermissionDenied => {
                self.fail(NarratorError::CapturePermissionDenied)
            }
            CaptureEvent::Failed(reason) => self.fail(NarratorError::CaptureGenericError(reason)),
            CaptureEvent::Ended => {
                self.release();
                if self.session.state == RecordingState::Recording {
                    self.session.state = RecordingState::Idle;
                }
                Ok(None)
            }
        }
    }

    fn fail(&mut self, err: NarratorError) -> Result<Option<String>> {
        warn!("Speech recognition error: {}", err);
        self.release();
        self.session.state = RecordingState::Error;
        self.session.last_error = Some(err.clone());
        Err(err)
    }

    fn release(&mut self) {
        if self.mic_held {
            self.mic_held = false;
            self.backend.stop();
        }
    }
}

impl Drop for VoiceCapture {
    fn drop(&mut self) {
        self.release();
    }
}
