//! Audio playback adapter
//!
//! Binds one turn's synthesized audio to the output device at a time and
//! exposes play / pause / ended state to the UI.

use crate::audio::AudioHandle;
use crate::Result;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    Ended,
}

/// Output device abstraction
pub trait AudioSink {
    /// Replace whatever is loaded with `audio`, paused at the start
    fn load(&mut self, audio: &AudioHandle) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// True once everything loaded has been played out
    fn is_finished(&self) -> bool;
}

/// Sink that discards audio; playback state still works
#[derive(Debug, Default)]
pub struct NullSink {
    loaded: bool,
}

impl AudioSink for NullSink {
    fn load(&mut self, _audio: &AudioHandle) -> Result<()> {
        self.loaded = true;
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn stop(&mut self) {
        self.loaded = false;
    }

    fn is_finished(&self) -> bool {
        !self.loaded
    }
}

#[cfg(feature = "audio-io")]
pub use rodio_sink::RodioSink;

#[cfg(feature = "audio-io")]
mod rodio_sink {
    use super::AudioSink;
    use crate::audio::AudioHandle;
    use crate::{NarratorError, Result};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::io::Cursor;

    /// Default output device through rodio
    pub struct RodioSink {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
    }

    impl RodioSink {
        pub fn new() -> Result<Self> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| NarratorError::PlaybackError(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
                sink: None,
            })
        }
    }

    impl AudioSink for RodioSink {
        fn load(&mut self, audio: &AudioHandle) -> Result<()> {
            self.stop();
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| NarratorError::PlaybackError(e.to_string()))?;
            let source = Decoder::new(Cursor::new(audio.bytes.clone()))
                .map_err(|e| NarratorError::PlaybackError(format!("decode failed: {}", e)))?;
            sink.pause();
            sink.append(source);
            self.sink = Some(sink);
            Ok(())
        }

        fn play(&mut self) {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }

        fn pause(&mut self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }

        fn is_finished(&self) -> bool {
            self.sink.as_ref().map_or(true, |sink| sink.empty())
        }
    }
}

pub struct AudioPlayback {
    sink: Box<dyn AudioSink>,
    active: Option<Uuid>,
    state: PlaybackState,
}

impl AudioPlayback {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            active: None,
            state: PlaybackState::Stopped,
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(NullSink::default()))
    }

    /// Turn whose audio is currently loaded
    pub fn active_turn(&self) -> Option<Uuid> {
        self.active
    }

    /// Playback state as seen by the player of `turn_id`
    pub fn state_for(&self, turn_id: Uuid) -> PlaybackState {
        if self.active == Some(turn_id) {
            self.state
        } else {
            PlaybackState::Stopped
        }
    }

    /// Play `audio` for `turn_id`, replacing any other turn's audio
    pub fn play(&mut self, turn_id: Uuid, audio: &AudioHandle) -> Result<()> {
        let reload = self.active != Some(turn_id) || self.state == PlaybackState::Ended;
        if reload {
            debug!("Loading audio for turn {} ({} bytes)", turn_id, audio.len());
            self.sink.load(audio)?;
            self.active = Some(turn_id);
        }
        self.sink.play();
        self.state = PlaybackState::Playing;
        info!("Playing audio for turn {}", turn_id);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.sink.pause();
            self.state = PlaybackState::Paused;
        }
    }

    pub fn toggle(&mut self, turn_id: Uuid, audio: &AudioHandle) -> Result<()> {
        if self.state_for(turn_id) == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play(turn_id, audio)
        }
    }

    pub fn stop(&mut self) {
        self.sink.stop();
        self.active = None;
        self.state = PlaybackState::Stopped;
    }

    /// Detect the end of the stream; call once per frame
    pub fn poll(&mut self) {
        if self.state == PlaybackState::Playing && self.sink.is_finished() {
            debug!("Playback ended");
            self.state = PlaybackState::Ended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        loads: usize,
        finished: bool,
    }

    struct ScriptedSink(Rc<RefCell<Log>>);

    impl AudioSink for ScriptedSink {
        fn load(&mut self, _audio: &AudioHandle) -> Result<()> {
            let mut log = self.0.borrow_mut();
            log.loads += 1;
            log.finished = false;
            Ok(())
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn is_finished(&self) -> bool {
            self.0.borrow().finished
        }
    }

    fn playback() -> (AudioPlayback, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (AudioPlayback::new(Box::new(ScriptedSink(log.clone()))), log)
    }

    #[test]
    fn test_toggle_play_pause() {
        let (mut playback, log) = playback();
        let turn = Uuid::new_v4();
        let audio = AudioHandle::mpeg(vec![1]);

        playback.toggle(turn, &audio).unwrap();
        assert_eq!(playback.state_for(turn), PlaybackState::Playing);
        playback.toggle(turn, &audio).unwrap();
        assert_eq!(playback.state_for(turn), PlaybackState::Paused);
        playback.toggle(turn, &audio).unwrap();
        assert_eq!(playback.state_for(turn), PlaybackState::Playing);
        assert_eq!(log.borrow().loads, 1);
    }

    #[test]
    fn test_one_turn_at_a_time() {
        let (mut playback, log) = playback();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let audio = AudioHandle::mpeg(vec![1]);

        playback.play(first, &audio).unwrap();
        playback.play(second, &audio).unwrap();

        assert_eq!(playback.state_for(first), PlaybackState::Stopped);
        assert_eq!(playback.state_for(second), PlaybackState::Playing);
        assert_eq!(log.borrow().loads, 2);
    }

    #[test]
    fn test_end_and_replay() {
        let (mut playback, log) = playback();
        let turn = Uuid::new_v4();
        let audio = AudioHandle::mpeg(vec![1]);

        playback.play(turn, &audio).unwrap();
        log.borrow_mut().finished = true;
        playback.poll();
        assert_eq!(playback.state_for(turn), PlaybackState::Ended);

        playback.play(turn, &audio).unwrap();
        assert_eq!(playback.state_for(turn), PlaybackState::Playing);
        assert_eq!(log.borrow().loads, 2);
    }

    #[test]
    fn test_silent_playback_tracks_state() {
        let mut playback = AudioPlayback::silent();
        let turn = Uuid::new_v4();
        playback.play(turn, &AudioHandle::mpeg(vec![1])).unwrap();
        playback.poll();
        assert_eq!(playback.state_for(turn), PlaybackState::Playing);
        playback.stop();
        assert_eq!(playback.active_turn(), None);
    }
}
