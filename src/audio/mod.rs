pub mod handle;
pub mod playback;

pub use handle::AudioHandle;
pub use playback::{AudioPlayback, AudioSink, NullSink, PlaybackState};

#[cfg(feature = "audio-io")]
pub use playback::RodioSink;
