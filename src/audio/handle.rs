use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Encoded audio ready for playback
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioHandle {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AudioHandle {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// MP3 audio as returned by speech synthesis
    pub fn mpeg(bytes: Vec<u8>) -> Self {
        Self::new("audio/mpeg", bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

// Audio payloads are large; keep logs readable
impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
