//! Anonymous user identifier
//!
//! A random UUID generated on first run and kept on disk. It is the only state
//! that survives between runs and is sent only as `X-User-ID`.

use crate::{NarratorError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub struct UserIdStore {
    path: PathBuf,
}

impl UserIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform's local data directory
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_local_dir().ok_or_else(|| {
            NarratorError::ConfigError("no local data directory on this platform".to_string())
        })?;
        Ok(Self::new(dir.join("aijolot").join("user_id")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored id, creating (or replacing a corrupt) one as needed
    pub fn load_or_create(&self) -> Result<UserId> {
        if let Ok(content) = fs::read_to_string(&self.path) {
            match Uuid::parse_str(content.trim()) {
                Ok(uuid) => return Ok(UserId(uuid)),
                Err(e) => warn!("Stored user id is invalid ({}); generating a new one", e),
            }
        }

        let id = UserId::generate();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id.to_string())?;
        info!("Created user id at {}", self.path.display());
        Ok(id)
    }
}
