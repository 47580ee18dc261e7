//! Configuration for the narrator
//!
//! Loaded from a TOML file, then overridden from the environment.

use crate::location::Coordinates;
use crate::narration::InformationStyle;
use crate::services::vision::{DEFAULT_VISION_MODEL, DEFAULT_VISION_URL};
use crate::speech::google::DEFAULT_TTS_URL;
use crate::{NarratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "AIJOLOT_CONFIG";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationSettings {
    /// Narrative generation webhook
    pub webhook_url: String,
    /// Request timeout; none by default
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_TTS_URL.to_string(),
            api_key: None,
            timeout_ms: 60_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_VISION_URL.to_string(),
            api_key: None,
            model: DEFAULT_VISION_MODEL.to_string(),
            timeout_ms: 60_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            api_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            api_key: None,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Output language code, e.g. "en" or "es-MX"
    pub language: String,
    pub default_style: InformationStyle,
    /// Delay between revealed characters
    pub typing_interval_ms: u64,
    /// Auto-scroll only follows new text within this distance of the bottom
    pub scroll_threshold_px: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            default_style: InformationStyle::Curious,
            typing_interval_ms: 30,
            scroll_threshold_px: 50.0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeolocationSettings {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the anonymous user id lives; platform data dir when unset
    pub user_id_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    pub narration: NarrationSettings,
    pub speech: SpeechSettings,
    pub vision: VisionSettings,
    pub places: PlacesSettings,
    pub session: SessionConfig,
    pub geolocation: GeolocationSettings,
    pub storage: StorageSettings,
}

impl NarratorConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("aijolot").join("config.toml"))
    }

    /// Parse a config file; a missing file gives defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: NarratorConfig = toml::from_str(&content)
            .map_err(|e| NarratorError::ConfigError(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// File (if any) plus environment overrides
    pub fn load_default() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides through `lookup`
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("AIJOLOT_WEBHOOK_URL") {
            self.narration.webhook_url = url;
        }
        if let Some(key) = get("GOOGLE_TTS_API_KEY") {
            self.speech.api_key = Some(key);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.vision.api_key = Some(key);
        }
        if let Some(key) = get("GOOGLE_MAPS_API_KEY") {
            self.places.api_key = Some(key);
        }
        if let Some(language) = get("AIJOLOT_LANGUAGE") {
            self.session.language = language;
        }
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.narration.webhook_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.session.language = language.into();
        self
    }

    pub fn with_position(mut self, coords: Coordinates) -> Self {
        self.geolocation.latitude = Some(coords.latitude);
        self.geolocation.longitude = Some(coords.longitude);
        self
    }

    /// Text-only mode
    pub fn without_audio_output(mut self) -> Self {
        self.speech.enabled = false;
        self
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.session.typing_interval_ms)
    }

    pub fn places_timeout(&self) -> Duration {
        Duration::from_millis(self.places.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.narration.webhook_url.trim();
        if url.is_empty() {
            return Err(NarratorError::ConfigError(
                "narration.webhook_url is required (or set AIJOLOT_WEBHOOK_URL)".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NarratorError::ConfigError(format!(
                "narration.webhook_url must be an http(s) URL: {}",
                url
            )));
        }
        if self.session.language.trim().is_empty() {
            return Err(NarratorError::ConfigError(
                "session.language must not be empty".to_string(),
            ));
        }
        if self.session.typing_interval_ms == 0 {
            return Err(NarratorError::ConfigError(
                "session.typing_interval_ms must be positive".to_string(),
            ));
        }
        if let (Some(lat), Some(lon)) = (self.geolocation.latitude, self.geolocation.longitude) {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(NarratorError::ConfigError(format!(
                    "geolocation out of range: {}, {}",
                    lat, lon
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert!(config.speech.enabled);
        assert_eq!(config.session.language, "en");
        assert_eq!(config.session.typing_interval_ms, 30);
        assert_eq!(config.places.timeout_ms, 5_000);
        assert!(config.geolocation.coordinates().is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = NarratorConfig::default()
            .with_webhook_url("https://example.com/narrate")
            .with_language("es")
            .without_audio_output();

        assert!(!config.speech.enabled);
        assert_eq!(config.session.language, "es");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_webhook() {
        assert!(matches!(
            NarratorConfig::default().validate(),
            Err(NarratorError::ConfigError(_))
        ));
        assert!(NarratorConfig::default()
            .with_webhook_url("ftp://example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[narration]
webhook_url = "https://example.com/hook"

[session]
language = "fr"
default_style = "Legends"

[geolocation]
latitude = 48.8584
longitude = 2.2945
"#
        )
        .unwrap();

        let config = NarratorConfig::load(file.path()).unwrap();
        assert_eq!(config.narration.webhook_url, "https://example.com/hook");
        assert_eq!(config.session.language, "fr");
        assert_eq!(config.session.default_style, InformationStyle::Legends);
        assert_eq!(config.session.typing_interval_ms, 30);
        assert_eq!(
            config.geolocation.coordinates(),
            Some(Coordinates::new(48.8584, 2.2945))
        );
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = NarratorConfig::load(dir.path().join("absent.toml")).unwrap();
        assert!(config.narration.webhook_url.is_empty());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session\nlanguage = ").unwrap();
        assert!(matches!(
            NarratorConfig::load(file.path()),
            Err(NarratorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AIJOLOT_WEBHOOK_URL", "https://hook.example"),
            ("GOOGLE_MAPS_API_KEY", "maps-key"),
            ("AIJOLOT_LANGUAGE", ""),
        ]
        .into_iter()
        .collect();

        let config = NarratorConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.narration.webhook_url, "https://hook.example");
        assert_eq!(config.places.api_key.as_deref(), Some("maps-key"));
        // Blank values do not override
        assert_eq!(config.session.language, "en");
    }
}
