//! Voice selection for speech synthesis

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceGender::Male => write!(f, "MALE"),
            VoiceGender::Female => write!(f, "FEMALE"),
            VoiceGender::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Synthesis voice parameters for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSelection {
    pub language_code: String,
    pub name: Option<String>,
    pub gender: Option<VoiceGender>,
}

/// Map a short or regional language code to a synthesis voice.
///
/// `en`, `es` and `fr` (in any region or case) get a fixed regional voice.
/// Anything else is passed through as-is with a neutral voice.
pub fn select_voice(language: &str) -> VoiceSelection {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let fixed = |code: &str, name: &str, gender: VoiceGender| VoiceSelection {
        language_code: code.to_string(),
        name: Some(name.to_string()),
        gender: Some(gender),
    };

    match primary.as_str() {
        "en" => fixed("en-US", "en-US-Standard-C", VoiceGender::Female),
        "es" => fixed("es-ES", "es-ES-Standard-A", VoiceGender::Female),
        "fr" => fixed("fr-FR", "fr-FR-Standard-A", VoiceGender::Female),
        _ => VoiceSelection {
            language_code: language.to_string(),
            name: None,
            gender: Some(VoiceGender::Neutral),
        },
    }
}
