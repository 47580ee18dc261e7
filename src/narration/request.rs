use crate::location::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone of the narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InformationStyle {
    Historical,
    Curious,
    Legends,
}

impl InformationStyle {
    pub const ALL: [InformationStyle; 3] = [
        InformationStyle::Historical,
        InformationStyle::Curious,
        InformationStyle::Legends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InformationStyle::Historical => "Historical",
            InformationStyle::Curious => "Curious",
            InformationStyle::Legends => "Legends",
        }
    }
}

impl fmt::Display for InformationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InformationStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InformationStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("must be one of Historical, Curious, Legends (got {:?})", s))
    }
}

/// One call to the narrative generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub location_description: String,
    pub information_style: InformationStyle,
    pub output_language: String,
    pub user_id: String,
    pub is_follow_up: bool,
    pub follow_up_question: Option<String>,
    /// Kept for callers that want it; not sent on the wire
    pub prior_narrative: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl NarrationRequest {
    /// Text sent as the `Prompt` header
    pub fn prompt(&self) -> &str {
        match (&self.follow_up_question, self.is_follow_up) {
            (Some(question), true) => question,
            _ => &self.location_description,
        }
    }

    /// Location context for follow-ups
    pub fn location_context(&self) -> Option<&str> {
        self.is_follow_up
            .then_some(self.location_description.as_str())
    }
}
