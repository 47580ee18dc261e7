//! Google Cloud Text-to-Speech REST client

use crate::services::{http_client, SpeechSynthesizer};
use crate::speech::voice::VoiceSelection;
use crate::{NarratorError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_TTS_URL: &str = "https://texttospeech.googleapis.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

pub struct GoogleTts {
    api_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GoogleTts {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: http_client(Some(timeout))?,
        })
    }

    fn request_body(text: &str, voice: &VoiceSelection) -> Value {
        let mut voice_params = json!({ "languageCode": voice.language_code });
        if let Some(name) = &voice.name {
            voice_params["name"] = json!(name);
        }
        if let Some(gender) = voice.gender {
            voice_params["ssmlGender"] = json!(gender.to_string());
        }

        json!({
            "input": { "text": text },
            "voice": voice_params,
            "audioConfig": { "audioEncoding": "MP3" },
        })
    }

    fn decode_audio(body: &str) -> Result<Vec<u8>> {
        let response: SynthesizeResponse = serde_json::from_str(body)
            .map_err(|e| NarratorError::SynthesisFailed(format!("malformed response: {}", e)))?;
        let content = response
            .audio_content
            .ok_or_else(|| NarratorError::SynthesisFailed("no audio content returned".into()))?;
        STANDARD
            .decode(content.as_bytes())
            .map_err(|e| NarratorError::SynthesisFailed(format!("invalid audio content: {}", e)))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Vec<u8>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NarratorError::SynthesisFailed("service is not configured".into()))?;

        let url = format!("{}/v1/text:synthesize", self.api_url);
        debug!("POST {} ({})", url, voice.language_code);

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&Self::request_body(text, voice))
            .send()
            .await
            .map_err(|e| NarratorError::SynthesisFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NarratorError::SynthesisFailed(e.to_string()))?;

        if !status.is_success() {
            error!("Text-to-speech API error {}: {}", status, body);
            return Err(NarratorError::SynthesisFailed(format!(
                "status {}",
                status.as_u16()
            )));
        }

        Self::decode_audio(&body)
    }
}
