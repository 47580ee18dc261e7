//! Image description through the Gemini `generateContent` REST API

use crate::location::image::decode_data_uri;
use crate::services::{http_client, ImageDescriber};
use crate::{NarratorError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_VISION_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.0-flash";

const DESCRIBE_INSTRUCTION: &str = "Identify the main landmark, scenic view or notable \
place in this photo and describe it in one short phrase, such as \"The Eiffel Tower in Paris\". \
If the place is not well known, describe it generally, such as \"A quiet beach lined with palm trees\".";

pub struct GeminiImageDescriber {
    api_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiImageDescriber {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            client: http_client(Some(timeout))?,
        })
    }

    fn request_body(mime: &str, bytes: &[u8]) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": DESCRIBE_INSTRUCTION },
                    { "inline_data": { "mime_type": mime, "data": STANDARD.encode(bytes) } }
                ]
            }]
        })
    }

    fn extract_text(body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl ImageDescriber for GeminiImageDescriber {
    async fn describe(&self, image_data_uri: &str) -> Result<Option<String>> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            NarratorError::ImageDescriptionFailed("service is not configured".into())
        })?;
        let (mime, bytes) = decode_data_uri(image_data_uri).ok_or_else(|| {
            NarratorError::ImageDescriptionFailed("image is not a base64 data URI".into())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );
        debug!("Describing {} image ({} bytes) with {}", mime, bytes.len(), self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&Self::request_body(&mime, &bytes))
            .send()
            .await
            .map_err(|e| NarratorError::ImageDescriptionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Image description API error {}: {}", status, body);
            return Err(NarratorError::ImageDescriptionFailed(format!(
                "status {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NarratorError::ImageDescriptionFailed(e.to_string()))?;
        Ok(Self::extract_text(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_inline_image() {
        let body = GeminiImageDescriber::request_body("image/png", b"ID3");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "SUQz");
        assert!(parts[0]["text"].as_str().unwrap().contains("landmark"));
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": " The Colosseum in Rome \n" }] } }]
        });
        assert_eq!(
            GeminiImageDescriber::extract_text(&body).as_deref(),
            Some("The Colosseum in Rome")
        );
        assert_eq!(GeminiImageDescriber::extract_text(&json!({ "candidates": [] })), None);
    }
}
