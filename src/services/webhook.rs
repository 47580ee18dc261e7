//! Narrative generation webhook client
//!
//! The webhook takes everything in headers and answers with the narrative as
//! a plain text body.

use crate::narration::NarrationRequest;
use crate::services::{http_client, NarrativeService};
use crate::{NarratorError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, error};

/// Replace characters that cannot appear in a header value
pub fn sanitize_header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Headers for one narration request
pub fn build_headers(request: &NarrationRequest) -> Result<HeaderMap> {
    let (latitude, longitude) = match request.coordinates {
        Some(coords) => (coords.latitude.to_string(), coords.longitude.to_string()),
        None => (String::new(), String::new()),
    };

    let mut fields = vec![
        ("style", request.information_style.as_str().to_string()),
        ("prompt", request.prompt().to_string()),
        ("x-user-id", request.user_id.clone()),
        ("x-output-language", request.output_language.clone()),
        ("x-latitude", latitude),
        ("x-longitude", longitude),
        ("follow-up", request.is_follow_up.to_string()),
    ];
    if let Some(context) = request.location_context() {
        fields.push(("x-location-context", context.to_string()));
    }

    let mut headers = HeaderMap::new();
    for (name, value) in fields {
        let value = HeaderValue::from_bytes(sanitize_header_value(&value).as_bytes())
            .map_err(|e| NarratorError::NarrationServiceFailed(format!("bad {} header: {}", name, e)))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}

pub struct WebhookNarrator {
    url: String,
    client: reqwest::Client,
}

impl WebhookNarrator {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl NarrativeService for WebhookNarrator {
    async fn generate(&self, request: &NarrationRequest) -> Result<String> {
        if self.url.trim().is_empty() {
            return Err(NarratorError::NarrationServiceFailed(
                "webhook URL is not configured".to_string(),
            ));
        }

        let headers = build_headers(request)?;
        debug!(
            "POST narration webhook (follow-up: {}, {} headers)",
            request.is_follow_up,
            headers.len()
        );

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| NarratorError::NarrationServiceFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NarratorError::NarrationServiceFailed(e.to_string()))?;

        if !status.is_success() {
            error!("Narration webhook returned {}: {}", status, body);
            return Err(NarratorError::NarrationServiceFailed(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use crate::narration::InformationStyle;

    fn request() -> NarrationRequest {
        NarrationRequest {
            location_description: "Plaza Mayor, Madrid".into(),
            information_style: InformationStyle::Legends,
            output_language: "es".into(),
            user_id: "5f0c".into(),
            is_follow_up: false,
            follow_up_question: None,
            prior_narrative: Some("Long ago...".into()),
            coordinates: None,
        }
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a [u8] {
        headers.get(name).map(|v| v.as_bytes()).unwrap_or_default()
    }

    #[test]
    fn test_initial_headers() {
        let headers = build_headers(&request()).unwrap();
        assert_eq!(header(&headers, "Style"), b"Legends");
        assert_eq!(header(&headers, "Prompt"), b"Plaza Mayor, Madrid");
        assert_eq!(header(&headers, "X-User-ID"), b"5f0c");
        assert_eq!(header(&headers, "X-Output-Language"), b"es");
        assert_eq!(header(&headers, "X-Latitude"), b"");
        assert_eq!(header(&headers, "Follow-Up"), b"false");
        assert!(headers.get("X-Location-Context").is_none());
    }

    #[test]
    fn test_follow_up_headers() {
        let mut req = request();
        req.is_follow_up = true;
        req.follow_up_question = Some("¿Qué pasó aquí en 1621?".into());
        req.coordinates = Some(Coordinates::new(40.4155, -3.7074));

        let headers = build_headers(&req).unwrap();
        assert_eq!(header(&headers, "Follow-Up"), b"true");
        assert_eq!(header(&headers, "Prompt"), "¿Qué pasó aquí en 1621?".as_bytes());
        assert_eq!(header(&headers, "X-Location-Context"), b"Plaza Mayor, Madrid");
        assert_eq!(header(&headers, "X-Latitude"), b"40.4155");
        assert_eq!(header(&headers, "X-Longitude"), b"-3.7074");
        // The prior narrative never goes on the wire
        assert!(headers
            .values()
            .all(|v| v.as_bytes() != b"Long ago..."));
    }

    #[test]
    fn test_control_characters_are_replaced() {
        assert_eq!(sanitize_header_value("line\r\nbreak\ttab"), "line  break tab");

        let mut req = request();
        req.location_description = "Evil\r\nX-Injected: 1".into();
        let headers = build_headers(&req).unwrap();
        assert_eq!(header(&headers, "Prompt"), b"Evil  X-Injected: 1");
        assert!(headers.get("X-Injected").is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_url_fails() {
        let narrator = WebhookNarrator::new("", None).unwrap();
        assert!(matches!(
            narrator.generate(&request()).await,
            Err(NarratorError::NarrationServiceFailed(_))
        ));
    }
}
