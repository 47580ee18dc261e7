//! Place suggestions: autocomplete and nearby search
//!
//! Suggestions only help the user fill the form. Any failure here degrades to
//! an empty list at the controller; it never blocks typing a place by hand.

use crate::location::Coordinates;
use crate::services::http_client;
use crate::{NarratorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Autocomplete is only worth asking for once the query has this many characters
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

/// Nearby search returns at most this many places
pub const MAX_NEARBY_RESULTS: usize = 5;

/// Radius for nearby search, in metres
pub const NEARBY_RADIUS_M: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub description: String,
    pub id: String,
}

#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceSuggestion>>;
    async fn nearby(&self, coords: Coordinates) -> Result<Vec<PlaceSuggestion>>;
}

/// Whether a partial query is long enough to look up
pub fn wants_autocomplete(query: &str) -> bool {
    query.trim().chars().count() >= MIN_AUTOCOMPLETE_CHARS
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    name: Option<String>,
    place_id: Option<String>,
}

fn parse_autocomplete(body: &str) -> Result<Vec<PlaceSuggestion>> {
    let response: AutocompleteResponse = serde_json::from_str(body)
        .map_err(|e| NarratorError::AutocompleteFailed(format!("malformed response: {}", e)))?;

    match response.status.as_str() {
        "OK" => Ok(response
            .predictions
            .into_iter()
            .map(|p| PlaceSuggestion {
                description: p.description,
                id: p.place_id,
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => {
            error!(
                "Places autocomplete error: {} {}",
                status,
                response.error_message.unwrap_or_default()
            );
            Err(NarratorError::AutocompleteFailed(status.to_string()))
        }
    }
}

fn parse_nearby(body: &str) -> Result<Vec<PlaceSuggestion>> {
    let response: NearbyResponse = serde_json::from_str(body)
        .map_err(|e| NarratorError::NearbyLookupFailed(format!("malformed response: {}", e)))?;

    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .filter_map(|place| match (place.name, place.place_id) {
                (Some(name), Some(id)) if !name.is_empty() && !id.is_empty() => {
                    Some(PlaceSuggestion {
                        description: name,
                        id,
                    })
                }
                _ => None,
            })
            .take(MAX_NEARBY_RESULTS)
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => {
            error!(
                "Places nearby search error: {} {}",
                status,
                response.error_message.unwrap_or_default()
            );
            Err(NarratorError::NearbyLookupFailed(status.to_string()))
        }
    }
}

/// Google Places web service client
pub struct GooglePlaces {
    api_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GooglePlaces {
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

    async fn get(&self, path: &str, params: &[(&str, String)]) -> std::result::Result<String, String> {
        let url = format!("{}/{}", self.api_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl PlaceLookup for GooglePlaces {
    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceSuggestion>> {
        let key = self
            .api_key
            .clone()
            .ok_or_else(|| NarratorError::AutocompleteFailed("service is not configured".into()))?;
        if !wants_autocomplete(query) {
            return Ok(Vec::new());
        }

        debug!("Autocomplete lookup for {:?}", query);
        let body = self
            .get(
                "autocomplete/json",
                &[("input", query.to_string()), ("key", key)],
            )
            .await
            .map_err(NarratorError::AutocompleteFailed)?;
        parse_autocomplete(&body)
    }

    async fn nearby(&self, coords: Coordinates) -> Result<Vec<PlaceSuggestion>> {
        let key = self
            .api_key
            .clone()
            .ok_or_else(|| NarratorError::NearbyLookupFailed("service is not configured".into()))?;

        debug!("Nearby lookup around {}", coords);
        let body = self
            .get(
                "nearbysearch/json",
                &[
                    ("location", format!("{},{}", coords.latitude, coords.longitude)),
                    ("radius", NEARBY_RADIUS_M.to_string()),
                    ("type", "tourist_attraction".to_string()),
                    ("rankby", "prominence".to_string()),
                    ("key", key),
                ],
            )
            .await
            .map_err(NarratorError::NearbyLookupFailed)?;
        parse_nearby(&body)
    }
}
