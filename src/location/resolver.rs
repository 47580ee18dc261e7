//! Location resolution
//!
//! Reduces whatever the user supplied to a single description of the place.
//! Sources are ranked and never combined: a typed query or picked place beats
//! device coordinates, which beat a photo. A stale photo therefore can never
//! override something the user typed afterwards.

use crate::location::types::{Coordinates, LocationInput, LocationSource, ResolvedLocation};
use crate::services::ImageDescriber;
use crate::{NarratorError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Build the prompt used when only the device position is known
pub fn current_location_prompt(coords: Coordinates) -> String {
    format!(
        "Tell me about interesting places or hidden gems near my current location ({}).",
        coords
    )
}

pub struct LocationResolver {
    describer: Arc<dyn ImageDescriber>,
}

impl LocationResolver {
    pub fn new(describer: Arc<dyn ImageDescriber>) -> Self {
        Self { describer }
    }

    /// Pick the effective location from `inputs`.
    ///
    /// `geolocation` is the device position if one was obtained; it is used
    /// for a current-location request that carries no coordinates of its own.
    pub async fn resolve(
        &self,
        inputs: &[LocationInput],
        geolocation: Option<Coordinates>,
    ) -> Result<ResolvedLocation> {
        let named = inputs.iter().find_map(|input| match input {
            LocationInput::Text { query } if !query.trim().is_empty() => {
                Some((query.as_str(), LocationSource::Text))
            }
            LocationInput::PlaceSelection { name } if !name.trim().is_empty() => {
                Some((name.as_str(), LocationSource::PlaceSelection))
            }
            _ => None,
        });

        if let Some((description, source)) = named {
            debug!("Resolved location from {}: {}", source, description);
            return Ok(ResolvedLocation::new(description, source, geolocation));
        }

        let position = inputs.iter().find_map(|input| match input {
            LocationInput::CurrentLocation { coords } => coords.or(geolocation),
            _ => None,
        });

        if let Some(coords) = position {
            debug!("Resolved location from device position {}", coords);
            return Ok(ResolvedLocation::new(
                current_location_prompt(coords),
                LocationSource::CurrentLocation,
                Some(coords),
            ));
        }

        let image = inputs.iter().find_map(|input| match input {
            LocationInput::Image { data_uri } if !data_uri.is_empty() => Some(data_uri.as_str()),
            _ => None,
        });

        if let Some(data_uri) = image {
            info!("Describing attached image ({} bytes of data URI)", data_uri.len());
            let description = self.describer.describe(data_uri).await.map_err(|e| match e {
                NarratorError::ImageDescriptionFailed(_) => e,
                other => NarratorError::ImageDescriptionFailed(other.to_string()),
            })?;

            return match description {
                Some(text) if !text.trim().is_empty() => Ok(ResolvedLocation::new(
                    text.trim(),
                    LocationSource::Image,
                    geolocation,
                )),
                _ => {
                    warn!("Image describer returned no description");
                    Err(NarratorError::ImageDescriptionFailed(
                        "no description returned for the image".to_string(),
                    ))
                }
            };
        }

        Err(NarratorError::NoLocationProvided)
    }
}
