use crate::location::Coordinates;
use crate::{NarratorError, Result};

/// Source of the device position
pub trait GeolocationProvider: Send {
    fn current_position(&self) -> Result<Coordinates>;
}

/// Position fixed in configuration; desktops have no positioning hardware
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocation {
    position: Option<Coordinates>,
}

impl ConfiguredGeolocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl GeolocationProvider for ConfiguredGeolocation {
    fn current_position(&self) -> Result<Coordinates> {
        self.position.ok_or_else(|| {
            NarratorError::GeolocationUnavailable(
                "no position configured; set [geolocation] latitude and longitude".to_string(),
            )
        })
    }
}
