use serde::{Deserialize, Serialize};
use std::fmt;

/// Device coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.4}, Lon: {:.4}", self.latitude, self.longitude)
    }
}

/// One way of saying "where"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationInput {
    /// Free text typed by the user
    Text { query: String },
    /// "Use my current location"; coordinates arrive once the device answers
    CurrentLocation { coords: Option<Coordinates> },
    /// A photo encoded as `data:image/...;base64,...`
    Image { data_uri: String },
    /// A place picked from autocomplete or nearby suggestions
    PlaceSelection { name: String },
}

impl LocationInput {
    pub fn text(query: impl Into<String>) -> Self {
        LocationInput::Text {
            query: query.into(),
        }
    }

    pub fn place(name: impl Into<String>) -> Self {
        LocationInput::PlaceSelection { name: name.into() }
    }

    pub fn image(data_uri: impl Into<String>) -> Self {
        LocationInput::Image {
            data_uri: data_uri.into(),
        }
    }

    pub fn current_location(coords: Option<Coordinates>) -> Self {
        LocationInput::CurrentLocation { coords }
    }

    pub fn source(&self) -> LocationSource {
        match self {
            LocationInput::Text { .. } => LocationSource::Text,
            LocationInput::CurrentLocation { .. } => LocationSource::CurrentLocation,
            LocationInput::Image { .. } => LocationSource::Image,
            LocationInput::PlaceSelection { .. } => LocationSource::PlaceSelection,
        }
    }

    /// Whether this input carries anything usable on its own
    pub fn is_empty(&self) -> bool {
        match self {
            LocationInput::Text { query } => query.trim().is_empty(),
            LocationInput::PlaceSelection { name } => name.trim().is_empty(),
            LocationInput::Image { data_uri } => data_uri.is_empty(),
            LocationInput::CurrentLocation { .. } => false,
        }
    }
}

/// Which input modality produced a resolved location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    Text,
    PlaceSelection,
    CurrentLocation,
    Image,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::Text => write!(f, "text"),
            LocationSource::PlaceSelection => write!(f, "place selection"),
            LocationSource::CurrentLocation => write!(f, "current location"),
            LocationSource::Image => write!(f, "image"),
        }
    }
}

/// The canonical description of a place, fixed for the rest of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    description: String,
    source: LocationSource,
    coordinates: Option<Coordinates>,
}

impl ResolvedLocation {
    pub fn new(
        description: impl Into<String>,
        source: LocationSource,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            description: description.into(),
            source,
            coordinates,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source(&self) -> LocationSource {
        self.source
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}
