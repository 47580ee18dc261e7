//! Narrator form state
//!
//! The form holds at most one location input. Each setter replaces whatever
//! was there, so a stale photo can never ride along with a typed query.

use crate::location::image::is_image_data_uri;
use crate::location::{Coordinates, LocationInput};
use crate::narration::request::InformationStyle;
use crate::{FieldError, NarratorError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct NarratorForm {
    pub location: Option<LocationInput>,
    pub information_style: String,
}

impl Default for NarratorForm {
    fn default() -> Self {
        Self {
            location: None,
            information_style: InformationStyle::Curious.as_str().to_string(),
        }
    }
}

impl NarratorForm {
    pub fn new(style: InformationStyle) -> Self {
        Self {
            location: None,
            information_style: style.as_str().to_string(),
        }
    }

    /// Typed text; an empty query clears the location
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.location = if query.is_empty() {
            None
        } else {
            Some(LocationInput::text(query))
        };
    }

    pub fn select_place(&mut self, name: impl Into<String>) {
        self.location = Some(LocationInput::place(name));
    }

    pub fn request_current_location(&mut self, coords: Option<Coordinates>) {
        self.location = Some(LocationInput::current_location(coords));
    }

    pub fn attach_image(&mut self, data_uri: impl Into<String>) {
        self.location = Some(LocationInput::image(data_uri));
    }

    pub fn set_style(&mut self, style: InformationStyle) {
        self.information_style = style.as_str().to_string();
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    /// Text shown in the query box
    pub fn query_text(&self) -> &str {
        match &self.location {
            Some(LocationInput::Text { query }) => query,
            Some(LocationInput::PlaceSelection { name }) => name,
            _ => "",
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self.location, Some(LocationInput::Image { .. }))
    }

    pub fn wants_current_location(&self) -> bool {
        matches!(self.location, Some(LocationInput::CurrentLocation { .. }))
    }

    pub fn inputs(&self) -> Vec<LocationInput> {
        self.location.iter().cloned().collect()
    }

    /// Structural checks only; whether a location is present at all is the
    /// resolver's call.
    pub fn validate(&self) -> Result<InformationStyle> {
        let mut errors = Vec::new();

        let style = match self.information_style.parse::<InformationStyle>() {
            Ok(style) => Some(style),
            Err(message) => {
                errors.push(FieldError::new("informationStyle", message));
                None
            }
        };

        if let Some(LocationInput::Image { data_uri }) = &self.location {
            if !data_uri.is_empty() && !is_image_data_uri(data_uri) {
                errors.push(FieldError::new(
                    "imageDataUri",
                    "must be a data:image/... URI",
                ));
            }
        }

        match style {
            Some(style) if errors.is_empty() => Ok(style),
            _ => Err(NarratorError::InvalidInput(errors)),
        }
    }
}
