pub mod image;
pub mod resolver;
pub mod types;

pub use resolver::{current_location_prompt, LocationResolver};
pub use types::{Coordinates, LocationInput, LocationSource, ResolvedLocation};
