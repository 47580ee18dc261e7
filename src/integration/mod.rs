//! Wiring between the UI and the narration machinery

pub mod config;
pub mod controller;
pub mod geolocation;
pub mod notify;
pub mod pipeline;

pub use config::NarratorConfig;
pub use controller::{ScreenMode, SessionController, SessionSettings};
pub use geolocation::{ConfiguredGeolocation, GeolocationProvider};
pub use notify::{Notification, NotificationLevel, Notifications};
pub use pipeline::{NarrationCommand, NarrationEvent, NarrationPipeline, RequestTag};
