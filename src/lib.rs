//! # Geopicker
//!
//! An interactive location-selection core built in the style of a Leaflet
//! picker: a user selects a point by clicking the map, dragging the marker, or
//! asking for the device position, and the point is resolved asynchronously
//! to a city/state/country address.
//!
//! Stale or late geocoding replies never overwrite a newer selection: every
//! selection advances a generation token and results are applied in
//! generation order, not arrival order.

pub mod core;
pub mod geocoding;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod selection;
pub mod traits;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{GeocoderConfig, GeolocationOptions, PickerConfig},
    geo::LatLng,
    surface::SharedSurface,
    viewport::Viewport,
};

pub use geocoding::{nominatim::NominatimGeocoder, Address, ReverseGeocoder};

pub use geolocation::{GeolocationAdapter, GeolocationError, GeolocationProvider};

pub use selection::{
    controller::SelectionController,
    guard::{SelectionGeneration, SyncGuard},
    state::{SelectionPhase, SelectionState},
};

pub use traits::{MapViewport, ViewportEventKind, ViewportHandle};

#[cfg(feature = "egui")]
pub use ui::widget::LocationPicker;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoder replied with HTTP {status}")]
    Status { status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0} m")]
    InvalidRadius(f64),

    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Lookup task panicked: {0}")]
    TaskPanicked(String),
}

/// Misuse of a rendering surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewportError {
    #[error("surface is already initialized")]
    AlreadyInitialized,

    #[error("surface has been released")]
    Released,

    #[error("unknown viewport handle {0}")]
    UnknownHandle(u64),

    #[error("no overlays are shown")]
    NoOverlays,
}

/// Error type alias for convenience
pub type Error = PickerError;

/// Installs `env_logger` as the log backend; repeated calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
