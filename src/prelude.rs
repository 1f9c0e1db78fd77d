//! Prelude module for common geopicker types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geopicker::prelude::*;`

pub use crate::core::{
    config::{GeocoderConfig, GeolocationOptions, PickerConfig},
    geo::{LatLng, Point},
    surface::SharedSurface,
    viewport::Viewport,
};

pub use crate::layers::{circle::RadiusCircle, marker::Marker};

pub use crate::geocoding::{nominatim::NominatimGeocoder, Address, ReverseGeocoder};

pub use crate::geolocation::{
    GeolocationAdapter, GeolocationError, GeolocationProvider, NoGeolocation, StaticPosition,
};

pub use crate::input::{events::PickerEvent, handler::EventManager};

pub use crate::selection::{
    controller::SelectionController,
    guard::{SelectionGeneration, SyncGuard},
    state::{SelectionPhase, SelectionState},
};

pub use crate::traits::{MapViewport, ViewportCallback, ViewportEventKind, ViewportHandle};

pub use crate::runtime::{runtime, AsyncHandle, AsyncSpawner};

#[cfg(feature = "egui")]
pub use crate::ui::widget::LocationPicker;

pub use crate::{Error as PickerError, Result, ViewportError};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
