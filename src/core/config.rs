//! Configuration for the picker widget
//!
//! Every field has a sensible default so a consumer can start from
//! `PickerConfig::default()` and override only what it cares about, either
//! through the `with_*` builders or by deserializing a partial JSON document.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_RADIUS_METERS, FOCUS_ZOOM, GEOCODE_ACCEPT_LANGUAGE,
    GEOCODE_DETAIL_ZOOM, GEOCODE_LANGUAGE, GEOLOCATION_TIMEOUT_MS, MAX_ZOOM, MIN_ZOOM,
    NOMINATIM_REVERSE_URL, OVERVIEW_ZOOM,
};
use crate::core::geo::LatLng;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Camera center at mount and after a clear
    pub initial_center: LatLng,
    /// Zoom shown at mount and after a clear
    pub overview_zoom: f64,
    /// Zoom applied when the camera follows a new selection
    pub focus_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Radius of the overlay circle
    pub radius_meters: f64,
    pub geocoder: GeocoderConfig,
    pub geolocation: GeolocationOptions,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            overview_zoom: OVERVIEW_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            radius_meters: DEFAULT_RADIUS_METERS,
            geocoder: GeocoderConfig::default(),
            geolocation: GeolocationOptions::default(),
        }
    }
}

impl PickerConfig {
    pub fn with_initial_center(mut self, latitude: f64, longitude: f64) -> Self {
        self.initial_center = LatLng::new(latitude, longitude);
        self
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn with_zoom_levels(mut self, overview_zoom: f64, focus_zoom: f64) -> Self {
        self.overview_zoom = overview_zoom;
        self.focus_zoom = focus_zoom;
        self
    }

    pub fn with_geocoder(mut self, geocoder: GeocoderConfig) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn with_geolocation(mut self, geolocation: GeolocationOptions) -> Self {
        self.geolocation = geolocation;
        self
    }

    /// Parses a (possibly partial) JSON document and validates it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that would otherwise surface as odd runtime behavior
    pub fn validate(&self) -> Result<()> {
        if !self.initial_center.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "initial center ({}, {})",
                self.initial_center.lat, self.initial_center.lng
            )));
        }
        if !is_valid_radius(self.radius_meters) {
            return Err(Error::InvalidRadius(self.radius_meters));
        }
        let zooms = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("overview_zoom", self.overview_zoom),
            ("focus_zoom", self.focus_zoom),
        ];
        if let Some((name, zoom)) = zooms.iter().find(|(_, zoom)| !zoom.is_finite()) {
            return Err(Error::Config(format!("{} {} is not finite", name, zoom)));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        for (name, zoom) in [("overview_zoom", self.overview_zoom), ("focus_zoom", self.focus_zoom)] {
            if zoom < self.min_zoom || zoom > self.max_zoom {
                return Err(Error::Config(format!(
                    "{} {} is outside [{}, {}]",
                    name, zoom, self.min_zoom, self.max_zoom
                )));
            }
        }
        if self.geocoder.endpoint.trim().is_empty() {
            return Err(Error::Config("geocoder endpoint is empty".to_string()));
        }
        Ok(())
    }
}

/// A radius must be a positive, finite number of meters
pub fn is_valid_radius(radius_meters: f64) -> bool {
    radius_meters.is_finite() && radius_meters > 0.0
}

/// Reverse-geocoding service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Descriptive client identifier sent as `User-Agent`
    pub user_agent: String,
    /// `Accept-Language` header value
    pub accept_language: String,
    /// Value of the `accept-language` query parameter
    pub language: String,
    /// Nominatim detail level
    pub zoom: u8,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_REVERSE_URL.to_string(),
            user_agent: default_user_agent(),
            accept_language: GEOCODE_ACCEPT_LANGUAGE.to_string(),
            language: GEOCODE_LANGUAGE.to_string(),
            zoom: GEOCODE_DETAIL_ZOOM,
        }
    }
}

impl GeocoderConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("geopicker/{} (location picker)", env!("CARGO_PKG_VERSION"))
}

/// Options handed to the platform geolocation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    /// Accept a cached position no older than this
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: GEOLOCATION_TIMEOUT_MS,
            maximum_age_ms: 0,
        }
    }
}

impl GeolocationOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}
