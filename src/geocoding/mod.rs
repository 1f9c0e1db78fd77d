//! Reverse geocoding: coordinate to city/state/country
//!
//! A resolver answers `Ok(Some(address))` when the service located the point,
//! `Ok(None)` when the service answered but knows no address there, and `Err`
//! when the request itself failed (network error, non-2xx reply, bad JSON).

pub mod nominatim;

use crate::core::geo::LatLng;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved address; missing parts are empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Address {
    pub fn new(city: impl Into<String>, state: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }

    /// True when every part is empty
    pub fn is_blank(&self) -> bool {
        self.city.is_empty() && self.state.is_empty() && self.country.is_empty()
    }

    /// `"city, state, country"`, skipping empty parts
    pub fn display_line(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_line())
    }
}

/// Translates a coordinate into an address
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Issues exactly one lookup for `coordinate`
    async fn resolve(&self, coordinate: LatLng) -> Result<Option<Address>>;
}
