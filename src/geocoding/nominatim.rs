use super::{Address, ReverseGeocoder};
use crate::core::config::{default_user_agent, GeocoderConfig};
use crate::core::geo::LatLng;
use crate::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use serde::Deserialize;
use crate::prelude::HashMap;

/// Shared async HTTP client for geocoding requests
///
/// No request timeout: a hung lookup only delays its own result, which the
/// controller discards anyway once the user selects elsewhere.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(default_user_agent())
        .tcp_keepalive(std::time::Duration::from_secs(30))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .expect("failed to build reqwest async client")
});

/// Locality keys, most specific first
const LOCALITY_KEYS: [&str; 5] = ["city", "town", "village", "municipality", "county"];
/// Region keys, most specific first
const REGION_KEYS: [&str; 3] = ["state", "province", "region"];
/// English alternate name inside `namedetails`
const ENGLISH_NAME_KEY: &str = "name:en";

/// Reply body of `/reverse?format=json`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NominatimReply {
    #[serde(default)]
    address: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    namedetails: Option<HashMap<String, serde_json::Value>>,
}

impl NominatimReply {
    /// Normalizes the reply; `None` when the service located nothing
    pub(crate) fn into_address(self) -> Option<Address> {
        let fields = self.address?;
        let english_name = self
            .namedetails
            .as_ref()
            .and_then(|names| non_empty(names, ENGLISH_NAME_KEY));

        let city = first_non_empty(&fields, &LOCALITY_KEYS);
        let state = first_non_empty(&fields, &REGION_KEYS);
        let country = non_empty(&fields, "country").unwrap_or_default();

        Some(Address {
            city: prefer_english(city, english_name.as_deref()),
            state: prefer_english(state, english_name.as_deref()),
            country,
        })
    }
}

fn non_empty(fields: &HashMap<String, serde_json::Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_non_empty(fields: &HashMap<String, serde_json::Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| non_empty(fields, key))
        .unwrap_or_default()
}

/// Swaps a name containing non-ASCII characters for the English alternate
///
/// Best effort: a legitimately accented name ("Québec") is also replaced when
/// an English alternate exists.
fn prefer_english(name: String, english: Option<&str>) -> String {
    match english {
        Some(english) if !name.is_ascii() => english.to_string(),
        _ => name,
    }
}

/// Reverse geocoder backed by a Nominatim-compatible `/reverse` endpoint
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig) -> Self {
        Self::with_client(HTTP_CLIENT.clone(), config)
    }

    pub fn with_client(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Builds the lookup request without sending it
    pub fn build_request(&self, coordinate: LatLng) -> Result<reqwest::Request> {
        let query = [
            ("format", "json".to_string()),
            ("lat", coordinate.lat.to_string()),
            ("lon", coordinate.lng.to_string()),
            ("zoom", self.config.zoom.to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", self.config.language.clone()),
            ("extratags", "1".to_string()),
            ("namedetails", "1".to_string()),
        ];

        let request = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .header(USER_AGENT, &self.config.user_agent)
            .build()?;
        Ok(request)
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(GeocoderConfig::default())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn resolve(&self, coordinate: LatLng) -> Result<Option<Address>> {
        let request = self.build_request(coordinate)?;
        log::debug!("Reverse geocoding {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let reply: NominatimReply = serde_json::from_slice(&body)?;
        Ok(reply.into_address())
    }
}
