//! Device position lookup
//!
//! [`GeolocationAdapter`] turns whatever the platform offers into one async
//! call with a typed failure. It performs a single attempt; retrying is left
//! to the user pressing the button again.

use crate::core::config::GeolocationOptions;
use crate::core::geo::LatLng;
use crate::prelude::Arc;
use async_trait::async_trait;

/// Why the device position could not be obtained
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("permission to read the device location was denied")]
    PermissionDenied,

    #[error("timed out while locating the device")]
    Timeout,

    #[error("device position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Platform capability yielding the current position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<LatLng, GeolocationError>;
}

/// Always reports a fixed position
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub LatLng);

#[async_trait]
impl GeolocationProvider for StaticPosition {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<LatLng, GeolocationError> {
        Ok(self.0)
    }
}

/// A platform without any geolocation capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeolocationProvider for NoGeolocation {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<LatLng, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

#[derive(Clone)]
pub struct GeolocationAdapter {
    provider: Option<Arc<dyn GeolocationProvider>>,
    options: GeolocationOptions,
}

impl GeolocationAdapter {
    pub fn new(provider: Arc<dyn GeolocationProvider>, options: GeolocationOptions) -> Self {
        Self {
            provider: Some(provider),
            options,
        }
    }

    /// An adapter for a platform that exposes no geolocation at all
    pub fn unsupported() -> Self {
        Self {
            provider: None,
            options: GeolocationOptions::default(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.provider.is_some()
    }

    pub fn options(&self) -> &GeolocationOptions {
        &self.options
    }

    /// Obtains the device position once
    pub async fn locate(&self) -> Result<LatLng, GeolocationError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GeolocationError::Unsupported)?;

        let position = self.with_platform_timeout(provider.as_ref()).await?;
        if !position.is_valid() {
            return Err(GeolocationError::PositionUnavailable(format!(
                "provider returned ({}, {})",
                position.lat, position.lng
            )));
        }
        Ok(position)
    }

    #[cfg(feature = "tokio-runtime")]
    async fn with_platform_timeout(
        &self,
        provider: &dyn GeolocationProvider,
    ) -> Result<LatLng, GeolocationError> {
        // Outside a tokio runtime the provider's own timeout is the only one
        if tokio::runtime::Handle::try_current().is_err() {
            return provider.current_position(&self.options).await;
        }
        tokio::time::timeout(
            self.options.timeout(),
            provider.current_position(&self.options),
        )
        .await
        .unwrap_or(Err(GeolocationError::Timeout))
    }

    #[cfg(not(feature = "tokio-runtime"))]
    async fn with_platform_timeout(
        &self,
        provider: &dyn GeolocationProvider,
    ) -> Result<LatLng, GeolocationError> {
        provider.current_position(&self.options).await
    }
}

impl Default for GeolocationAdapter {
    fn default() -> Self {
        Self::unsupported()
    }
}
