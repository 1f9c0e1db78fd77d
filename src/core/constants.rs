//! Core constants for the picker, derived from common web-map conventions.
//! Keeping them in a single place makes it easier to tweak picker-wide magic numbers.

/// Country-wide centroid used when no initial position is configured (India).
pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);

/// Wide, continent-level zoom shown at mount and after a clear.
pub const OVERVIEW_ZOOM: f64 = 5.0;

/// Close-in zoom the camera jumps to after a click or a located position.
pub const FOCUS_ZOOM: f64 = 13.0;

/// Zoom limits of the camera.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Radius of the overlay circle when none is configured.
pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

/// Default square tile size in pixels, the unit of the projection.
pub const TILE_SIZE: f64 = 256.0;

/// Public Nominatim reverse-geocoding endpoint.
pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Nominatim zoom 18 means building-level detail.
pub const GEOCODE_DETAIL_ZOOM: u8 = 18;

/// `Accept-Language` header sent with geocoding requests.
pub const GEOCODE_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Language requested through the `accept-language` query parameter.
pub const GEOCODE_LANGUAGE: &str = "en";

/// Platform timeout handed to the geolocation provider.
pub const GEOLOCATION_TIMEOUT_MS: u64 = 10_000;

/// Screen distance (in points) within which a press grabs the marker.
pub const MARKER_GRAB_RADIUS: f32 = 14.0;
