use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;

/// A circle with a ground radius in meters, drawn around the selection
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusCircle {
    center: LatLng,
    radius_meters: f64,
}

impl RadiusCircle {
    pub fn new(center: LatLng, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn set_radius(&mut self, radius_meters: f64) {
        self.radius_meters = radius_meters;
    }

    /// Radius on screen for the given camera
    pub fn radius_pixels(&self, viewport: &Viewport) -> f64 {
        self.radius_meters / viewport.meters_per_pixel(self.center.lat)
    }

    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "center": {
                "lat": self.center.lat,
                "lng": self.center.lng
            },
            "radius": self.radius_meters
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    #[test]
    fn test_radius_pixels_grow_with_zoom() {
        let circle = RadiusCircle::new(LatLng::new(40.73, -73.93), 5000.0);
        let wide = Viewport::new(circle.center(), 5.0, Point::new(800.0, 600.0));
        let close = Viewport::new(circle.center(), 13.0, Point::new(800.0, 600.0));

        let ratio = circle.radius_pixels(&close) / circle.radius_pixels(&wide);
        assert!((ratio - 256.0).abs() < 1e-6);
    }
}
