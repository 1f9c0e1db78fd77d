//! Overlay primitives drawn on top of the map surface

pub mod circle;
pub mod marker;

use crate::core::geo::LatLng;
use circle::RadiusCircle;
use marker::Marker;

/// The marker and its radius circle, always co-located
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPair {
    pub marker: Marker,
    pub circle: RadiusCircle,
}

impl OverlayPair {
    /// Creates a draggable marker with a circle around it
    pub fn new(position: LatLng, radius_meters: f64) -> Self {
        Self {
            marker: Marker::new(position).draggable(true),
            circle: RadiusCircle::new(position, radius_meters),
        }
    }

    pub fn position(&self) -> LatLng {
        self.marker.position()
    }

    /// Moves both overlays to a new position
    pub fn move_to(&mut self, position: LatLng) {
        self.marker.set_position(position);
        self.circle.set_center(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_moves_together() {
        let mut pair = OverlayPair::new(LatLng::new(40.73, -73.93), 5000.0);
        assert!(pair.marker.is_draggable());

        pair.move_to(LatLng::new(40.74, -73.99));
        assert_eq!(pair.marker.position(), LatLng::new(40.74, -73.99));
        assert_eq!(pair.circle.center(), LatLng::new(40.74, -73.99));
        assert_eq!(pair.circle.radius_meters(), 5000.0);
    }
}
