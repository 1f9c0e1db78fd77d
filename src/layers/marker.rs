use crate::core::geo::LatLng;

/// The selection pin
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: LatLng,
    draggable: bool,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            draggable: false,
        }
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "draggable": self.draggable
        })
    }
}
