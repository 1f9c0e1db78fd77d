use crate::core::geo::LatLng;
use crate::traits::ViewportEventKind;
use serde::{Deserialize, Serialize};

/// Everything the selection controller reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickerEvent {
    /// Click/tap on the map surface
    MapClicked(LatLng),
    /// The marker was dropped at a new position
    MarkerDragEnded(LatLng),
    /// The user asked for the device position
    GeolocateRequested,
    /// The user cleared the selection
    Clear,
    /// The overlay radius changed
    RadiusChanged(f64),
}

impl PickerEvent {
    /// Wraps a raw surface event
    pub fn from_viewport(kind: ViewportEventKind, lat_lng: LatLng) -> Self {
        match kind {
            ViewportEventKind::MapClicked => PickerEvent::MapClicked(lat_lng),
            ViewportEventKind::MarkerDragEnded => PickerEvent::MarkerDragEnded(lat_lng),
        }
    }

    /// Gets the coordinate carried by this event, if any
    pub fn position(&self) -> Option<LatLng> {
        match self {
            PickerEvent::MapClicked(lat_lng) | PickerEvent::MarkerDragEnded(lat_lng) => {
                Some(*lat_lng)
            }
            _ => None,
        }
    }

    /// Checks if this event starts a new selection on its own
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            PickerEvent::MapClicked(_) | PickerEvent::MarkerDragEnded(_)
        )
    }
}
