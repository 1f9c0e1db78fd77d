use crate::core::geo::LatLng;
use crate::geocoding::Address;
use crate::geolocation::GeolocationError;

/// Where the selection state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    /// Nothing selected, overlays hidden
    #[default]
    Idle,
    /// Coordinate set, resolution in flight
    Selecting,
    /// Resolution finished, with or without an address
    Resolved,
}

/// Single source of truth for the picker
///
/// Only the selection controller writes it. `address` is only ever set by the
/// resolution started for the current `coordinate`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub phase: SelectionPhase,
    pub coordinate: Option<LatLng>,
    pub address: Option<Address>,
    pub is_resolving: bool,
    pub is_locating_device: bool,
    pub radius_meters: f64,
    /// Last geolocation failure, shown until dismissed
    pub notice: Option<GeolocationError>,
}

impl SelectionState {
    pub fn new(radius_meters: f64) -> Self {
        Self {
            phase: SelectionPhase::Idle,
            coordinate: None,
            address: None,
            is_resolving: false,
            is_locating_device: false,
            radius_meters,
            notice: None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.coordinate.is_some()
    }

    /// True while any asynchronous work is outstanding
    pub fn is_busy(&self) -> bool {
        self.is_resolving || self.is_locating_device
    }

    pub(crate) fn begin_selection(&mut self, coordinate: LatLng) {
        self.phase = SelectionPhase::Selecting;
        self.coordinate = Some(coordinate);
        self.address = None;
        self.is_resolving = true;
    }

    pub(crate) fn finish_resolution(&mut self, address: Option<Address>) {
        self.phase = SelectionPhase::Resolved;
        self.address = address;
        self.is_resolving = false;
    }

    pub(crate) fn reset(&mut self) {
        self.phase = SelectionPhase::Idle;
        self.coordinate = None;
        self.address = None;
        self.is_resolving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_lifecycle() {
        let mut state = SelectionState::new(5000.0);
        assert_eq!(state.phase, SelectionPhase::Idle);
        assert!(!state.has_selection());

        state.begin_selection(LatLng::new(1.0, 2.0));
        assert_eq!(state.phase, SelectionPhase::Selecting);
        assert!(state.is_busy());
        assert_eq!(state.address, None);

        state.finish_resolution(Some(Address::new("A", "B", "C")));
        assert_eq!(state.phase, SelectionPhase::Resolved);
        assert!(!state.is_busy());

        // A new selection drops the previous address
        state.begin_selection(LatLng::new(3.0, 4.0));
        assert_eq!(state.address, None);

        state.reset();
        assert_eq!(state, SelectionState::new(5000.0));
    }
}
