use crate::core::geo::LatLng;
use crate::prelude::HashMap;
use crate::traits::{ViewportCallback, ViewportEventKind};
use std::collections::VecDeque;

/// Event management for one rendering surface
///
/// Raw events are queued first and handed out together with their listeners,
/// so the owner can release its own lock before running any callback.
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event kind
    listeners: HashMap<ViewportEventKind, Vec<ViewportCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<(ViewportEventKind, LatLng)>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on(&mut self, kind: ViewportEventKind, callback: ViewportCallback) {
        self.listeners.entry(kind).or_default().push(callback);
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, kind: ViewportEventKind, lat_lng: LatLng) {
        self.event_queue.push_back((kind, lat_lng));
    }

    /// Drain the queue, pairing each event with the listeners to call
    pub fn take_dispatch(&mut self) -> Vec<(ViewportCallback, LatLng)> {
        let mut dispatch = Vec::new();
        for (kind, lat_lng) in self.event_queue.drain(..) {
            if let Some(callbacks) = self.listeners.get(&kind) {
                log::debug!("Dispatching {} to {} listener(s)", kind.as_str(), callbacks.len());
                dispatch.extend(callbacks.iter().map(|callback| (callback.clone(), lat_lng)));
            }
        }
        dispatch
    }

    /// Number of listeners registered for a kind
    pub fn listener_count(&self, kind: ViewportEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Drop all listeners and pending events
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.event_queue.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{Arc, Mutex};

    #[test]
    fn test_dispatch_pairs_events_with_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut manager = EventManager::new();

        let sink = seen.clone();
        manager.on(
            ViewportEventKind::MapClicked,
            Arc::new(move |lat_lng: LatLng| sink.lock().unwrap().push(lat_lng)),
        );

        manager.emit(ViewportEventKind::MapClicked, LatLng::new(1.0, 1.0));
        manager.emit(ViewportEventKind::MarkerDragEnded, LatLng::new(2.0, 2.0));
        assert_eq!(manager.pending_events(), 2);

        for (callback, lat_lng) in manager.take_dispatch() {
            callback(lat_lng);
        }

        assert_eq!(manager.pending_events(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![LatLng::new(1.0, 1.0)]);
    }

    #[test]
    fn test_clear_drops_listeners() {
        let mut manager = EventManager::new();
        manager.on(ViewportEventKind::MarkerDragEnded, Arc::new(|_: LatLng| {}));
        assert_eq!(manager.listener_count(ViewportEventKind::MarkerDragEnded), 1);

        manager.clear();
        assert_eq!(manager.listener_count(ViewportEventKind::MarkerDragEnded), 0);
    }
}
