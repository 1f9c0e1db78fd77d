use crate::core::config::{is_valid_radius, PickerConfig};
use crate::core::geo::LatLng;
use crate::geocoding::{Address, ReverseGeocoder};
use crate::geolocation::{GeolocationAdapter, GeolocationError};
use crate::input::events::PickerEvent;
use crate::prelude::{Arc, Future};
use crate::runtime::{self, AsyncHandle, AsyncSpawner};
use crate::selection::guard::{SelectionGeneration, SyncGuard};
use crate::selection::state::SelectionState;
use crate::traits::{MapViewport, ViewportEventKind, ViewportHandle};
use crate::{Error, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Consumer callback: `(latitude, longitude, address)`
pub type LocationSelectCallback = Box<dyn FnMut(f64, f64, Option<&Address>) + Send>;

/// Outcome of a spawned lookup, applied on the next `poll`
enum Completion {
    Resolved {
        generation: SelectionGeneration,
        coordinate: LatLng,
        outcome: Result<Option<Address>>,
    },
    Located {
        requested_at: SelectionGeneration,
        outcome: std::result::Result<LatLng, GeolocationError>,
    },
}

/// Reacts to clicks, drags, geolocation and clears; drives the viewport and
/// the geocoder; reports each accepted selection to the consumer once.
///
/// All state changes happen on the caller's thread inside the public methods
/// and [`poll`](Self::poll). Geocoding and geolocation run on the spawner and
/// only send their results back.
pub struct SelectionController {
    config: PickerConfig,
    state: SelectionState,
    guard: SyncGuard,
    viewport: Box<dyn MapViewport>,
    handle: Option<ViewportHandle>,
    geocoder: Arc<dyn ReverseGeocoder>,
    geolocation: GeolocationAdapter,
    spawner: Option<Arc<dyn AsyncSpawner>>,
    event_tx: Sender<PickerEvent>,
    event_rx: Receiver<PickerEvent>,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    on_select: Option<LocationSelectCallback>,
    /// Lookups that may still be running; cancelled on teardown
    tasks: Vec<Box<dyn AsyncHandle>>,
}

impl SelectionController {
    /// Initializes the viewport at the configured overview and wires its input
    pub fn mount<V>(
        config: PickerConfig,
        viewport: V,
        geocoder: Arc<dyn ReverseGeocoder>,
        geolocation: GeolocationAdapter,
    ) -> Result<Self>
    where
        V: MapViewport + 'static,
    {
        config.validate()?;
        let mut viewport: Box<dyn MapViewport> = Box::new(viewport);
        let handle = viewport.initialize(config.initial_center, config.overview_zoom)?;

        let (event_tx, event_rx) = unbounded();
        for kind in [ViewportEventKind::MapClicked, ViewportEventKind::MarkerDragEnded] {
            let tx = event_tx.clone();
            let registered = viewport.on(
                handle,
                kind,
                Arc::new(move |lat_lng: LatLng| {
                    let _ = tx.send(PickerEvent::from_viewport(kind, lat_lng));
                }),
            );
            if let Err(e) = registered {
                viewport.teardown(handle);
                return Err(e);
            }
        }

        let (completion_tx, completion_rx) = unbounded();
        log::debug!(
            "Picker mounted at {} z{}",
            config.initial_center.display_fixed(6),
            config.overview_zoom
        );

        Ok(Self {
            state: SelectionState::new(config.radius_meters),
            config,
            guard: SyncGuard::new(),
            viewport,
            handle: Some(handle),
            geocoder,
            geolocation,
            spawner: None,
            event_tx,
            event_rx,
            completion_tx,
            completion_rx,
            on_select: None,
            tasks: Vec::new(),
        })
    }

    /// Runs lookups on `spawner` instead of the global runtime
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Sets the consumer callback
    pub fn on_location_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f64, f64, Option<&Address>) + Send + 'static,
    {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn generation(&self) -> SelectionGeneration {
        self.guard.current()
    }

    pub fn is_torn_down(&self) -> bool {
        self.guard.is_terminated()
    }

    /// Sender for UI controls that live outside the viewport
    pub fn event_sender(&self) -> Sender<PickerEvent> {
        self.event_tx.clone()
    }

    /// Applies queued input and finished lookups; returns how many were handled
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply_completion(completion);
            processed += 1;
        }
        processed
    }

    /// Routes one event; errors are logged, never propagated
    pub fn handle_event(&mut self, event: PickerEvent) {
        let result = match event {
            PickerEvent::MapClicked(lat_lng) => self.map_clicked(lat_lng),
            PickerEvent::MarkerDragEnded(lat_lng) => self.marker_drag_ended(lat_lng),
            PickerEvent::GeolocateRequested => {
                self.request_geolocation();
                Ok(())
            }
            PickerEvent::Clear => {
                self.clear();
                Ok(())
            }
            PickerEvent::RadiusChanged(radius_meters) => self.set_radius(radius_meters),
        };

        if let Err(e) = result {
            log::warn!("Ignoring picker event: {}", e);
        }
    }

    /// New selection at `lat_lng`; the camera follows it
    pub fn map_clicked(&mut self, lat_lng: LatLng) -> Result<()> {
        self.select_checked(lat_lng, true)
    }

    /// New selection where the marker was dropped; the camera stays put
    pub fn marker_drag_ended(&mut self, lat_lng: LatLng) -> Result<()> {
        self.select_checked(lat_lng, false)
    }

    /// Asks the device for its position; ignored while a lookup is running
    pub fn request_geolocation(&mut self) {
        if self.guard.is_terminated() {
            return;
        }
        if self.state.is_locating_device {
            log::debug!("Geolocation already in progress");
            return;
        }

        self.state.notice = None;
        if !self.geolocation.is_supported() {
            log::info!("Geolocation unavailable: {}", GeolocationError::Unsupported);
            self.state.notice = Some(GeolocationError::Unsupported);
            return;
        }

        self.state.is_locating_device = true;
        let requested_at = self.guard.current();
        let adapter = self.geolocation.clone();
        let tx = self.completion_tx.clone();
        self.spawn(async move {
            let outcome = AssertUnwindSafe(adapter.locate())
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(GeolocationError::PositionUnavailable(panic_message(payload)))
                });
            let _ = tx.send(Completion::Located {
                requested_at,
                outcome,
            });
        });
    }

    /// Drops the selection and returns the camera to the overview
    pub fn clear(&mut self) {
        if self.guard.is_terminated() {
            return;
        }

        self.guard.advance();
        self.state.reset();

        let center = self.config.initial_center;
        let zoom = self.config.overview_zoom;
        self.with_viewport("hide overlays", |viewport, handle| {
            viewport.hide_overlays(handle)
        });
        self.with_viewport("reset view", |viewport, handle| {
            viewport.set_view(handle, center, zoom)
        });
    }

    /// Resizes the overlay circle; never moves it or re-resolves
    pub fn set_radius(&mut self, radius_meters: f64) -> Result<()> {
        if !is_valid_radius(radius_meters) {
            return Err(Error::InvalidRadius(radius_meters));
        }
        if self.guard.is_terminated() {
            return Ok(());
        }

        self.state.radius_meters = radius_meters;
        if self.state.has_selection() {
            self.with_viewport("resize overlay", |viewport, handle| {
                viewport.set_overlay_radius(handle, radius_meters)
            });
        }
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    /// Releases the viewport; every later result is discarded
    pub fn teardown(&mut self) {
        if self.guard.is_terminated() {
            return;
        }

        self.guard.terminate();
        for task in self.tasks.drain(..) {
            task.cancel();
        }
        if let Some(handle) = self.handle.take() {
            self.viewport.teardown(handle);
        }
        self.on_select = None;
        log::debug!("Picker torn down at generation {}", self.guard.current().value());
    }

    fn select_checked(&mut self, lat_lng: LatLng, follow: bool) -> Result<()> {
        if !lat_lng.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "({}, {})",
                lat_lng.lat, lat_lng.lng
            )));
        }
        if self.guard.is_terminated() {
            log::debug!("Ignoring selection after teardown");
            return Ok(());
        }

        self.select(lat_lng, follow);
        Ok(())
    }

    fn select(&mut self, coordinate: LatLng, follow: bool) {
        let generation = self.guard.advance();
        let overlays_shown = self.state.has_selection();
        self.state.begin_selection(coordinate);

        if overlays_shown {
            self.with_viewport("move overlays", |viewport, handle| {
                viewport.set_marker_position(handle, coordinate)
            });
        } else {
            let radius = self.state.radius_meters;
            self.with_viewport("show overlays", |viewport, handle| {
                viewport.show_overlays(handle, coordinate, radius)
            });
        }

        if follow {
            let zoom = self.config.focus_zoom;
            self.with_viewport("focus view", |viewport, handle| {
                viewport.set_view(handle, coordinate, zoom)
            });
        }

        log::debug!(
            "Resolving {} for generation {}",
            coordinate.display_fixed(6),
            generation.value()
        );
        let geocoder = self.geocoder.clone();
        let tx = self.completion_tx.clone();
        self.spawn(async move {
            let outcome = AssertUnwindSafe(geocoder.resolve(coordinate))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(Error::TaskPanicked(panic_message(payload))));
            let _ = tx.send(Completion::Resolved {
                generation,
                coordinate,
                outcome,
            });
        });
    }

    fn apply_completion(&mut self, completion: Completion) {
        if self.guard.is_terminated() {
            log::debug!("Discarding result that arrived after teardown");
            return;
        }

        match completion {
            Completion::Resolved {
                generation,
                coordinate,
                outcome,
            } => {
                if !self.guard.is_current(generation) {
                    log::debug!(
                        "Discarding stale resolution for generation {} (current {})",
                        generation.value(),
                        self.guard.current().value()
                    );
                    return;
                }

                let address = outcome.unwrap_or_else(|e| {
                    log::warn!(
                        "Reverse geocoding failed for {}: {}",
                        coordinate.display_fixed(6),
                        e
                    );
                    None
                });
                self.state.finish_resolution(address);
                if let Some(callback) = self.on_select.as_mut() {
                    callback(coordinate.lat, coordinate.lng, self.state.address.as_ref());
                }
            }
            Completion::Located {
                requested_at,
                outcome,
            } => {
                self.state.is_locating_device = false;
                match outcome {
                    Ok(position) if self.guard.current() == requested_at => {
                        self.select(position, true);
                    }
                    Ok(position) => {
                        log::debug!(
                            "Discarding device position {}, selection changed while locating",
                            position.display_fixed(6)
                        );
                    }
                    Err(error) => {
                        log::info!("Geolocation failed: {}", error);
                        self.state.notice = Some(error);
                    }
                }
            }
        }
    }

    /// Runs one viewport mutation, logging failures
    fn with_viewport<F>(&mut self, what: &str, op: F)
    where
        F: FnOnce(&mut dyn MapViewport, ViewportHandle) -> Result<()>,
    {
        let Some(handle) = self.handle else {
            return;
        };
        if let Err(e) = op(self.viewport.as_mut(), handle) {
            log::warn!("Viewport {} failed: {}", what, e);
        }
    }

    fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let future = Box::pin(future);
        let handle = match &self.spawner {
            Some(spawner) => spawner.spawn_boxed(future),
            None => runtime::runtime().spawn_boxed(future),
        };
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for SelectionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
