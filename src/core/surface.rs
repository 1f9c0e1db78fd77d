//! In-memory map surface
//!
//! `SharedSurface` is a cheap, cloneable handle to one rendering surface. The
//! selection controller drives it through [`MapViewport`]; a front-end (the egui
//! widget, or a test) keeps a clone to read the camera and overlays back and to
//! feed raw clicks and marker drags in.

use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;
use crate::input::handler::EventManager;
use crate::layers::OverlayPair;
use crate::prelude::{Arc, Mutex};
use crate::traits::{MapViewport, ViewportCallback, ViewportEventKind, ViewportHandle};
use crate::{Result, ViewportError};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted(ViewportHandle),
    Released,
}

struct SurfaceInner {
    lifecycle: Lifecycle,
    viewport: Viewport,
    overlays: Option<OverlayPair>,
    events: EventManager,
    /// Number of `set_view` calls applied
    view_changes: usize,
    /// Number of mutations applied through the handle
    mutations: usize,
    releases: usize,
}

/// Snapshot of what the surface currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    pub viewport: Viewport,
    pub overlays: Option<OverlayPair>,
    pub mounted: bool,
}

#[derive(Clone)]
pub struct SharedSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl SharedSurface {
    /// Creates an unmounted surface of the given pixel size
    pub fn new(size: Point) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceInner {
                lifecycle: Lifecycle::Unmounted,
                viewport: Viewport::new(LatLng::default(), 1.0, size),
                overlays: None,
                events: EventManager::new(),
                view_changes: 0,
                mutations: 0,
                releases: 0,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceInner> {
        // A panicking listener never runs under this lock, so poisoning only
        // means a caller panicked mid-read; the data is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies a mutation if `handle` is the mounted one
    fn with_mounted<R>(
        &self,
        handle: ViewportHandle,
        f: impl FnOnce(&mut SurfaceInner) -> Result<R>,
    ) -> Result<R> {
        let mut inner = self.lock();
        match inner.lifecycle {
            Lifecycle::Mounted(current) if current == handle => {
                let result = f(&mut inner)?;
                inner.mutations += 1;
                Ok(result)
            }
            Lifecycle::Mounted(_) | Lifecycle::Unmounted => {
                Err(ViewportError::UnknownHandle(handle.id()).into())
            }
            Lifecycle::Released => Err(ViewportError::Released.into()),
        }
    }

    pub fn set_zoom_limits(&self, min_zoom: f64, max_zoom: f64) {
        self.lock().viewport.set_zoom_limits(min_zoom, max_zoom);
    }

    pub fn resize(&self, size: Point) {
        self.lock().viewport.set_size(size);
    }

    /// Moves the camera by a screen offset, as a user pan does
    pub fn pan_by(&self, offset: Point) {
        let mut inner = self.lock();
        let center = inner.viewport.lat_lng_to_pixel(&inner.viewport.center);
        let target = inner.viewport.pixel_to_lat_lng(&center.add(&offset));
        inner.viewport.set_center(target);
    }

    /// Changes the zoom by `delta`, clamped to the zoom limits
    pub fn zoom_by(&self, delta: f64) {
        let mut inner = self.lock();
        let zoom = inner.viewport.zoom + delta;
        inner.viewport.set_zoom(zoom);
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let inner = self.lock();
        SurfaceSnapshot {
            viewport: inner.viewport.clone(),
            overlays: inner.overlays.clone(),
            mounted: matches!(inner.lifecycle, Lifecycle::Mounted(_)),
        }
    }

    pub fn center(&self) -> LatLng {
        self.lock().viewport.center
    }

    pub fn zoom(&self) -> f64 {
        self.lock().viewport.zoom
    }

    pub fn overlays_visible(&self) -> bool {
        self.lock().overlays.is_some()
    }

    pub fn marker_position(&self) -> Option<LatLng> {
        self.lock().overlays.as_ref().map(|pair| pair.marker.position())
    }

    pub fn circle_radius(&self) -> Option<f64> {
        self.lock()
            .overlays
            .as_ref()
            .map(|pair| pair.circle.radius_meters())
    }

    pub fn view_changes(&self) -> usize {
        self.lock().view_changes
    }

    pub fn mutation_count(&self) -> usize {
        self.lock().mutations
    }

    pub fn release_count(&self) -> usize {
        self.lock().releases
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.lock().lifecycle, Lifecycle::Mounted(_))
    }

    /// Reports a click at `lat_lng` to the registered listeners
    pub fn click(&self, lat_lng: LatLng) -> Result<()> {
        let dispatch = {
            let mut inner = self.lock();
            if !matches!(inner.lifecycle, Lifecycle::Mounted(_)) {
                return Err(ViewportError::Released.into());
            }
            inner.events.emit(ViewportEventKind::MapClicked, lat_lng);
            inner.events.take_dispatch()
        };
        Self::run_dispatch(dispatch);
        Ok(())
    }

    /// Moves the marker (and its circle) to `to`, then reports the drag end
    pub fn drag_marker(&self, to: LatLng) -> Result<()> {
        let dispatch = {
            let mut inner = self.lock();
            if !matches!(inner.lifecycle, Lifecycle::Mounted(_)) {
                return Err(ViewportError::Released.into());
            }
            match inner.overlays.as_mut() {
                Some(pair) if pair.marker.is_draggable() => pair.move_to(to),
                _ => return Err(ViewportError::NoOverlays.into()),
            }
            inner.events.emit(ViewportEventKind::MarkerDragEnded, to);
            inner.events.take_dispatch()
        };
        Self::run_dispatch(dispatch);
        Ok(())
    }

    fn run_dispatch(dispatch: Vec<(ViewportCallback, LatLng)>) {
        for (callback, lat_lng) in dispatch {
            callback(lat_lng);
        }
    }
}

impl Default for SharedSurface {
    fn default() -> Self {
        Self::new(Point::new(800.0, 600.0))
    }
}

impl MapViewport for SharedSurface {
    fn initialize(&mut self, center: LatLng, zoom: f64) -> Result<ViewportHandle> {
        let mut inner = self.lock();
        if inner.lifecycle != Lifecycle::Unmounted {
            return Err(ViewportError::AlreadyInitialized.into());
        }

        let handle = ViewportHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed));
        inner.viewport.set_view(center, zoom);
        inner.lifecycle = Lifecycle::Mounted(handle);
        log::debug!("Surface {} initialized at {:?} z{}", handle.id(), center, zoom);
        Ok(handle)
    }

    fn teardown(&mut self, handle: ViewportHandle) {
        let mut inner = self.lock();
        if inner.lifecycle == Lifecycle::Mounted(handle) {
            inner.overlays = None;
            inner.events.clear();
            inner.lifecycle = Lifecycle::Released;
            inner.releases += 1;
            log::debug!("Surface {} released", handle.id());
        }
    }

    fn set_view(&mut self, handle: ViewportHandle, center: LatLng, zoom: f64) -> Result<()> {
        self.with_mounted(handle, |inner| {
            inner.viewport.set_view(center, zoom);
            inner.view_changes += 1;
            Ok(())
        })
    }

    fn show_overlays(
        &mut self,
        handle: ViewportHandle,
        center: LatLng,
        radius_meters: f64,
    ) -> Result<()> {
        self.with_mounted(handle, |inner| {
            inner.overlays = Some(OverlayPair::new(center, radius_meters));
            Ok(())
        })
    }

    fn set_marker_position(&mut self, handle: ViewportHandle, position: LatLng) -> Result<()> {
        self.with_mounted(handle, |inner| match inner.overlays.as_mut() {
            Some(pair) => {
                pair.move_to(position);
                Ok(())
            }
            None => Err(ViewportError::NoOverlays.into()),
        })
    }

    fn set_overlay_radius(&mut self, handle: ViewportHandle, radius_meters: f64) -> Result<()> {
        self.with_mounted(handle, |inner| match inner.overlays.as_mut() {
            Some(pair) => {
                pair.circle.set_radius(radius_meters);
                Ok(())
            }
            None => Err(ViewportError::NoOverlays.into()),
        })
    }

    fn hide_overlays(&mut self, handle: ViewportHandle) -> Result<()> {
        self.with_mounted(handle, |inner| {
            inner.overlays = None;
            Ok(())
        })
    }

    fn on(
        &mut self,
        handle: ViewportHandle,
        kind: ViewportEventKind,
        callback: ViewportCallback,
    ) -> Result<()> {
        self.with_mounted(handle, |inner| {
            inner.events.on(kind, callback);
            Ok(())
        })
    }
}
