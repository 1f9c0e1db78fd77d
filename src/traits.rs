//! Shared trait abstractions
//!
//! [`MapViewport`] is the capability set the selection controller needs from a
//! map engine. The controller only ever holds a [`ViewportHandle`], never the
//! engine's marker or circle objects.

use crate::core::geo::LatLng;
use crate::prelude::Arc;
use crate::Result;

/// Opaque token for one initialized rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportHandle(pub(crate) u64);

impl ViewportHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Raw input events a surface reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEventKind {
    MapClicked,
    MarkerDragEnded,
}

impl ViewportEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportEventKind::MapClicked => "mapclicked",
            ViewportEventKind::MarkerDragEnded => "markerdragended",
        }
    }
}

/// Handler invoked with the coordinate of a raw event
pub type ViewportCallback = Arc<dyn Fn(LatLng) + Send + Sync>;

/// Rendering surface, overlay primitives, and input wiring
///
/// Implementations are policy-free: they draw what they are told to and
/// report input, nothing else. All mutations fail with
/// [`ViewportError::Released`](crate::ViewportError::Released) once the handle
/// has been torn down.
pub trait MapViewport: Send {
    /// Creates the surface; fails if this mount point is already initialized
    fn initialize(&mut self, center: LatLng, zoom: f64) -> Result<ViewportHandle>;

    /// Releases everything tied to the handle; idempotent
    fn teardown(&mut self, handle: ViewportHandle);

    /// Recenters and zooms the camera
    fn set_view(&mut self, handle: ViewportHandle, center: LatLng, zoom: f64) -> Result<()>;

    /// Adds the draggable marker and its radius circle at `center`
    fn show_overlays(
        &mut self,
        handle: ViewportHandle,
        center: LatLng,
        radius_meters: f64,
    ) -> Result<()>;

    /// Moves the shown overlay pair
    fn set_marker_position(&mut self, handle: ViewportHandle, position: LatLng) -> Result<()>;

    /// Resizes the circle without moving it
    fn set_overlay_radius(&mut self, handle: ViewportHandle, radius_meters: f64) -> Result<()>;

    /// Removes the overlay pair
    fn hide_overlays(&mut self, handle: ViewportHandle) -> Result<()>;

    /// Registers an input handler
    fn on(
        &mut self,
        handle: ViewportHandle,
        kind: ViewportEventKind,
        callback: ViewportCallback,
    ) -> Result<()>;
}
