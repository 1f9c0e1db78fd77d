use crate::{
    core::{
        config::PickerConfig,
        constants::MARKER_GRAB_RADIUS,
        geo::{LatLng, Point},
        surface::{SharedSurface, SurfaceSnapshot},
        viewport::Viewport,
    },
    geocoding::{nominatim::NominatimGeocoder, Address, ReverseGeocoder},
    geolocation::GeolocationAdapter,
    runtime::AsyncSpawner,
    selection::{controller::SelectionController, state::SelectionState},
    ui::style::PickerStyle,
    Result,
};
use egui::{Align2, CursorIcon, FontId, Pos2, Rect, Response, Sense, Ui, Vec2, Widget};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

/// Radius slider range in kilometers
const RADIUS_RANGE_KM: RangeInclusive<f64> = 0.5..=50.0;
/// Zoom change per scrolled point
const SCROLL_ZOOM_RATE: f64 = 0.002;
/// Graticule spacing candidates in degrees, widest first
const GRID_STEPS: [f64; 10] = [30.0, 10.0, 5.0, 1.0, 0.5, 0.1, 0.05, 0.01, 0.005, 0.001];
const MIN_MAP_SIZE: Vec2 = Vec2::new(200.0, 160.0);

/// Interactive location picker
///
/// Owns the selection controller and the surface it drives. Paint it every
/// frame with `ui.add(&mut picker)` or [`show`](Self::show); the consumer
/// callback fires from inside that call once an address lookup settles.
///
/// # Examples
///
/// ```rust,ignore
/// use geopicker::{GeolocationAdapter, LocationPicker, PickerConfig};
///
/// let mut picker = LocationPicker::new(PickerConfig::default(), GeolocationAdapter::unsupported())
///     .unwrap()
///     .on_location_select(|lat, lng, address| {
///         println!("{lat:.6}, {lng:.6} {:?}", address);
///     });
/// // inside an egui frame: ui.add(&mut picker);
/// ```
pub struct LocationPicker {
    controller: SelectionController,
    surface: SharedSurface,
    style: PickerStyle,
    /// Screen position of the pin while it is dragged
    drag_preview: Option<Pos2>,
}

impl LocationPicker {
    /// Picker resolving addresses through Nominatim
    pub fn new(config: PickerConfig, geolocation: GeolocationAdapter) -> Result<Self> {
        let geocoder = Arc::new(NominatimGeocoder::new(config.geocoder.clone()));
        Self::with_geocoder(config, geocoder, geolocation)
    }

    pub fn with_geocoder(
        config: PickerConfig,
        geocoder: Arc<dyn ReverseGeocoder>,
        geolocation: GeolocationAdapter,
    ) -> Result<Self> {
        let surface = SharedSurface::default();
        surface.set_zoom_limits(config.min_zoom, config.max_zoom);
        let controller =
            SelectionController::mount(config, surface.clone(), geocoder, geolocation)?;

        Ok(Self {
            controller,
            surface,
            style: PickerStyle::default(),
            drag_preview: None,
        })
    }

    pub fn on_location_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f64, f64, Option<&Address>) + Send + 'static,
    {
        self.controller = self.controller.on_location_select(callback);
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.controller = self.controller.with_spawner(spawner);
        self
    }

    pub fn style(mut self, style: PickerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> &SelectionState {
        self.controller.state()
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController {
        &mut self.controller
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    /// Draws the toolbar, the status lines and the map
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        self.controller.poll();

        let response = ui
            .vertical(|ui| {
                self.toolbar(ui);
                self.status(ui);
                self.map_area(ui)
            })
            .inner;

        // Input from this frame went through the surface listeners
        if self.controller.poll() > 0 {
            ui.ctx().request_repaint();
        }
        if self.controller.state().is_busy() {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }
        response
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let state = self.controller.state();
            let locating = state.is_locating_device;
            let has_selection = state.has_selection();
            let mut radius_km = state.radius_meters / 1000.0;

            let label = if locating { "Locating..." } else { "Use my location" };
            if ui.add_enabled(!locating, egui::Button::new(label)).clicked() {
                self.controller.request_geolocation();
            }

            if ui
                .add_enabled(has_selection, egui::Button::new("Clear"))
                .clicked()
            {
                self.controller.clear();
            }

            let slider = egui::Slider::new(&mut radius_km, RADIUS_RANGE_KM)
                .text("Radius")
                .suffix(" km");
            if ui.add(slider).changed() {
                if let Err(e) = self.controller.set_radius(radius_km * 1000.0) {
                    log::warn!("Rejected radius: {}", e);
                }
            }
        });
    }

    fn status(&mut self, ui: &mut Ui) {
        let state = self.controller.state();
        match state.coordinate {
            Some(coordinate) => {
                ui.label(format!("Selected: {}", coordinate.display_fixed(6)));
                ui.label(address_text(state));
            }
            None => {
                ui.label("Click the map to choose a location");
            }
        }

        let notice = state.notice.clone();
        if let Some(notice) = notice {
            ui.horizontal(|ui| {
                ui.colored_label(self.style.notice_color, notice.to_string());
                if ui.small_button("Dismiss").clicked() {
                    self.controller.dismiss_notice();
                }
            });
        }
    }

    fn map_area(&mut self, ui: &mut Ui) -> Response {
        let desired_size = ui.available_size().max(MIN_MAP_SIZE);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        self.surface
            .resize(Point::new(rect.width() as f64, rect.height() as f64));

        self.handle_input(ui, rect, &response);

        let snapshot = self.surface.snapshot();
        self.paint(ui, rect, &snapshot);
        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let snapshot = self.surface.snapshot();
        let viewport = &snapshot.viewport;

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.surface.zoom_by(scroll as f64 * SCROLL_ZOOM_RATE);
            }
        }

        if response.drag_started() {
            let grabbed = response
                .interact_pointer_pos()
                .zip(marker_screen_pos(&snapshot, rect))
                .map_or(false, |(pointer, marker)| {
                    pointer.distance(marker) <= MARKER_GRAB_RADIUS
                });
            if grabbed {
                self.drag_preview = response.interact_pointer_pos();
            }
        }

        if response.dragged() {
            if self.drag_preview.is_some() {
                self.drag_preview = response.interact_pointer_pos();
                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            } else {
                let delta = response.drag_delta();
                if delta.length_sq() > 0.5 {
                    self.surface
                        .pan_by(Point::new(-delta.x as f64, -delta.y as f64));
                }
            }
        }

        if response.drag_released() {
            if let Some(pointer) = self.drag_preview.take() {
                let drop_at = to_lat_lng(viewport, rect, pointer);
                if let Err(e) = self.surface.drag_marker(drop_at) {
                    log::debug!("Marker drag ignored: {}", e);
                }
            }
        } else if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                if let Err(e) = self.surface.click(to_lat_lng(viewport, rect, pointer)) {
                    log::debug!("Click ignored: {}", e);
                }
            }
        }
    }

    fn paint(&self, ui: &Ui, rect: Rect, snapshot: &SurfaceSnapshot) {
        let painter = ui.painter_at(rect);
        let viewport = &snapshot.viewport;

        painter.rect_filled(rect, 0.0, self.style.background_color);
        self.paint_graticule(&painter, rect, viewport);

        if let Some(pair) = &snapshot.overlays {
            let center = self
                .drag_preview
                .unwrap_or_else(|| to_screen(viewport, rect, &pair.circle.center()));
            let radius = pair.circle.radius_pixels(viewport) as f32;
            painter.circle_filled(center, radius, self.style.overlay.fill_color);
            painter.circle_stroke(center, radius, self.style.overlay.stroke);

            let marker = &self.style.marker;
            let color = if self.drag_preview.is_some() {
                marker.dragging_color
            } else {
                marker.color
            };
            let head = center - Vec2::new(0.0, marker.size * 2.0);
            painter.line_segment(
                [head, center],
                egui::Stroke::new(marker.border_width, color),
            );
            painter.circle_filled(head, marker.size, color);
            painter.circle_stroke(
                head,
                marker.size,
                egui::Stroke::new(marker.border_width, marker.border_color),
            );
        }

        painter.text(
            rect.right_bottom() - Vec2::new(6.0, 4.0),
            Align2::RIGHT_BOTTOM,
            format!("z{:.1}", viewport.zoom),
            FontId::proportional(10.0),
            egui::Color32::from_gray(60),
        );
        painter.rect_stroke(rect, 0.0, self.style.border_stroke);
    }

    fn paint_graticule(&self, painter: &egui::Painter, rect: Rect, viewport: &Viewport) {
        let mut north_west = to_lat_lng(viewport, rect, rect.left_top());
        let mut south_east = to_lat_lng(viewport, rect, rect.right_bottom());
        // Unwrap the edges around the centre when the view spans the antimeridian
        if south_east.lng < north_west.lng {
            if viewport.center.lng < north_west.lng {
                north_west.lng -= 360.0;
            } else {
                south_east.lng += 360.0;
            }
        }
        let step = grid_step(south_east.lng - north_west.lng);

        let mut lng = (north_west.lng / step).ceil() * step;
        while lng <= south_east.lng {
            let x = to_screen(viewport, rect, &LatLng::new(north_west.lat, lng)).x;
            painter.vline(x, rect.y_range(), self.style.grid_stroke);
            lng += step;
        }

        let mut lat = (south_east.lat / step).ceil() * step;
        while lat <= north_west.lat {
            let y = to_screen(viewport, rect, &LatLng::new(lat, north_west.lng)).y;
            painter.hline(rect.x_range(), y, self.style.grid_stroke);
            lat += step;
        }
    }
}

impl Widget for &mut LocationPicker {
    fn ui(self, ui: &mut Ui) -> Response {
        self.show(ui)
    }
}

fn address_text(state: &SelectionState) -> String {
    if state.is_resolving {
        return "Resolving address...".to_string();
    }
    match &state.address {
        Some(address) if !address.is_blank() => address.display_line(),
        _ => "Address unavailable".to_string(),
    }
}

/// Widest spacing giving at least three lines across `span_degrees`
fn grid_step(span_degrees: f64) -> f64 {
    GRID_STEPS
        .iter()
        .copied()
        .find(|step| span_degrees / step >= 3.0)
        .unwrap_or(GRID_STEPS[GRID_STEPS.len() - 1])
}

fn to_screen(viewport: &Viewport, rect: Rect, lat_lng: &LatLng) -> Pos2 {
    let pixel = viewport.lat_lng_to_pixel(lat_lng);
    rect.min + Vec2::new(pixel.x as f32, pixel.y as f32)
}

fn to_lat_lng(viewport: &Viewport, rect: Rect, pos: Pos2) -> LatLng {
    let offset = pos - rect.min;
    viewport.pixel_to_lat_lng(&Point::new(offset.x as f64, offset.y as f64))
}

fn marker_screen_pos(snapshot: &SurfaceSnapshot, rect: Rect) -> Option<Pos2> {
    snapshot
        .overlays
        .as_ref()
        .map(|pair| to_screen(&snapshot.viewport, rect, &pair.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoAddress;

    #[async_trait]
    impl ReverseGeocoder for NoAddress {
        async fn resolve(&self, _coordinate: LatLng) -> Result<Option<Address>> {
            Ok(None)
        }
    }

    #[test]
    fn test_grid_step() {
        assert_eq!(grid_step(360.0), 30.0);
        assert_eq!(grid_step(40.0), 10.0);
        assert_eq!(grid_step(0.2), 0.05);
        assert_eq!(grid_step(0.0001), 0.001);
    }

    #[test]
    fn test_screen_round_trip_inside_rect() {
        let viewport = Viewport::new(LatLng::new(40.73, -73.93), 13.0, Point::new(800.0, 600.0));
        let rect = Rect::from_min_size(Pos2::new(10.0, 50.0), Vec2::new(800.0, 600.0));

        let center = to_screen(&viewport, rect, &viewport.center);
        assert!((center - rect.center()).length() < 0.5);

        let back = to_lat_lng(&viewport, rect, center);
        assert!((back.lat - 40.73).abs() < 1e-4);
        assert!((back.lng + 73.93).abs() < 1e-4);
    }

    #[test]
    fn test_address_text() {
        let mut state = SelectionState::new(5000.0);
        state.begin_selection(LatLng::new(1.0, 2.0));
        assert_eq!(address_text(&state), "Resolving address...");

        state.finish_resolution(Some(Address::new("Austin", "Texas", "United States")));
        assert_eq!(address_text(&state), "Austin, Texas, United States");

        state.finish_resolution(None);
        assert_eq!(address_text(&state), "Address unavailable");
    }

    #[test]
    fn test_picker_mounts_its_surface() {
        let config = PickerConfig::default().with_zoom_levels(4.0, 12.0);
        let picker = LocationPicker::with_geocoder(
            config,
            Arc::new(NoAddress),
            GeolocationAdapter::unsupported(),
        )
        .unwrap();

        assert!(picker.surface().is_mounted());
        assert_eq!(picker.surface().zoom(), 4.0);
        assert!(!picker.state().has_selection());
    }
}
