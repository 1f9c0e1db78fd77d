use egui::{Color32, Stroke};

/// Style configuration for the picker widget
#[derive(Debug, Clone)]
pub struct PickerStyle {
    /// Background color of the map area
    pub background_color: Color32,
    /// Graticule lines
    pub grid_stroke: Stroke,
    /// Border around the map area
    pub border_stroke: Stroke,
    pub marker: MarkerStyle,
    pub overlay: OverlayStyle,
    /// Text color of the geolocation notice
    pub notice_color: Color32,
}

/// Style for the selection pin
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub color: Color32,
    /// Pin head radius
    pub size: f32,
    pub border_color: Color32,
    pub border_width: f32,
    /// Color while the pin is being dragged
    pub dragging_color: Color32,
}

/// Style for the radius circle
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub fill_color: Color32,
    pub stroke: Stroke,
}

impl Default for PickerStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(170, 211, 223),
            grid_stroke: Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 90)),
            border_stroke: Stroke::new(1.0, Color32::GRAY),
            marker: MarkerStyle::default(),
            overlay: OverlayStyle::default(),
            notice_color: Color32::from_rgb(200, 60, 40),
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(220, 50, 50),
            size: 8.0,
            border_color: Color32::WHITE,
            border_width: 2.0,
            dragging_color: Color32::from_rgb(240, 120, 60),
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill_color: Color32::from_rgba_unmultiplied(51, 136, 255, 50),
            stroke: Stroke::new(2.0, Color32::from_rgb(51, 136, 255)),
        }
    }
}

impl PickerStyle {
    /// Darker palette for dark egui themes
    pub fn dark() -> Self {
        Self {
            background_color: Color32::from_rgb(38, 52, 64),
            grid_stroke: Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 40)),
            border_stroke: Stroke::new(1.0, Color32::from_gray(90)),
            notice_color: Color32::from_rgb(255, 130, 110),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_keeps_overlay_colors() {
        let light = PickerStyle::default();
        let dark = PickerStyle::dark();

        assert_ne!(light.background_color, dark.background_color);
        assert_eq!(light.marker.color, dark.marker.color);
        assert_eq!(light.overlay.stroke, dark.overlay.stroke);
    }
}
