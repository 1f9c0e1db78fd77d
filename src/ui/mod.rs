//! egui front-end for the picker

pub mod style;
pub mod widget;

pub use style::{MarkerStyle, OverlayStyle, PickerStyle};
pub use widget::LocationPicker;
