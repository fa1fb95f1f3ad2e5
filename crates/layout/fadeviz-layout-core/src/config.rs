//! Layout constants, overridable from config files.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Resolution the UI was authored against.
    pub reference_resolution: Size,
    /// Fraction of the screen width the slider panel's right edge reaches.
    pub horizontal_panel_fraction: f32,
    /// Absolute margin kept on the panel's left, top and bottom edges.
    pub absolute_offset_px: f32,
    /// Padding inside the item grid, every side.
    pub cell_padding_px: f32,
    /// Gap between grid cells.
    pub cell_spacing_px: f32,
    pub pixels_per_item: f32,
    /// Item size relative to its cell.
    pub item_scale: f32,
    /// Canvas scaler match: 0 = width, 1 = height.
    pub match_width_or_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_resolution: Size::new(900.0, 600.0),
            horizontal_panel_fraction: 0.3,
            absolute_offset_px: 30.0,
            cell_padding_px: 5.0,
            cell_spacing_px: 0.0,
            pixels_per_item: 50.0,
            item_scale: 0.9,
            match_width_or_height: 1.0,
        }
    }
}
