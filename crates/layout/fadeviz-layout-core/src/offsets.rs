//! Slider panel placement: a fixed pixel margin on the left, top and bottom
//! edges, with the right edge at a fraction of the screen width, independent
//! of how the canvas is scaled.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Size, Vec2};
use crate::scale::ui_scale_factor;

/// Anchored position and size delta for the panel, in canvas units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelOffsets {
    pub anchored_position: Vec2,
    pub size_delta: Vec2,
}

impl PanelOffsets {
    pub fn compute(screen: Size, cfg: &LayoutConfig) -> Result<Self, LayoutError> {
        if screen.is_degenerate() {
            return Err(LayoutError::screen(screen));
        }
        let reference = cfg.reference_resolution;
        if reference.is_degenerate() {
            return Err(LayoutError::reference(reference));
        }

        let canvas_scale = ui_scale_factor(screen, reference, cfg.match_width_or_height);
        let offset = cfg.absolute_offset_px / canvas_scale;

        // canvas scale if only the screen width were matched
        let width_scale = ui_scale_factor(screen, reference, 0.0);
        let width_conversion = width_scale / canvas_scale;

        Ok(Self {
            anchored_position: Vec2::new(offset, offset),
            size_delta: Vec2::new(
                reference.width * cfg.horizontal_panel_fraction * width_conversion - offset,
                -2.0 * offset,
            ),
        })
    }
}
