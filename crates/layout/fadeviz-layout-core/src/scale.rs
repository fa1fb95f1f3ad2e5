//! Canvas scale factor for a screen relative to a reference resolution.

use crate::geometry::Size;

/// Scale factor a canvas scaler would apply when matching between width
/// (`match_width_or_height = 0`) and height (`1`).
///
/// The width and height ratios are averaged in log2 space, so a screen twice
/// as wide and half as tall as the reference evens out to `1.0` at `0.5`.
pub fn ui_scale_factor(screen: Size, reference: Size, match_width_or_height: f32) -> f32 {
    let log_width = (screen.width / reference.width).log2();
    let log_height = (screen.height / reference.height).log2();
    let t = match_width_or_height.clamp(0.0, 1.0);
    let weighted = log_width + (log_height - log_width) * t;
    weighted.exp2()
}
