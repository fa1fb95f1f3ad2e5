//! Slider value model.

use serde::{Deserialize, Serialize};

/// A `[0, 1]` slider. Disabled sliders ignore user input but still accept
/// programmatic writes (transitions, a master slider).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    value: f32,
    enabled: bool,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Slider {
    pub fn new(value: f32) -> Self {
        Self {
            value: clamp01(value),
            enabled: true,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Programmatic write. Returns whether the value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let value = clamp01(value);
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// User drag. Returns whether the value changed; always `false` while disabled.
    pub fn drag_to(&mut self, value: f32) -> bool {
        self.enabled && self.set_value(value)
    }
}

/// NaN counts as 0.
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
