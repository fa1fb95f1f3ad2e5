//! Timed slider transitions.
//!
//! A transition moves a slider linearly to one end of its range: below 0.5 it
//! goes up to 1, otherwise down to 0. The final tick lands exactly on the
//! target.

use serde::{Deserialize, Serialize};

use crate::slider::Slider;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Duration of one slider transition.
    pub seconds: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { seconds: 1.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitionStep {
    pub value: f32,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliderTransition {
    from: f32,
    to: f32,
    /// Normalized progress in `[0, 1]`.
    t: f32,
    seconds: f32,
}

impl SliderTransition {
    pub fn new(from: f32, to: f32, seconds: f32) -> Self {
        Self {
            from,
            to,
            t: 0.0,
            seconds,
        }
    }

    /// Transition from `start` to 1 if `start < 0.5`, else to 0.
    pub fn toward_nearest_end(start: f32, seconds: f32) -> Self {
        let to = if start < 0.5 { 1.0 } else { 0.0 };
        Self::new(start, to, seconds)
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.t >= 1.0
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> TransitionStep {
        if self.seconds <= 0.0 || !self.seconds.is_finite() {
            self.t = 1.0;
        } else {
            self.t = (self.t + dt.max(0.0) / self.seconds).min(1.0);
        }
        let finished = self.is_finished();
        let value = if finished {
            self.to
        } else {
            lerp_f32(self.from, self.to, self.t)
        };
        TransitionStep { value, finished }
    }
}

/// A slider together with its optional running transition.
///
/// While a transition runs the slider is disabled so the user does not fight
/// it; the slider is re-enabled when it finishes or is cancelled.
#[derive(Clone, Debug, Default)]
pub struct AnimatedSlider {
    pub slider: Slider,
    transition: Option<SliderTransition>,
}

impl AnimatedSlider {
    pub fn new(value: f32) -> Self {
        Self {
            slider: Slider::new(value),
            transition: None,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.slider.value()
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start (or restart) a transition toward the nearest end.
    pub fn start(&mut self, cfg: &TransitionConfig) {
        self.transition = Some(SliderTransition::toward_nearest_end(
            self.slider.value(),
            cfg.seconds,
        ));
        self.slider.set_enabled(false);
    }

    /// Stop a running transition where it is. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.transition.take().is_some();
        if was_running {
            self.slider.set_enabled(true);
        }
        was_running
    }

    /// Advance the running transition. Returns the new slider value if it changed.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        let transition = self.transition.as_mut()?;
        let step = transition.step(dt);
        if step.finished {
            self.transition = None;
            self.slider.set_enabled(true);
        }
        self.slider
            .set_value(step.value)
            .then(|| self.slider.value())
    }
}
