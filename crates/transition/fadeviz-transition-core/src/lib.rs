//! fadeviz-transition-core: slider values and timed transitions between them.
//!
//! Everything here is driven by explicit `dt` steps from the host; nothing
//! reads a clock.

pub mod slider;
pub mod transition;

pub use slider::Slider;
pub use transition::{
    lerp_f32, AnimatedSlider, SliderTransition, TransitionConfig, TransitionStep,
};
