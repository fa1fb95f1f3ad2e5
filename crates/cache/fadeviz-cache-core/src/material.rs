//! Base definitions and the fade-derivation rule.
//!
//! A fade resource is the base definition's color with its alpha replaced by
//! `level / L`, drawn with the designated fade shader instead of the base shader.

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Parameters every fade resource is derived from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseDefinition {
    pub color: Rgba,
    /// Shader of the opaque resource.
    pub shader: String,
    /// Shader variant used for every fade resource.
    pub fade_shader: String,
}

impl Default for BaseDefinition {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            shader: "standard".to_string(),
            fade_shader: "standard-fade".to_string(),
        }
    }
}

impl BaseDefinition {
    /// Material parameters of the fade resource for `level`.
    pub fn derive_fade(&self, level: Level, max_level: u16) -> MaterialParams {
        MaterialParams {
            color: self.color.with_alpha(level.alpha(max_level)),
            shader: self.fade_shader.clone(),
            level,
        }
    }

    /// Material parameters of the opaque resource.
    pub fn opaque(&self, max_level: u16) -> MaterialParams {
        MaterialParams {
            color: self.color,
            shader: self.shader.clone(),
            level: Level::opaque(max_level),
        }
    }
}

/// Concrete material parameters handed to the host renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub color: Rgba,
    pub shader: String,
    pub level: Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_swaps_shader_and_alpha() {
        let base = BaseDefinition {
            color: Rgba::new(0.2, 0.4, 0.6, 1.0),
            shader: "lit".into(),
            fade_shader: "lit-transparent".into(),
        };
        let m = base.derive_fade(Level(51), 255);
        assert_eq!(m.shader, "lit-transparent");
        assert_eq!(m.color, Rgba::new(0.2, 0.4, 0.6, 0.2));
        assert_eq!(m.level, Level(51));
    }

    #[test]
    fn opaque_keeps_base_shader() {
        let base = BaseDefinition::default();
        let m = base.opaque(255);
        assert_eq!(m.shader, "standard");
        assert_eq!(m.color.a, 1.0);
        assert_eq!(m.level, Level(255));
    }
}
