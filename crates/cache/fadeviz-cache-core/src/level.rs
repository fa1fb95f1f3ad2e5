//! Discrete opacity levels.
//!
//! A level lives in `[0, L]` where `L` is the cache's `max_level`. Level `0` is
//! fully transparent (nothing to draw), level `L` is fully opaque (the shared,
//! never-counted opaque resource). Everything strictly in between is a fade
//! level backed by at most one shared resource.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Quantized opacity level.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u16);

impl Level {
    /// Fully transparent; holds no resource.
    pub const TRANSPARENT: Level = Level(0);

    /// The opaque sentinel for a cache with the given `max_level`.
    #[inline]
    pub const fn opaque(max_level: u16) -> Self {
        Level(max_level)
    }

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_opaque(self, max_level: u16) -> bool {
        self.0 == max_level
    }

    /// True for interior levels `1..L-1`, the only ones that are reference counted.
    #[inline]
    pub const fn is_fade(self, max_level: u16) -> bool {
        self.0 > 0 && self.0 < max_level
    }

    #[inline]
    pub const fn in_range(self, max_level: u16) -> bool {
        self.0 <= max_level
    }

    /// Normalized alpha `level / L`.
    #[inline]
    pub fn alpha(self, max_level: u16) -> f32 {
        if max_level == 0 {
            return 0.0;
        }
        f32::from(self.0) / f32::from(max_level)
    }

    /// Quantize a continuous opacity in `[0, 1]` to `round(value * L)`.
    ///
    /// Halves round away from zero. Non-finite or out-of-range input is an error
    /// rather than being clamped.
    pub fn quantize(value: f32, max_level: u16) -> Result<Self, CacheError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(CacheError::OutOfRangeOpacity { value });
        }
        let scaled = (f64::from(value) * f64::from(max_level)).round();
        // value <= 1 keeps scaled within [0, max_level]
        Ok(Level(scaled as u16))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Level {
    fn from(v: u8) -> Self {
        Level(u16::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels() {
        assert!(Level::TRANSPARENT.is_transparent());
        assert!(Level::opaque(255).is_opaque(255));
        assert!(!Level::opaque(255).is_fade(255));
        assert!(!Level::TRANSPARENT.is_fade(255));
        assert!(Level(1).is_fade(255));
        assert!(Level(254).is_fade(255));
        assert!(!Level(256).in_range(255));
    }

    #[test]
    fn quantize_rounds_to_nearest() {
        assert_eq!(Level::quantize(0.0, 255).unwrap(), Level(0));
        assert_eq!(Level::quantize(1.0, 255).unwrap(), Level(255));
        assert_eq!(Level::quantize(0.998, 255).unwrap(), Level(254));
        assert_eq!(Level::quantize(0.5, 10).unwrap(), Level(5));
        assert_eq!(Level::quantize(0.001, 255).unwrap(), Level(0));
    }

    #[test]
    fn quantize_rounds_0_999_to_opaque_not_254() {
        // 0.999 * 255 = 254.745; round-to-nearest lands on the opaque level,
        // so a slider this close to 1 shares the opaque resource.
        assert_eq!(Level::quantize(0.999, 255).unwrap(), Level(255));
        assert_eq!(Level::quantize(0.998, 255).unwrap(), Level(254));
    }

    #[test]
    fn quantize_rejects_out_of_range() {
        assert!(matches!(
            Level::quantize(1.5, 255),
            Err(CacheError::OutOfRangeOpacity { .. })
        ));
        assert!(matches!(
            Level::quantize(-0.1, 255),
            Err(CacheError::OutOfRangeOpacity { .. })
        ));
        assert!(Level::quantize(f32::NAN, 255).is_err());
    }

    #[test]
    fn alpha_is_level_over_max() {
        assert_eq!(Level(51).alpha(255), 0.2);
        assert_eq!(Level(255).alpha(255), 1.0);
        assert_eq!(Level(0).alpha(255), 0.0);
    }
}
