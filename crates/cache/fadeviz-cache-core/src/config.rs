//! Cache configuration.

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Default level resolution: an 8-bit alpha channel.
pub const DEFAULT_MAX_LEVEL: u16 = 255;

/// Configuration for a [`FadeCache`](crate::FadeCache).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Highest level `L`; level `L` is opaque and `1..L-1` are fade levels.
    pub max_level: u16,
    /// Initial capacity hint for the level table.
    pub capacity_hint: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            // every fade level of an 8-bit range
            capacity_hint: usize::from(DEFAULT_MAX_LEVEL - 1),
        }
    }
}

impl CacheConfig {
    pub fn with_max_level(max_level: u16) -> Self {
        Self {
            max_level,
            capacity_hint: usize::from(max_level.saturating_sub(1)),
        }
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.max_level < 2 {
            return Err(CacheError::InvalidConfig {
                reason: format!(
                    "max_level must be at least 2 to leave a fade level, got {}",
                    self.max_level
                ),
            });
        }
        Ok(())
    }
}
