//! Error types for the fade cache.

use thiserror::Error;

/// Failure reported by a [`ResourceFactory`](crate::ResourceFactory) while
/// creating a fade resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct FactoryError {
    pub reason: String,
}

impl FactoryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors produced by cache and consumer operations.
///
/// Apart from [`CacheError::Factory`] these are all caller bookkeeping bugs.
/// They are surfaced as soon as they are detected so that leaked or doubly
/// released references never go unnoticed.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CacheError {
    /// Level outside `[0, max_level]`, or a sentinel where one is not allowed.
    #[error("level {level} is out of range [0, {max_level}]")]
    OutOfRangeLevel { level: u16, max_level: u16 },

    /// Continuous opacity that cannot be quantized.
    #[error("opacity {value} is not a finite value in [0, 1]")]
    OutOfRangeOpacity { value: f32 },

    /// Release of a level that has no outstanding reference.
    #[error("release of level {level} which holds no reference")]
    UnderflowRelease { level: u16 },

    /// Peek at a fade level that is not currently backed by a resource.
    #[error("level {level} is not tracked")]
    UntrackedLevel { level: u16 },

    /// A factory or destructor callback called back into the cache.
    #[error("re-entrant cache call during {operation}")]
    ReentrantCacheCall { operation: &'static str },

    /// Operation on a consumer that has already been disposed.
    #[error("consumer already disposed")]
    ConsumerDisposed,

    /// Cache configuration rejected at construction.
    #[error("invalid cache config: {reason}")]
    InvalidConfig { reason: String },

    /// The resource factory failed to create a fade resource.
    #[error("factory failed for level {level}: {source}")]
    Factory {
        level: u16,
        #[source]
        source: FactoryError,
    },
}

impl CacheError {
    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfRangeLevel { .. } | Self::OutOfRangeOpacity { .. } => "range",
            Self::UnderflowRelease { .. }
            | Self::UntrackedLevel { .. }
            | Self::ConsumerDisposed => "bookkeeping",
            Self::ReentrantCacheCall { .. } => "reentrancy",
            Self::InvalidConfig { .. } => "config",
            Self::Factory { .. } => "factory",
        }
    }
}
