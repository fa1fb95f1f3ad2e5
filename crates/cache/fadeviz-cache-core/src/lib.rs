//! fadeviz-cache-core: shared per-opacity render resources (engine-agnostic).
//!
//! Many visual items want a faded look at some opacity. Instead of one
//! resource per item, opacity is quantized to a [`Level`] and every item at the
//! same level shares one resource owned by a [`FadeCache`]. The cache counts
//! holders per level, creates a level's resource on first use and destroys it
//! when the last holder leaves. [`FadeConsumer`] is the per-item side: it keeps
//! exactly one reference (or none) and applies the resource to its
//! [`FadeTarget`].
//!
//! Rendering itself is the host's business; the host supplies a
//! [`ResourceFactory`] and receives handles.

pub mod cache;
pub mod config;
pub mod consumer;
pub mod error;
pub mod factory;
pub mod level;
pub mod material;

pub use cache::{CacheSnapshot, CacheStats, FadeCache};
pub use config::{CacheConfig, DEFAULT_MAX_LEVEL};
pub use consumer::{FadeConsumer, FadeTarget};
pub use error::{CacheError, FactoryError};
pub use factory::{FnFactory, MaterialFactory, ResourceFactory};
pub use level::Level;
pub use material::{BaseDefinition, MaterialParams, Rgba};

/// Result type for cache operations.
pub type Result<T> = core::result::Result<T, CacheError>;
