//! Per-item opacity holder.
//!
//! A [`FadeConsumer`] owns at most one reference in a [`FadeCache`] at any
//! time and pushes the matching resource into its [`FadeTarget`]. The cache is
//! passed into each call rather than stored, so an owner can keep the cache and
//! all of its consumers side by side. The cache must outlive every consumer
//! that took a reference from it, and each consumer must be used with that
//! same cache.

use log::warn;

use crate::cache::FadeCache;
use crate::error::CacheError;
use crate::factory::ResourceFactory;
use crate::level::Level;

/// The visual representation a consumer drives.
pub trait FadeTarget {
    type Resource;

    /// Use `resource` from now on; `None` for the transparent level.
    fn apply_resource(&mut self, resource: Option<&Self::Resource>);

    fn set_visible(&mut self, visible: bool);
}

/// Tracks the held level and warns if it is dropped without being disposed.
#[derive(Debug)]
struct Holding {
    level: Level,
    disposed: bool,
}

impl Drop for Holding {
    fn drop(&mut self) {
        if !self.disposed && !self.level.is_transparent() {
            warn!(
                "fade consumer dropped while holding level {}; its reference is leaked",
                self.level
            );
        }
    }
}

/// One visual item whose opacity is backed by the shared cache.
#[derive(Debug)]
pub struct FadeConsumer<T: FadeTarget> {
    holding: Holding,
    target: T,
}

impl<T: FadeTarget> FadeConsumer<T> {
    /// Consumer at the transparent level; the target is hidden.
    pub fn new(mut target: T) -> Self {
        target.set_visible(false);
        target.apply_resource(None);
        Self {
            holding: Holding {
                level: Level::TRANSPARENT,
                disposed: false,
            },
            target,
        }
    }

    /// Consumer that starts out holding `level`.
    pub fn with_level<F>(cache: &FadeCache<F>, target: T, level: Level) -> Result<Self, CacheError>
    where
        F: ResourceFactory<Resource = T::Resource>,
    {
        let mut consumer = Self::new(target);
        consumer.set_level(cache, level)?;
        Ok(consumer)
    }

    #[inline]
    pub fn current_level(&self) -> Level {
        self.holding.level
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.holding.disposed
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    fn ensure_live(&self) -> Result<(), CacheError> {
        if self.holding.disposed {
            Err(CacheError::ConsumerDisposed)
        } else {
            Ok(())
        }
    }

    fn apply(&mut self, resource: Option<&T::Resource>) {
        self.target
            .set_visible(!self.holding.level.is_transparent());
        self.target.apply_resource(resource);
    }

    /// Quantize `value` and switch to the resulting level. Returns the new level.
    pub fn set_opacity<F>(&mut self, cache: &FadeCache<F>, value: f32) -> Result<Level, CacheError>
    where
        F: ResourceFactory<Resource = T::Resource>,
    {
        self.ensure_live()?;
        let level = Level::quantize(value, cache.max_level())?;
        self.set_level(cache, level)?;
        Ok(level)
    }

    /// Switch ownership to `level` and apply its resource.
    pub fn set_level<F>(&mut self, cache: &FadeCache<F>, level: Level) -> Result<(), CacheError>
    where
        F: ResourceFactory<Resource = T::Resource>,
    {
        self.ensure_live()?;
        let resource = cache.switch_level(self.holding.level, level)?;
        self.holding.level = level;
        self.apply(resource.as_ref());
        Ok(())
    }

    /// Re-read the current resource without changing ownership, e.g. after
    /// [`FadeCache::rebuild`].
    pub fn refresh_resource<F>(&mut self, cache: &FadeCache<F>) -> Result<(), CacheError>
    where
        F: ResourceFactory<Resource = T::Resource>,
    {
        self.ensure_live()?;
        let resource = cache.peek(self.holding.level)?;
        self.apply(resource.as_ref());
        Ok(())
    }

    /// Release the held level. A second call is [`CacheError::ConsumerDisposed`].
    pub fn dispose<F>(&mut self, cache: &FadeCache<F>) -> Result<(), CacheError>
    where
        F: ResourceFactory<Resource = T::Resource>,
    {
        self.ensure_live()?;
        let level = self.holding.level;
        if !level.is_transparent() {
            cache.release(level)?;
        }
        self.holding.level = Level::TRANSPARENT;
        self.holding.disposed = true;
        self.target.set_visible(false);
        self.target.apply_resource(None);
        Ok(())
    }

    /// Give the target back, e.g. to hand it to whoever spawned it.
    pub fn into_target(self) -> T {
        self.target
    }
}
