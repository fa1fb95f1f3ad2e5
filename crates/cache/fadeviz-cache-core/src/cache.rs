//! Shared, reference-counted fade resource cache.
//!
//! One resource per interior level `1..L-1` that at least one holder uses,
//! plus a single caller-supplied opaque resource for level `L`. Level `0`
//! never holds anything.
//!
//! All operations take `&self`. The level table sits behind a `RefCell` that
//! is borrowed for the whole call, so a factory or destructor that calls back
//! into the cache gets [`CacheError::ReentrantCacheCall`] instead of observing
//! a half-updated table.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::factory::{MaterialFactory, ResourceFactory};
use crate::level::Level;
use crate::material::BaseDefinition;

/// Counters over the cache's lifetime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Factory `create` calls that succeeded.
    pub created: u64,
    /// Factory `destroy` calls.
    pub destroyed: u64,
    /// Acquires served by an already tracked level.
    pub hits: u64,
    pub rebuilds: u64,
}

/// Point-in-time copy of the level table, see [`FadeCache::snapshot`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub levels: Vec<(Level, u32)>,
    pub stats: CacheStats,
}

/// One tracked fade level. `ref_count` is never zero while the slot exists.
#[derive(Debug)]
struct Slot<R> {
    resource: R,
    ref_count: u32,
}

struct CacheState<F: ResourceFactory> {
    base: BaseDefinition,
    opaque: F::Resource,
    slots: HashMap<Level, Slot<F::Resource>>,
    factory: F,
    stats: CacheStats,
}

impl<F: ResourceFactory> CacheState<F> {
    fn acquire(&mut self, level: Level, max_level: u16) -> Result<F::Resource, CacheError> {
        if level.is_opaque(max_level) {
            return Ok(self.opaque.clone());
        }
        match self.slots.entry(level) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                slot.ref_count += 1;
                self.stats.hits += 1;
                trace!("level {level} acquired, {} holders", slot.ref_count);
                Ok(slot.resource.clone())
            }
            Entry::Vacant(vacant) => {
                let resource = self
                    .factory
                    .create(&self.base, level, max_level)
                    .map_err(|source| CacheError::Factory {
                        level: level.value(),
                        source,
                    })?;
                self.stats.created += 1;
                debug!("created fade resource for level {level}");
                vacant.insert(Slot {
                    resource: resource.clone(),
                    ref_count: 1,
                });
                Ok(resource)
            }
        }
    }

    fn release(&mut self, level: Level, max_level: u16) -> Result<(), CacheError> {
        if level.is_opaque(max_level) {
            return Ok(());
        }
        match self.slots.entry(level) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().ref_count > 1 {
                    occupied.get_mut().ref_count -= 1;
                    trace!(
                        "level {level} released, {} holders",
                        occupied.get().ref_count
                    );
                } else {
                    let slot = occupied.remove();
                    self.factory.destroy(slot.resource);
                    self.stats.destroyed += 1;
                    debug!("evicted fade resource for level {level}");
                }
                Ok(())
            }
            Entry::Vacant(_) => Err(CacheError::UnderflowRelease {
                level: level.value(),
            }),
        }
    }

    fn peek(&self, level: Level, max_level: u16) -> Result<Option<F::Resource>, CacheError> {
        if level.is_transparent() {
            return Ok(None);
        }
        if level.is_opaque(max_level) {
            return Ok(Some(self.opaque.clone()));
        }
        self.slots
            .get(&level)
            .map(|slot| Some(slot.resource.clone()))
            .ok_or(CacheError::UntrackedLevel {
                level: level.value(),
            })
    }

    fn sorted_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self.slots.keys().copied().collect();
        levels.sort_unstable();
        levels
    }

    fn rebuild(&mut self, base: BaseDefinition, max_level: u16) -> Result<(), CacheError> {
        self.base = base;
        for level in self.sorted_levels() {
            let fresh = self
                .factory
                .create(&self.base, level, max_level)
                .map_err(|source| CacheError::Factory {
                    level: level.value(),
                    source,
                })?;
            self.stats.created += 1;
            if let Some(slot) = self.slots.get_mut(&level) {
                let stale = std::mem::replace(&mut slot.resource, fresh);
                self.factory.destroy(stale);
                self.stats.destroyed += 1;
            }
        }
        self.stats.rebuilds += 1;
        debug!("rebuilt {} fade resources", self.slots.len());
        Ok(())
    }
}

/// Reference-counted pool of fade resources keyed by [`Level`].
pub struct FadeCache<F: ResourceFactory> {
    max_level: u16,
    state: RefCell<CacheState<F>>,
}

impl FadeCache<MaterialFactory> {
    /// Cache backed by [`MaterialFactory`], with the opaque resource derived from `base`.
    pub fn with_materials(config: CacheConfig, base: BaseDefinition) -> Result<Self, CacheError> {
        let opaque = Rc::new(base.opaque(config.max_level));
        Self::new(config, base, opaque, MaterialFactory)
    }
}

impl<F: ResourceFactory> FadeCache<F> {
    /// Create a cache. `opaque` is owned by the caller and shared by every
    /// holder of level `max_level`; it is never counted or destroyed.
    pub fn new(
        config: CacheConfig,
        base: BaseDefinition,
        opaque: F::Resource,
        factory: F,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            max_level: config.max_level,
            state: RefCell::new(CacheState {
                base,
                opaque,
                slots: HashMap::with_capacity(config.capacity_hint),
                factory,
                stats: CacheStats::default(),
            }),
        })
    }

    #[inline]
    pub fn max_level(&self) -> u16 {
        self.max_level
    }

    /// The opaque sentinel for this cache.
    #[inline]
    pub fn opaque_level(&self) -> Level {
        Level::opaque(self.max_level)
    }

    fn check_range(&self, level: Level) -> Result<(), CacheError> {
        if level.in_range(self.max_level) {
            Ok(())
        } else {
            Err(CacheError::OutOfRangeLevel {
                level: level.value(),
                max_level: self.max_level,
            })
        }
    }

    /// Like `check_range`, but also rejects the transparent level.
    fn check_held(&self, level: Level) -> Result<(), CacheError> {
        if level.is_transparent() {
            return Err(CacheError::OutOfRangeLevel {
                level: 0,
                max_level: self.max_level,
            });
        }
        self.check_range(level)
    }

    fn write(&self, operation: &'static str) -> Result<RefMut<'_, CacheState<F>>, CacheError> {
        self.state
            .try_borrow_mut()
            .map_err(|_| CacheError::ReentrantCacheCall { operation })
    }

    /// Take one reference on `level` (`0 < level <= L`).
    ///
    /// Creates the level's resource on first use. Level `L` returns the opaque
    /// resource without touching any count.
    pub fn acquire(&self, level: Level) -> Result<F::Resource, CacheError> {
        self.check_held(level)?;
        self.write("acquire")?.acquire(level, self.max_level)
    }

    /// Drop one reference on `level` (`0 < level <= L`).
    ///
    /// The last release destroys the level's resource. Releasing a level with
    /// no outstanding reference is [`CacheError::UnderflowRelease`].
    pub fn release(&self, level: Level) -> Result<(), CacheError> {
        self.check_held(level)?;
        self.write("release")?.release(level, self.max_level)
    }

    /// Move one reference from `old` to `new`; either may be `0`.
    ///
    /// `old == new` touches nothing and returns the current handle. Otherwise
    /// `new` is acquired before `old` is released, so a factory failure leaves
    /// the caller still holding `old`. Returns `None` when `new` is `0`.
    pub fn switch_level(&self, old: Level, new: Level) -> Result<Option<F::Resource>, CacheError> {
        self.check_range(old)?;
        self.check_range(new)?;
        let mut state = self.write("switch_level")?;
        if old == new {
            return state.peek(new, self.max_level);
        }

        let resource = if new.is_transparent() {
            None
        } else {
            Some(state.acquire(new, self.max_level)?)
        };

        if !old.is_transparent() {
            if let Err(err) = state.release(old, self.max_level) {
                if !new.is_transparent() {
                    if let Err(rollback) = state.release(new, self.max_level) {
                        warn!("rollback of level {new} failed: {rollback}");
                    }
                }
                return Err(err);
            }
        }
        Ok(resource)
    }

    /// Current resource for `level` without changing any count.
    ///
    /// `0` yields `None`, `L` the opaque resource; an untracked fade level is
    /// [`CacheError::UntrackedLevel`].
    pub fn peek(&self, level: Level) -> Result<Option<F::Resource>, CacheError> {
        self.check_range(level)?;
        let state = self
            .state
            .try_borrow()
            .map_err(|_| CacheError::ReentrantCacheCall { operation: "peek" })?;
        state.peek(level, self.max_level)
    }

    /// Regenerate every tracked fade resource from `base`, keeping levels and
    /// counts unchanged. Holders must [`peek`](Self::peek) again to see the new
    /// instances.
    ///
    /// Levels are regenerated in ascending order. If the factory fails, the
    /// error is returned and the levels below the failing one have already been
    /// replaced; the failing level and those above keep their old resources.
    pub fn rebuild(&self, base: BaseDefinition) -> Result<(), CacheError> {
        self.write("rebuild")?.rebuild(base, self.max_level)
    }

    /// Replace the caller-owned opaque resource, returning the previous one.
    pub fn set_opaque(&self, opaque: F::Resource) -> Result<F::Resource, CacheError> {
        let mut state = self.write("set_opaque")?;
        Ok(std::mem::replace(&mut state.opaque, opaque))
    }

    /// Levels with their counts, in ascending order, plus the stats.
    ///
    /// Unlike the getters below this is safe to call from a factory callback,
    /// where it reports [`CacheError::ReentrantCacheCall`].
    pub fn snapshot(&self) -> Result<CacheSnapshot, CacheError> {
        let state = self
            .state
            .try_borrow()
            .map_err(|_| CacheError::ReentrantCacheCall {
                operation: "snapshot",
            })?;
        let levels = state
            .sorted_levels()
            .into_iter()
            .map(|level| (level, state.slots.get(&level).map_or(0, |slot| slot.ref_count)))
            .collect();
        Ok(CacheSnapshot {
            levels,
            stats: state.stats,
        })
    }

    // Host-side introspection. These panic when called from inside a factory
    // callback; use `snapshot` there.

    pub fn base(&self) -> BaseDefinition {
        self.state.borrow().base.clone()
    }

    pub fn is_tracked(&self, level: Level) -> bool {
        self.state.borrow().slots.contains_key(&level)
    }

    /// Outstanding references on a fade level; `0` for untracked and sentinel levels.
    pub fn ref_count(&self, level: Level) -> u32 {
        self.state
            .borrow()
            .slots
            .get(&level)
            .map_or(0, |slot| slot.ref_count)
    }

    /// Tracked fade levels in ascending order.
    pub fn tracked_levels(&self) -> Vec<Level> {
        self.state.borrow().sorted_levels()
    }

    /// Sum of all fade-level reference counts.
    pub fn total_references(&self) -> u64 {
        self.state
            .borrow()
            .slots
            .values()
            .map(|slot| u64::from(slot.ref_count))
            .sum()
    }

    pub fn stats(&self) -> CacheStats {
        self.state.borrow().stats
    }
}

impl<F: ResourceFactory> fmt::Debug for FadeCache<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("FadeCache");
        d.field("max_level", &self.max_level);
        match self.state.try_borrow() {
            Ok(state) => d
                .field("tracked", &state.slots.len())
                .field("stats", &state.stats),
            Err(_) => d.field("state", &"<borrowed>"),
        };
        d.finish()
    }
}

impl<F: ResourceFactory> Drop for FadeCache<F> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.slots.is_empty() {
            return;
        }
        let mut leaked: Vec<(Level, u32)> = state
            .slots
            .iter()
            .map(|(level, slot)| (*level, slot.ref_count))
            .collect();
        leaked.sort_unstable();
        warn!("fade cache dropped with outstanding references: {leaked:?}");
        for (_, slot) in state.slots.drain() {
            state.factory.destroy(slot.resource);
        }
    }
}
