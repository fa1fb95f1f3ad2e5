//! Resource factory seam.
//!
//! Hosts implement [`ResourceFactory`] to turn a base definition plus a fade
//! level into whatever their renderer uses (a material handle, a GPU bind
//! group id, ...). The cache is the only caller.

use std::fmt;
use std::rc::Rc;

use crate::error::FactoryError;
use crate::level::Level;
use crate::material::{BaseDefinition, MaterialParams};

/// Creates and destroys fade resources on behalf of the cache.
pub trait ResourceFactory {
    /// Cheap handle to a shared resource; cloned out to every holder.
    type Resource: Clone;

    fn create(
        &mut self,
        base: &BaseDefinition,
        level: Level,
        max_level: u16,
    ) -> Result<Self::Resource, FactoryError>;

    fn destroy(&mut self, resource: Self::Resource);
}

/// Factory built from a pair of closures.
pub struct FnFactory<C, D> {
    create: C,
    destroy: D,
}

impl<C, D> FnFactory<C, D> {
    pub fn new(create: C, destroy: D) -> Self {
        Self { create, destroy }
    }
}

impl<C, D> fmt::Debug for FnFactory<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory").finish_non_exhaustive()
    }
}

impl<R, C, D> ResourceFactory for FnFactory<C, D>
where
    R: Clone,
    C: FnMut(&BaseDefinition, Level, u16) -> Result<R, FactoryError>,
    D: FnMut(R),
{
    type Resource = R;

    fn create(
        &mut self,
        base: &BaseDefinition,
        level: Level,
        max_level: u16,
    ) -> Result<R, FactoryError> {
        (self.create)(base, level, max_level)
    }

    fn destroy(&mut self, resource: R) {
        (self.destroy)(resource)
    }
}

/// Default factory producing shared [`MaterialParams`] handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialFactory;

impl ResourceFactory for MaterialFactory {
    type Resource = Rc<MaterialParams>;

    fn create(
        &mut self,
        base: &BaseDefinition,
        level: Level,
        max_level: u16,
    ) -> Result<Self::Resource, FactoryError> {
        if base.fade_shader.is_empty() {
            return Err(FactoryError::new("base definition has no fade shader"));
        }
        Ok(Rc::new(base.derive_fade(level, max_level)))
    }

    fn destroy(&mut self, resource: Self::Resource) {
        // Holders that have not refreshed yet keep the params alive until they do.
        drop(resource);
    }
}
