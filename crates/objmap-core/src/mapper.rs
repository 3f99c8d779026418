//! Mapper entry point
//!
//! Every mapping call, whether from user code, from a relation callback, or
//! from the default pass recursing into a nested field, goes through
//! [`Mapper::map_into`]. That keeps relations registered for nested type
//! pairs in force at every depth.

use crate::convention;
use crate::registry::RelationRegistry;
use crate::services::ServiceProvider;
use crate::shapes::ShapeCache;
use crate::{Error, Result};
use objmap_meta::{Mappable, Reflect, TypePair};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Default nesting limit for a single mapping call
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolves and executes mappings between arbitrary type pairs
#[derive(Clone)]
pub struct Mapper {
    registry: Arc<RelationRegistry>,
    shapes: Arc<ShapeCache>,
    services: Option<Arc<dyn ServiceProvider>>,
    max_depth: usize,
    depth: usize,
}

impl Mapper {
    /// Create a mapper over `registry` with a private shape cache
    pub fn new(registry: Arc<RelationRegistry>) -> Self {
        Self {
            registry,
            shapes: Arc::new(ShapeCache::new()),
            services: None,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Share a shape cache with other mappers
    #[must_use]
    pub fn with_shapes(mut self, shapes: Arc<ShapeCache>) -> Self {
        self.shapes = shapes;
        self
    }

    /// Attach a service provider for relation callbacks
    #[must_use]
    pub fn with_services(mut self, services: Arc<dyn ServiceProvider>) -> Self {
        self.services = Some(services);
        self
    }

    /// Set the nesting limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Registry this mapper resolves against
    pub fn registry(&self) -> &RelationRegistry {
        &self.registry
    }

    /// Shape cache used by the default pass
    pub fn shapes(&self) -> &ShapeCache {
        &self.shapes
    }

    /// Attached service provider
    pub fn services(&self) -> Option<&dyn ServiceProvider> {
        self.services.as_deref()
    }

    /// Typed service lookup through the attached provider
    pub fn service<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .as_ref()?
            .resolve(TypeId::of::<T>())?
            .downcast::<T>()
            .ok()
    }

    /// Nesting level of this mapper; 0 outside any mapping call
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Nesting limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Map `source` into a new default-constructed `T`
    ///
    /// # Errors
    ///
    /// Propagates errors from relation callbacks and the depth limit.
    pub fn map<T: Mappable + Default>(&self, source: &dyn Reflect) -> Result<T> {
        let mut target = T::default();
        self.map_into(source, &mut target)?;
        Ok(target)
    }

    /// Map `source` into an existing `target`.
    ///
    /// Uses the relation registered for the exact runtime pair when there is
    /// one, the default field-by-field pass otherwise.
    ///
    /// # Errors
    ///
    /// Propagates errors from relation callbacks and the depth limit.
    pub fn map_into(&self, source: &dyn Reflect, target: &mut dyn Reflect) -> Result<()> {
        let pair = TypePair::new(source.type_key(), target.type_key());
        let scope = self.descend(pair)?;
        scope.dispatch(pair, source, target)
    }

    /// Map with optional arguments, rejecting absent ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when either side is `None`.
    pub fn map_nullable(
        &self,
        source: Option<&dyn Reflect>,
        target: Option<&mut dyn Reflect>,
    ) -> Result<()> {
        let source = source.ok_or(Error::InvalidArgument("source"))?;
        let target = target.ok_or(Error::InvalidArgument("target"))?;
        self.map_into(source, target)
    }

    /// Map every source into a new `T`, in order
    ///
    /// # Errors
    ///
    /// Stops at the first failing element.
    pub fn map_all<'s, T, S, I>(&self, sources: I) -> Result<Vec<T>>
    where
        T: Mappable + Default,
        S: Mappable,
        I: IntoIterator<Item = &'s S>,
    {
        sources
            .into_iter()
            .map(|source| self.map::<T>(source))
            .collect()
    }

    fn descend(&self, pair: TypePair) -> Result<Mapper> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.max_depth,
                pair: pair.to_string(),
            });
        }
        let mut scope = self.clone();
        scope.depth += 1;
        Ok(scope)
    }

    fn dispatch(&self, pair: TypePair, source: &dyn Reflect, target: &mut dyn Reflect) -> Result<()> {
        let Some(relation) = self.registry.resolve(&pair) else {
            return convention::map_fields(self, source, target);
        };

        trace!("Applying relation {} at depth {}", pair, self.depth);
        if relation.use_default_mapper() {
            convention::map_fields(self, source, target)?;
        }
        relation.apply(self, source.as_any(), target.as_any_mut())
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("relations", &self.registry.len())
            .field("has_services", &self.services.is_some())
            .field("max_depth", &self.max_depth)
            .field("depth", &self.depth)
            .finish()
    }
}
