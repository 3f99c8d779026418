//! Field table cache

use dashmap::DashMap;
use objmap_meta::{Reflect, Shape};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Per-type [`Shape`] cache; each type's field table is built once.
#[derive(Default)]
pub struct ShapeCache {
    shapes: DashMap<TypeId, Arc<Shape>>,
}

impl ShapeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            shapes: DashMap::new(),
        }
    }

    /// Field table of the runtime type of `value`
    pub fn shape_of(&self, value: &dyn Reflect) -> Arc<Shape> {
        let key = value.type_key();
        if let Some(shape) = self.shapes.get(&key.id()) {
            return Arc::clone(shape.value());
        }

        trace!("Building field table for {}", key);
        let shape = Arc::new((value.shape_builder())());
        Arc::clone(self.shapes.entry(key.id()).or_insert(shape).value())
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if nothing is cached yet
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop every cached table
    pub fn clear(&self) {
        self.shapes.clear();
    }
}

impl fmt::Debug for ShapeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeCache")
            .field("shapes", &self.len())
            .finish()
    }
}
