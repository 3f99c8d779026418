//! Relation registry
//!
//! Store of [`MappingRelation`]s keyed by exact (source, target) type pair.
//! Safe to register into and resolve from concurrently.

use crate::relation::MappingRelation;
use dashmap::DashMap;
use objmap_meta::TypePair;
use std::fmt;
use tracing::debug;

/// Concurrent registry of mapping relations
#[derive(Default)]
pub struct RelationRegistry {
    relations: DashMap<TypePair, MappingRelation>,
}

impl RelationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            relations: DashMap::new(),
        }
    }

    /// Register a relation under its own type pair, replacing any earlier
    /// relation for the same pair
    pub fn register(&self, relation: MappingRelation) {
        let pair = relation.pair();
        if self.relations.insert(pair, relation).is_some() {
            debug!("Relation replaced: {}", pair);
        } else {
            debug!("Relation registered: {}", pair);
        }
    }

    /// Exact-match lookup; `None` is the normal "use default mapping" case
    pub fn resolve(&self, pair: &TypePair) -> Option<MappingRelation> {
        self.relations.get(pair).map(|entry| entry.value().clone())
    }

    /// Check if a relation exists for the pair
    pub fn contains(&self, pair: &TypePair) -> bool {
        self.relations.contains_key(pair)
    }

    /// Remove every relation
    pub fn reset(&self) {
        self.relations.clear();
        debug!("Relation registry reset");
    }

    /// Number of registered relations
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// All registered pairs, in no particular order
    pub fn pairs(&self) -> Vec<TypePair> {
        self.relations.iter().map(|entry| *entry.key()).collect()
    }
}

impl fmt::Debug for RelationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationRegistry")
            .field("relations", &self.len())
            .finish()
    }
}
