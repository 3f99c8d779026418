//! Profile catalog
//!
//! Explicit list of the concrete profile types a program offers for
//! loading by type key or by name. Each entry carries the install function
//! monomorphized for its profile, so loading needs no further type
//! information.

use crate::profile::{self, Profile};
use crate::registry::RelationRegistry;
use objmap_meta::TypeKey;

/// One loadable profile type
#[derive(Debug, Clone, Copy)]
pub struct ProfileEntry {
    type_key: TypeKey,
    install: fn(&RelationRegistry) -> usize,
}

impl ProfileEntry {
    /// Entry for profile `P`
    pub fn of<P: Profile>() -> Self {
        Self {
            type_key: TypeKey::of::<P>(),
            install: profile::install::<P>,
        }
    }

    /// Type key of the profile
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Short type name of the profile
    pub fn name(&self) -> &'static str {
        self.type_key.short_name()
    }

    /// Build the profile and register its relations into `registry`.
    ///
    /// Returns the number of relations declared.
    pub fn install(&self, registry: &RelationRegistry) -> usize {
        (self.install)(registry)
    }
}

/// Ordered set of loadable profile types
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    entries: Vec<ProfileEntry>,
}

impl ProfileCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add profile `P`, builder style
    #[must_use]
    pub fn with<P: Profile>(mut self) -> Self {
        self.insert::<P>();
        self
    }

    /// Add profile `P`; adding the same type twice keeps one entry
    pub fn insert<P: Profile>(&mut self) -> &mut Self {
        let entry = ProfileEntry::of::<P>();
        if self.find(entry.type_key()).is_none() {
            self.entries.push(entry);
        }
        self
    }

    /// Look up an entry by type key
    pub fn find(&self, type_key: TypeKey) -> Option<&ProfileEntry> {
        self.entries.iter().find(|e| e.type_key == type_key)
    }

    /// Look up an entry by full or short type name.
    ///
    /// Full names win over short names when both would match.
    pub fn find_named(&self, name: &str) -> Option<&ProfileEntry> {
        self.entries
            .iter()
            .find(|e| e.type_key.name() == name)
            .or_else(|| self.entries.iter().find(|e| e.name() == name))
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
