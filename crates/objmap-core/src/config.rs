//! Mapper configuration
//!
//! [`MapperConfig`] owns the relation registry and the shape cache that its
//! mappers share. Profiles are loaded into it by type, by catalog entry, or
//! by name from [`MapperSettings`].

use crate::catalog::{ProfileCatalog, ProfileEntry};
use crate::mapper::{Mapper, DEFAULT_MAX_DEPTH};
use crate::profile::Profile;
use crate::registry::RelationRegistry;
use crate::services::ServiceProvider;
use crate::settings::{self, MapperSettings};
use crate::shapes::ShapeCache;
use crate::{Error, Result};
use objmap_meta::TypeKey;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Profile loading and mapper construction
pub struct MapperConfig {
    registry: Arc<RelationRegistry>,
    shapes: Arc<ShapeCache>,
    services: Option<Arc<dyn ServiceProvider>>,
    max_depth: usize,
    loaded: Vec<TypeKey>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperConfig {
    /// Create a configuration with an empty registry
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RelationRegistry::new()),
            shapes: Arc::new(ShapeCache::new()),
            services: None,
            max_depth: DEFAULT_MAX_DEPTH,
            loaded: Vec::new(),
        }
    }

    /// Build a configuration from settings, loading each named profile
    /// from `catalog`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a name the catalog does not know,
    /// [`Error::Settings`] for a zero `max_depth`.
    pub fn from_settings(settings: &MapperSettings, catalog: &ProfileCatalog) -> Result<Self> {
        let mut config = Self::new().with_max_depth(settings.max_depth)?;
        for name in &settings.profiles {
            config.add_profile_named(catalog, name)?;
        }
        Ok(config)
    }

    /// Attach a service provider handed to every mapper
    #[must_use]
    pub fn with_services(mut self, services: Arc<dyn ServiceProvider>) -> Self {
        self.services = Some(services);
        self
    }

    /// Set the nesting limit handed to every mapper
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] when `max_depth` is zero.
    pub fn with_max_depth(mut self, max_depth: usize) -> Result<Self> {
        settings::check_max_depth(max_depth)?;
        self.max_depth = max_depth;
        Ok(self)
    }

    /// Load profile `P`
    pub fn add_profile<P: Profile>(&mut self) -> &mut Self {
        self.load(&ProfileEntry::of::<P>());
        self
    }

    /// Load the profile whose type key is `type_key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the type when `catalog` has
    /// no profile for it.
    pub fn add_profile_type(
        &mut self,
        catalog: &ProfileCatalog,
        type_key: TypeKey,
    ) -> Result<&mut Self> {
        let entry = catalog
            .find(type_key)
            .ok_or_else(|| Error::configuration(type_key.name()))?;
        self.load(entry);
        Ok(self)
    }

    /// Load a profile by full or short type name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `catalog` has no such profile.
    pub fn add_profile_named(&mut self, catalog: &ProfileCatalog, name: &str) -> Result<&mut Self> {
        let entry = catalog
            .find_named(name)
            .ok_or_else(|| Error::configuration(name))?;
        self.load(entry);
        Ok(self)
    }

    /// Load several profiles by type key, stopping at the first unknown one.
    ///
    /// # Errors
    ///
    /// As [`MapperConfig::add_profile_type`].
    pub fn add_profile_types<I>(&mut self, catalog: &ProfileCatalog, types: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = TypeKey>,
    {
        for type_key in types {
            self.add_profile_type(catalog, type_key)?;
        }
        Ok(self)
    }

    /// Load every profile in `catalog`
    pub fn add_profiles(&mut self, catalog: &ProfileCatalog) -> &mut Self {
        for entry in catalog.entries() {
            self.load(entry);
        }
        self
    }

    fn load(&mut self, entry: &ProfileEntry) {
        let declared = entry.install(&self.registry);
        debug!(
            "Profile loaded: {} ({} relations)",
            entry.type_key(),
            declared
        );
        if !self.loaded.contains(&entry.type_key()) {
            self.loaded.push(entry.type_key());
        }
    }

    /// Profiles loaded so far, in load order
    pub fn loaded_profiles(&self) -> &[TypeKey] {
        &self.loaded
    }

    /// Registry the profiles declared into
    pub fn registry(&self) -> &Arc<RelationRegistry> {
        &self.registry
    }

    /// Drop every relation and forget loaded profiles.
    ///
    /// Mappers created earlier share the registry and see the reset on
    /// their next lookup.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.loaded.clear();
        debug!("Mapper configuration reset");
    }

    /// Create a mapper over this configuration
    pub fn mapper(&self) -> Mapper {
        let mapper = Mapper::new(Arc::clone(&self.registry))
            .with_shapes(Arc::clone(&self.shapes))
            .with_max_depth(self.max_depth);
        match &self.services {
            Some(services) => mapper.with_services(Arc::clone(services)),
            None => mapper,
        }
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("relations", &self.registry.len())
            .field("profiles", &self.loaded.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
