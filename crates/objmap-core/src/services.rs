//! Service lookup for mapping callbacks
//!
//! A [`Mapper`](crate::Mapper) can carry a [`ServiceProvider`] so profile
//! callbacks can reach collaborators (formatters, lookup tables) without
//! the mapper knowing their types.

use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Resolves services by type
pub trait ServiceProvider: Send + Sync {
    /// Service registered for `service`, if any
    fn resolve(&self, service: TypeId) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// Concurrent type-indexed service store
#[derive(Default)]
pub struct ServiceRegistry {
    services: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Register a service, replacing any earlier one of the same type
    pub fn insert<T: Any + Send + Sync>(&self, service: T) -> &Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    /// Register an already shared service
    pub fn insert_shared<T: Any + Send + Sync>(&self, service: Arc<T>) -> &Self {
        self.services.insert(TypeId::of::<T>(), service);
        self
    }

    /// Typed lookup
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resolve(TypeId::of::<T>())
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Check if a service of type `T` is registered
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceProvider for ServiceRegistry {
    fn resolve(&self, service: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        self.services.get(&service).map(|entry| Arc::clone(entry.value()))
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.len())
            .finish()
    }
}
