//! Mapping profiles
//!
//! A profile is a unit of relation declarations. Loading a profile builds a
//! default instance and lets it declare its relations into a registry.

use crate::mapper::Mapper;
use crate::registry::RelationRegistry;
use crate::relation::MappingRelation;
use crate::Result;
use std::any::{type_name, Any};
use tracing::debug;

/// A set of relation declarations.
///
/// ```
/// use objmap_core::{DeclareMaps, Profile};
///
/// #[derive(Default)]
/// struct NumberText;
///
/// impl Profile for NumberText {
///     fn declare(&self, maps: &mut DeclareMaps<'_>) {
///         maps.map_bidirectional(
///             |_, n: &i64, t: &mut String| {
///                 *t = n.to_string();
///                 Ok(())
///             },
///             |_, t: &String, n: &mut i64| {
///                 *n = t.parse().unwrap_or_default();
///                 Ok(())
///             },
///         );
///     }
/// }
/// ```
pub trait Profile: Default + Send + Sync + 'static {
    /// Declare this profile's relations
    fn declare(&self, maps: &mut DeclareMaps<'_>);
}

/// Declaration sink handed to [`Profile::declare`]
pub struct DeclareMaps<'r> {
    registry: &'r RelationRegistry,
    profile: &'static str,
    declared: usize,
}

impl<'r> DeclareMaps<'r> {
    /// Create a sink that registers into `registry` on behalf of `profile`
    pub fn new(registry: &'r RelationRegistry, profile: &'static str) -> Self {
        Self {
            registry,
            profile,
            declared: 0,
        }
    }

    /// Declare a one-directional relation for `S -> T`.
    ///
    /// With `use_default_mapper` the default mapping pass runs first and
    /// `forward` refines its result.
    pub fn map<S, T, F>(&mut self, forward: F, use_default_mapper: bool) -> &mut Self
    where
        S: Any,
        T: Any,
        F: Fn(&Mapper, &S, &mut T) -> Result<()> + Send + Sync + 'static,
    {
        self.register(MappingRelation::new(forward, use_default_mapper))
    }

    /// Declare `S -> T` with `forward` and `T -> S` with `reverse`.
    ///
    /// Neither direction runs the default mapping pass.
    pub fn map_bidirectional<S, T, F, R>(&mut self, forward: F, reverse: R) -> &mut Self
    where
        S: Any,
        T: Any,
        F: Fn(&Mapper, &S, &mut T) -> Result<()> + Send + Sync + 'static,
        R: Fn(&Mapper, &T, &mut S) -> Result<()> + Send + Sync + 'static,
    {
        self.register(MappingRelation::new(forward, false));
        self.register(MappingRelation::new(reverse, false))
    }

    fn register(&mut self, relation: MappingRelation) -> &mut Self {
        debug!("Profile {} declares {}", self.profile, relation.pair());
        self.registry.register(relation);
        self.declared += 1;
        self
    }

    /// Number of relations declared so far
    pub fn declared(&self) -> usize {
        self.declared
    }
}

/// Build a default `P` and register its relations; returns how many were declared
pub fn install<P: Profile>(registry: &RelationRegistry) -> usize {
    let profile = P::default();
    let mut maps = DeclareMaps::new(registry, type_name::<P>());
    profile.declare(&mut maps);
    maps.declared()
}
