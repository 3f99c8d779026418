//! Mapping relations
//!
//! A relation is the registered behavior for one concrete (source, target)
//! type pair: a callback plus a flag saying whether the default mapping pass
//! runs before it.

use crate::mapper::Mapper;
use crate::{Error, Result};
use objmap_meta::{TypeKey, TypePair};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased mapping callback.
///
/// Implementations downcast the arguments back to the concrete types they
/// were registered for.
pub trait Apply: Send + Sync {
    /// Run the callback on erased source and target values
    fn apply(&self, mapper: &Mapper, source: &dyn Any, target: &mut dyn Any) -> Result<()>;
}

/// Strongly typed callback behind an [`Apply`]
struct TypedApply<S, T, F> {
    callback: F,
    _types: PhantomData<fn(&S, &mut T)>,
}

impl<S, T, F> Apply for TypedApply<S, T, F>
where
    S: Any,
    T: Any,
    F: Fn(&Mapper, &S, &mut T) -> Result<()> + Send + Sync,
{
    fn apply(&self, mapper: &Mapper, source: &dyn Any, target: &mut dyn Any) -> Result<()> {
        let pair = TypePair::of::<S, T>();
        let source = source
            .downcast_ref::<S>()
            .ok_or_else(|| Error::RelationMismatch {
                pair: pair.to_string(),
                side: "source",
            })?;
        let target = target
            .downcast_mut::<T>()
            .ok_or_else(|| Error::RelationMismatch {
                pair: pair.to_string(),
                side: "target",
            })?;
        (self.callback)(mapper, source, target)
    }
}

/// Registered mapping behavior for one type pair
#[derive(Clone)]
pub struct MappingRelation {
    pair: TypePair,
    callback: Arc<dyn Apply>,
    use_default_mapper: bool,
}

impl MappingRelation {
    /// Create a relation for `S -> T` from a typed callback
    pub fn new<S, T, F>(callback: F, use_default_mapper: bool) -> Self
    where
        S: Any,
        T: Any,
        F: Fn(&Mapper, &S, &mut T) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            pair: TypePair::of::<S, T>(),
            callback: Arc::new(TypedApply {
                callback,
                _types: PhantomData,
            }),
            use_default_mapper,
        }
    }

    /// Create a relation from an already erased callback
    pub fn from_apply(pair: TypePair, callback: Arc<dyn Apply>, use_default_mapper: bool) -> Self {
        Self {
            pair,
            callback,
            use_default_mapper,
        }
    }

    /// Registry key of this relation
    pub fn pair(&self) -> TypePair {
        self.pair
    }

    /// Source type
    pub fn source_type(&self) -> TypeKey {
        self.pair.source
    }

    /// Target type
    pub fn target_type(&self) -> TypeKey {
        self.pair.target
    }

    /// Whether the default mapping pass runs before the callback
    pub fn use_default_mapper(&self) -> bool {
        self.use_default_mapper
    }

    /// Invoke the callback
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelationMismatch`] when an argument is not of the
    /// registered type, or whatever error the callback itself returns.
    pub fn apply(&self, mapper: &Mapper, source: &dyn Any, target: &mut dyn Any) -> Result<()> {
        self.callback.apply(mapper, source, target)
    }
}

impl fmt::Debug for MappingRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRelation")
            .field("source", &self.pair.source.name())
            .field("target", &self.pair.target.name())
            .field("use_default_mapper", &self.use_default_mapper)
            .finish()
    }
}
