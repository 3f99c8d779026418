//! Mappable and Reflect traits
//!
//! [`Mappable`] is the typed trait a user implements; [`Reflect`] is the
//! object-safe view the engine dispatches on. Every `Mappable` is `Reflect`
//! through a blanket impl.

use crate::shape::{Fields, Shape};
use crate::types::TypeKey;
use std::any::Any;

/// How the default mapping pass treats a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Copied by value assignment (numbers, text, dates, ids, enums)
    Simple,

    /// Copied field by field
    Complex,
}

/// A type that can take part in mapping.
///
/// Complex types list their fields in [`Mappable::describe`]. Simple types
/// are declared with [`simple_type!`](crate::simple_type) instead of by hand.
pub trait Mappable: Any + Send + Sync + Sized {
    /// Mapping kind of this type
    const KIND: Kind = Kind::Complex;

    /// Declare the fields the default mapping pass may read and write.
    fn describe(fields: &mut Fields<Self>) {
        let _ = fields;
    }

    /// Overwrite `self` with `source`. Only called for [`Kind::Simple`] types.
    fn assign(&mut self, source: &Self) {
        let _ = source;
    }
}

/// Marker for value-copied types. Requires `Clone` for assignment and
/// `Default` so the engine can allocate a slot before converting into it.
pub trait Simple: Mappable + Clone + Default {}

/// Type-erased view of a [`Mappable`] value.
pub trait Reflect: Any + Send + Sync + 'static {
    /// Runtime type of the value
    fn type_key(&self) -> TypeKey;

    /// Mapping kind of the runtime type
    fn kind(&self) -> Kind;

    /// Builds the field table of the runtime type
    fn shape_builder(&self) -> fn() -> Shape;

    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow mutably as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert a boxed value into a boxed `Any`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Assign from `source` when both are the same simple type.
    ///
    /// Returns `false` and leaves `self` untouched otherwise.
    fn assign_from(&mut self, source: &dyn Reflect) -> bool;
}

impl<T: Mappable> Reflect for T {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn kind(&self) -> Kind {
        T::KIND
    }

    fn shape_builder(&self) -> fn() -> Shape {
        Shape::of::<T>
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn assign_from(&mut self, source: &dyn Reflect) -> bool {
        if T::KIND != Kind::Simple {
            return false;
        }
        match source.as_any().downcast_ref::<T>() {
            Some(value) => {
                self.assign(value);
                true
            }
            None => false,
        }
    }
}

/// Declare one or more types as simple (value-copied).
///
/// The types must be `Clone + Default + Send + Sync + 'static`. Fieldless
/// enums are the usual candidates:
///
/// ```
/// use objmap_meta::{simple_type, Kind, Mappable};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq)]
/// enum Status {
///     #[default]
///     Draft,
///     Sent,
/// }
///
/// simple_type!(Status);
///
/// assert_eq!(<Status as Mappable>::KIND, Kind::Simple);
/// ```
#[macro_export]
macro_rules! simple_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Mappable for $ty {
                const KIND: $crate::Kind = $crate::Kind::Simple;

                fn assign(&mut self, source: &Self) {
                    ::core::clone::Clone::clone_from(self, source);
                }
            }

            impl $crate::Simple for $ty {}
        )+
    };
}

simple_type!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

simple_type!(
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
);

impl<T: Simple> Mappable for Option<T> {
    const KIND: Kind = Kind::Simple;

    fn assign(&mut self, source: &Self) {
        self.clone_from(source);
    }
}

impl<T: Simple> Simple for Option<T> {}
