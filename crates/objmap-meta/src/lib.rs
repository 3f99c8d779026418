#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # objmap-meta
//!
//! Type metadata for the object mapping engine.
//!
//! Rust has no runtime reflection, so every type that takes part in mapping
//! implements [`Mappable`] and declares its fields through a [`Fields`]
//! builder. The engine works on the erased [`Reflect`] view and the
//! per-type [`Shape`] built from those declarations.

/// Type identity keys used to index relations.
pub mod types;
/// Mappable/Reflect traits and built-in simple types.
pub mod reflect;
/// Field descriptors and the per-type field table.
pub mod shape;

/// Type identity and ordered type pairs.
pub use types::{TypeKey, TypePair};
/// Core traits implemented by mapped types.
pub use reflect::{Kind, Mappable, Reflect, Simple};
/// Field declaration and lookup.
pub use shape::{FieldInfo, Fields, Layout, Shape};
