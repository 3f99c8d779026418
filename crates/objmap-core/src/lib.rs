//! # objmap-core
//!
//! Relation registry, profiles, and the convention-based mapping runtime.
//!
//! A [`MapperConfig`] owns a [`RelationRegistry`] that profiles fill with
//! [`MappingRelation`]s. A [`Mapper`] resolves the exact runtime type pair
//! of each call against that registry and falls back to a field-by-field
//! copy by name when no relation is registered.
//!
//! ```
//! use objmap_core::{Fields, Mappable, MapperConfig};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct UserDto {
//!     name: String,
//! }
//!
//! impl Mappable for User {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.value("name", |u| &u.name, |u| &mut u.name);
//!     }
//! }
//!
//! impl Mappable for UserDto {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.value("name", |u| &u.name, |u| &mut u.name);
//!     }
//! }
//!
//! let mapper = MapperConfig::new().mapper();
//! let dto: UserDto = mapper.map(&User { name: "Ada".into() }).unwrap();
//! assert_eq!(dto.name, "Ada");
//! ```

pub mod catalog;
pub mod config;
mod convention;
pub mod mapper;
pub mod profile;
pub mod registry;
pub mod relation;
pub mod services;
pub mod settings;
pub mod shapes;

pub use catalog::{ProfileCatalog, ProfileEntry};
pub use config::MapperConfig;
pub use mapper::Mapper;
pub use profile::{DeclareMaps, Profile};
pub use registry::RelationRegistry;
pub use relation::{Apply, MappingRelation};
pub use services::{ServiceProvider, ServiceRegistry};
pub use settings::MapperSettings;
pub use shapes::ShapeCache;

pub use objmap_meta::{
    simple_type, FieldInfo, Fields, Kind, Layout, Mappable, Reflect, Shape, Simple, TypeKey,
    TypePair,
};

use thiserror::Error;

/// Errors that can occur while configuring or running mappings
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: '{type_name}' is not a mapping profile")]
    Configuration { type_name: String },

    #[error("Invalid argument: {0} must not be null")]
    InvalidArgument(&'static str),

    #[error("Relation {pair} invoked with a mismatched {side} value")]
    RelationMismatch { pair: String, side: &'static str },

    #[error("Mapping depth limit of {limit} exceeded at {pair}")]
    DepthExceeded { limit: usize, pair: String },

    #[error("Settings error: {message}")]
    Settings {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mapping callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Build a configuration error naming the offending type
    pub fn configuration(type_name: impl Into<String>) -> Self {
        Self::Configuration {
            type_name: type_name.into(),
        }
    }

    /// Wrap a failure raised inside a user mapping callback
    pub fn callback(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Callback(err.into())
    }

    /// Build a settings error without position information
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
