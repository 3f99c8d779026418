//! Mapper settings
//!
//! YAML settings naming the catalog profiles to load and the nesting limit.
//!
//! ```yaml
//! profiles:
//!   - CustomerProfile
//!   - OrderProfile
//! max_depth: 32
//! ```

use crate::mapper::DEFAULT_MAX_DEPTH;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for building a [`MapperConfig`](crate::MapperConfig)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Profile names to load, looked up in a catalog by full or short name
    #[serde(default)]
    pub profiles: Vec<String>,

    /// Nesting limit for a single mapping call
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MapperSettings {
    /// Parse settings from a YAML string
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] if the YAML is malformed or `max_depth`
    /// is zero.
    pub fn parse(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml).map_err(|e| Error::Settings {
            message: format!("Failed to parse settings: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`MapperSettings::parse`].
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize settings back to YAML
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::settings(format!("Failed to serialize: {e}")))
    }

    fn validate(&self) -> Result<()> {
        check_max_depth(self.max_depth)
    }
}

/// Reject a nesting limit under which no mapping call can run
pub(crate) fn check_max_depth(max_depth: usize) -> Result<()> {
    if max_depth == 0 {
        return Err(Error::settings("max_depth must be at least 1"));
    }
    Ok(())
}
