use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::order::{CaseSensitivity, PathOrder};

/// Configuration for a change index.
///
/// ```toml
/// case_sensitivity = "insensitive"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// How path segments are compared. Defaults to the host convention.
    pub case_sensitivity: CaseSensitivity,
}

impl IndexConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> IndexResult<Self> {
        toml::from_str(text).map_err(|e| IndexError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> IndexResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The path ordering this configuration selects.
    pub fn order(&self) -> PathOrder {
        PathOrder::new(self.case_sensitivity)
    }
}
