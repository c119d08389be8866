//! Function names per content type, used to place standard files.
//!
//! The taxonomy file is YAML or JSON:
//!
//! ```yaml
//! formats:
//!   KICK: [Acoustic, Electronic, "808"]
//!   BASS: [Sub, Reese, Growl]
//! ```

use crate::error::{PackfuseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Content type -> known function names.
    #[serde(default)]
    pub formats: BTreeMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Load a taxonomy file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PackfuseError::ConfigError(format!(
                "failed to read taxonomy '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(|e| {
                PackfuseError::ConfigError(format!(
                    "failed to parse taxonomy '{}': {}",
                    path.display(),
                    e
                ))
            })
        } else if content.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                PackfuseError::ConfigError(format!(
                    "failed to parse taxonomy '{}': {}",
                    path.display(),
                    e
                ))
            })
        }
    }

    /// Load the configured taxonomy, falling back to an empty one.
    ///
    /// A missing or unreadable file is not fatal: every file then gets the
    /// `Misc` function.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(taxonomy) => taxonomy,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Using empty taxonomy");
                Self::default()
            }
        }
    }

    /// Function names for a content type, matched case-insensitively.
    pub fn functions_for(&self, type_name: &str) -> &[String] {
        if let Some(functions) = self.formats.get(type_name) {
            return functions;
        }
        self.formats
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
            .map(|(_, functions)| functions.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
