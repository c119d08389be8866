//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{PackfuseError, Result};
use globset::Glob;
use std::path::Path;

/// Config file looked up in the current directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "packfuse.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PackfuseError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PackfuseError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a CLI invocation.
    ///
    /// An explicit path must load. Without one, `packfuse.yaml` in the current
    /// directory is used when present, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct; treat it as all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                PackfuseError::ConfigError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PackfuseError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - similarity thresholds lie in `[0, 1]` and strong >= regular
    /// - `conflict_threshold` lies in `[0, 1]`
    /// - `1 <= min_group_size <= max_group_size`
    /// - `critical_error_threshold` and `throughput_bytes_per_sec` are positive
    /// - every ignore pattern is a valid glob
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("strong_similarity_threshold", self.strong_similarity_threshold),
            ("conflict_threshold", self.conflict_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PackfuseError::ConfigError(format!(
                    "{} must be between 0 and 1 (found {})",
                    name, value
                )));
            }
        }

        if self.strong_similarity_threshold < self.similarity_threshold {
            return Err(PackfuseError::ConfigError(format!(
                "strong_similarity_threshold ({}) must not be lower than similarity_threshold ({})",
                self.strong_similarity_threshold, self.similarity_threshold
            )));
        }

        if self.min_group_size == 0 {
            return Err(PackfuseError::ConfigError(
                "min_group_size must be greater than 0".to_string(),
            ));
        }

        if self.min_group_size > self.max_group_size {
            return Err(PackfuseError::ConfigError(format!(
                "min_group_size ({}) must not exceed max_group_size ({})",
                self.min_group_size, self.max_group_size
            )));
        }

        if self.critical_error_threshold == 0 {
            return Err(PackfuseError::ConfigError(
                "critical_error_threshold must be greater than 0".to_string(),
            ));
        }

        if self.throughput_bytes_per_sec == 0 {
            return Err(PackfuseError::ConfigError(
                "throughput_bytes_per_sec must be greater than 0".to_string(),
            ));
        }

        for pattern in &self.ignore_patterns {
            Glob::new(pattern).map_err(|e| {
                PackfuseError::ConfigError(format!(
                    "invalid glob in ignore_patterns: '{}' - {}",
                    pattern, e
                ))
            })?;
        }

        Ok(())
    }
}
