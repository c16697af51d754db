//! YAML configuration for the `delfor` binary

use delfor_model::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Settings shared by all commands.
///
/// ```yaml
/// default_dialect: minebea
/// delimiter: ","
/// fallback_locations:
///   cummins: "Cummins Inc., Plant 2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Dialect used when a command gets no `--dialect`
    pub default_dialect: Dialect,
    /// Export field delimiter
    pub delimiter: char,
    /// Per-dialect delivery location for schedules without one
    pub fallback_locations: BTreeMap<Dialect, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_dialect: Dialect::Cummins,
            delimiter: ';',
            fallback_locations: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load and validate a YAML config file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() || self.delimiter.is_ascii_alphanumeric() {
            return Err(format!(
                "delimiter '{}' must be an ASCII punctuation or whitespace character",
                self.delimiter
            ));
        }
        Ok(())
    }

    /// Configured fallback location, or the partner's historical one
    pub fn fallback_location(&self, dialect: Dialect) -> &str {
        self.fallback_locations
            .get(&dialect)
            .map_or(delfor_export::default_fallback_location(dialect), String::as_str)
    }
}
