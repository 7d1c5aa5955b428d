//! Configuration schema (relcheck.toml)

use serde::{Deserialize, Serialize};
use crate::conformance::ConformanceClass;

/// What a "not in use" conformance class means for the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotApplicablePolicy {
    /// Report the class as skipped
    #[default]
    Skip,

    /// Report the class as failed
    Fail,
}

fn default_classes() -> Vec<ConformanceClass> {
    ConformanceClass::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Conformance classes to evaluate, in order
    #[serde(default = "default_classes")]
    pub classes: Vec<ConformanceClass>,

    /// Handling of classes the container does not use
    #[serde(default)]
    pub not_applicable: NotApplicablePolicy,

    /// Run the per-row geometry encoding check on related feature tables
    #[serde(default = "default_true")]
    pub check_geometry_values: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classes: default_classes(),
            not_applicable: NotApplicablePolicy::default(),
            check_geometry_values: true,
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if config.classes.is_empty() {
            return Err(ConfigError::ParseError("`classes` must name at least one conformance class".to_string()));
        }

        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
