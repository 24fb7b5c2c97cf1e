//! # Configuration
//!
//! Configuration is resolved in two stages. The optional YAML override file is
//! read as an untyped tree and deep-merged over the defaults (see [`merge`]),
//! then the merged tree is deserialized into the typed [`Config`].

pub mod loader;
pub mod merge;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{
    error::{ConfigError, Result},
    styles::Styles,
};

pub use loader::{load_config, read_override};
pub use merge::deep_merge;

/// Default location of the configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Main configuration for Canvas-Framer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Source image file, or a directory of images
    pub input: PathBuf,

    /// Destination file (file input) or directory (directory input)
    pub output: PathBuf,

    /// Frame and image layout applied to every output
    pub styles: Styles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input"),
            output: PathBuf::from("output"),
            styles: Styles::default(),
        }
    }
}

impl Config {
    /// Build the typed configuration from a merged tree
    pub fn from_value(value: Value) -> Result<Self> {
        serde_yaml::from_value(value).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// The untyped tree form, used as the merge base for overrides
    pub fn to_value(&self) -> Result<Value> {
        serde_yaml::to_value(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.styles.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::Color;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_tree_has_every_key() {
        let value = Config::default().to_value().unwrap();

        assert_eq!(value["input"], Value::from("input"));
        assert_eq!(value["output"], Value::from("output"));
        for key in ["width", "height", "background"] {
            assert!(!value["styles"]["frame"][key].is_null(), "missing frame.{}", key);
        }
        for key in ["width", "top", "left"] {
            assert!(!value["styles"]["image"][key].is_null(), "missing image.{}", key);
        }
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut original_config = Config::default();
        original_config.styles.frame.background = Color::rgba(10, 20, 30, 40);
        original_config.styles.image.left = -12;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = load_config(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_from_value_reports_bad_types() {
        let mut value = Config::default().to_value().unwrap();
        value["styles"]["frame"]["width"] = Value::from("wide");

        let err = Config::from_value(value).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration value"));
    }
}
