//! casegen configuration
//!
//! Handles loading of the optional `.casegen.yaml` file. Command-line
//! flags override anything set here.
//!
//! ```yaml
//! version: 1
//! body_media_types:
//!   - application/json
//!   - application/merge-patch+json
//! output: json
//! fail_under: 80
//! ```

use crate::contract::ExtractOptions;
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".casegen.yaml";

/// Project configuration (`.casegen.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "casegen config", description = "Optional .casegen.yaml settings")]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Request body media types expanded into parameters, first match wins
    #[serde(default = "default_body_media_types")]
    pub body_media_types: Vec<String>,

    /// Report output format
    #[serde(default)]
    pub output: OutputFormat,

    /// Minimum coverage percentage for `validate` to succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_under: Option<f64>,
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_version() -> u32 {
    1
}

fn default_body_media_types() -> Vec<String> {
    vec!["application/json".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            body_media_types: default_body_media_types(),
            output: OutputFormat::default(),
            fail_under: None,
        }
    }
}

impl Config {
    /// Parse and validate YAML config text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        Self::from_yaml(&content)
    }

    /// Load `.casegen.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(None);
        }
        Self::load(&file).map(Some)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported {} version: {}",
                CONFIG_FILE, self.version
            )));
        }
        if self.body_media_types.is_empty() {
            return Err(Error::Config(
                "body_media_types must list at least one media type".to_string(),
            ));
        }
        if let Some(threshold) = self.fail_under {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(Error::Config(format!(
                    "fail_under must be between 0 and 100, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            body_media_types: self.body_media_types.clone(),
        }
    }
}
