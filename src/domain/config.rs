//! Engine configuration loaded from TOML.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::policy::UndefinedPolicy;
use super::settings::{Settings, engine_defaults};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Template rendering behavior.
    #[serde(default)]
    pub render: RenderSettings,
    /// Lowest settings layer handed to the executor.
    #[serde(default = "engine_defaults")]
    pub execution: Settings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { render: RenderSettings::default(), execution: engine_defaults() }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::from_toml_str(&source)
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub undefined: UndefinedPolicy,
    /// Drop the first newline after a block tag.
    #[serde(default = "default_true")]
    pub trim_blocks: bool,
    /// Strip leading whitespace before a block tag.
    #[serde(default = "default_true")]
    pub lstrip_blocks: bool,
    #[serde(default)]
    pub keep_trailing_newline: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            undefined: UndefinedPolicy::default(),
            trim_blocks: default_true(),
            lstrip_blocks: default_true(),
            keep_trailing_newline: false,
        }
    }
}

fn default_true() -> bool {
    true
}
