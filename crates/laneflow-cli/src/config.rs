//! Configuration loading for the Laneflow CLI.
//!
//! The configuration file is TOML with a single `[layout]` section mapping
//! onto [`LaneConfig`]. Every field is optional; omitted fields keep the
//! built-in lane geometry.

use std::fs;

use log::debug;
use serde::Deserialize;

use laneflow_core::lane::LaneConfig;

use crate::error::CliError;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Lane geometry section.
    #[serde(default)]
    layout: LaneConfig,
}

impl AppConfig {
    /// Returns the lane geometry to run the transformer with.
    pub fn lane_config(&self) -> LaneConfig {
        self.layout
    }
}

/// Loads configuration from the given path, or the defaults when no path
/// was passed.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be read and
/// [`CliError::Config`] when it is not valid TOML.
pub fn load_config(path: Option<&String>) -> Result<AppConfig, CliError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let config: AppConfig = toml::from_str(&text)?;
            debug!(config_path = path.as_str(); "Configuration loaded");
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}
