//! Store configuration, loadable from YAML

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where a deselected filterable chip goes back into the filtered and
/// original partitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReinsertPolicy {
    /// Append at the end; order is only enforced by `load`
    #[default]
    Append,
    /// Insert at the chip's natural-order position
    Sorted,
}

/// Configuration for a [`ChipStore`](crate::ChipStore)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Placement of chips returned from the selected partition
    pub reinsert: ReinsertPolicy,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reinsert(mut self, reinsert: ReinsertPolicy) -> Self {
        self.reinsert = reinsert;
        self
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}
