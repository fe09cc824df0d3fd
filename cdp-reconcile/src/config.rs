//! Reconciliation settings, read from the `[reconcile]` table of a TOML file.

use cdp_document::MergeOptions;
use cdp_schema::ProjectionOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Errors from parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid reconcile config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Merge flags used by projection and reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Deduplicate lists when deep-merging profile groups.
    pub unique_lists: bool,
    /// Collapse one-element lists to scalars when deep-merging.
    pub disallow_single_value_list: bool,
    /// Deduplicate segments when merging them with the cached ones.
    pub unique_segments: bool,
    /// Skip appending values a profile list already holds.
    pub unique_append: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            unique_lists: true,
            disallow_single_value_list: false,
            unique_segments: true,
            unique_append: false,
        }
    }
}

impl ReconcileConfig {
    #[must_use]
    pub const fn merge_options(&self) -> MergeOptions {
        MergeOptions::new(self.unique_lists, self.disallow_single_value_list)
    }

    #[must_use]
    pub const fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            unique_append: self.unique_append,
        }
    }

    /// Parses the `[reconcile]` table of a TOML document. A missing table
    /// or missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.reconcile)
    }

    /// Loads settings from `path`, falling back to defaults with a warning
    /// if the file is missing or cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No reconcile config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded reconcile config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse reconcile config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read reconcile config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reconcile: ReconcileConfig,
}
