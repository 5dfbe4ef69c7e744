//! Configuration loading and typed config structures for the CLI.
//!
//! The canonical configuration lives in `commons.yaml` next to wherever the
//! operator runs the tool. Every field has a default, so a missing file is
//! a valid (default) deployment.

use std::path::{Path, PathBuf};

use commons_ledger::StoreConfig;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Durable store layout.
    #[serde(default)]
    pub store: StoreSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl LedgerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `COMMONS_DATA_DIR` environment variable overrides
    /// `store.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.store.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.store.apply_env_overrides();
        Ok(config)
    }
}

/// Durable store layout section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSection {
    /// Directory holding both durable artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the append-only event log.
    #[serde(default = "default_events_file")]
    pub events_file: String,
    /// File name of the agent registry snapshot.
    #[serde(default = "default_agents_file")]
    pub agents_file: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            events_file: default_events_file(),
            agents_file: default_agents_file(),
        }
    }
}

impl StoreSection {
    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("COMMONS_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
    }

    /// Convert into the store layout the ledger crate expects.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            data_dir: self.data_dir.clone(),
            events_file: self.events_file.clone(),
            agents_file: self.agents_file.clone(),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default tracing filter when `RUST_LOG` is unset (e.g. `"info"`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_events_file() -> String {
    "events.jsonl".to_owned()
}

fn default_agents_file() -> String {
    "agents.json".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
