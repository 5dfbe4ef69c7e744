//! Error type for the operator CLI.

use std::path::PathBuf;

use commons_ledger::StoreError;

use crate::config::ConfigError;

/// Errors surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A durable store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `init` was pointed at a store that already has history.
    #[error("event log already exists at {path}; refusing to re-initialize")]
    AlreadyInitialized {
        /// Path of the existing event log.
        path: PathBuf,
    },

    /// Rendering output as JSON failed.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
