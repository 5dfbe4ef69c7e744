//! Keyed agent snapshot store.
//!
//! A single JSON document mapping address to agent record, rewritten whole
//! on every save. This is deliberately not a log: agent attributes are
//! administrative state, and last-write-wins is acceptable for them in a
//! way it never would be for economic facts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use commons_types::{Agent, AgentAddress};

use crate::error::StoreError;

/// The mutable keyed store of agent records.
#[derive(Debug)]
pub struct AgentRegistry {
    /// Path of the JSON snapshot file.
    path: PathBuf,
    /// Critical section for the save path.
    save_lock: Mutex<()>,
}

impl AgentRegistry {
    /// Create a handle for the registry file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_lock: Mutex::new(()),
        }
    }

    /// Path of the underlying snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every agent record, keyed by address.
    ///
    /// A missing file reads as an empty registry (the bootstrap case).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the document exists but does
    /// not parse, or [`StoreError::Io`] if it cannot be read.
    pub fn load_all(&self) -> Result<BTreeMap<AgentAddress, Agent>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrite the durable store with the given mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write fails.
    pub fn save_all(&self, agents: &BTreeMap<AgentAddress, Agent>) -> Result<(), StoreError> {
        let document = serde_json::to_string_pretty(agents)?;

        let _guard = self
            .save_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("agent registry save lock"))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, document)?;

        debug!(count = agents.len(), "agent registry saved");
        Ok(())
    }
}
