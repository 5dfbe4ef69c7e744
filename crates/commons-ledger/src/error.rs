//! Error types for the durable stores.
//!
//! Missing files are not errors anywhere in this crate -- a store that was
//! never initialized reads as empty (the bootstrap case). Everything that
//! *is* an error here is either rejected before a write (validation) or
//! fatal for the read that hit it (corruption): the log is a financial
//! system of record, so nothing is silently skipped or defaulted.

use commons_types::AgentAddress;

/// Errors that can occur in the durable stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An underlying filesystem operation failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied event failed per-variant validation. Nothing was
    /// written.
    #[error("invalid event: {reason}")]
    Validation {
        /// Why the event was rejected.
        reason: String,
    },

    /// A record in the event log failed to parse during a scan. Fatal for
    /// that scan; the line number is reported for operator remediation.
    #[error("corrupt event record at line {line}: {source}")]
    Corrupt {
        /// 1-based line number of the bad record.
        line: usize,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// Serializing a record for write, or parsing the agent registry
    /// document, failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An agent referenced by an administrative operation is not in the
    /// registry.
    #[error("unknown agent: {address}")]
    UnknownAgent {
        /// The address that was not found.
        address: AgentAddress,
    },

    /// A store mutex was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),
}
