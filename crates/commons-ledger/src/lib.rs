//! Durable stores for the Commons cooperative ledger.
//!
//! Two artifacts live under one data directory:
//!
//! ```text
//! Ledger (explicit store handle)
//!     |
//!     +-- EventLog       events.jsonl  (append-only, one event per line)
//!     |
//!     +-- AgentRegistry  agents.json   (keyed snapshot, full overwrite)
//! ```
//!
//! The event log is the system of record for all value movement: records
//! are appended under a critical section, never rewritten, and scanned in
//! append order. The agent registry is administrative metadata with
//! last-write-wins semantics -- losing an intermediate registry write loses
//! no financial history.
//!
//! # Modules
//!
//! - [`event_log`] -- Append-only JSON-lines event store and filtered reads
//! - [`registry`] -- Keyed agent snapshot store
//! - [`store`] -- The [`Ledger`] handle owning both, plus [`StoreConfig`]
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_log;
pub mod registry;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use event_log::{EventIter, EventLog};
pub use registry::AgentRegistry;
pub use store::{Ledger, StoreConfig};
