//! Capital account projection for the Commons cooperative ledger.
//!
//! Balances are never stored as mutable state. This crate provides the one
//! deterministic fold that turns the append-only event sequence, joined
//! with the agent registry snapshot, into per-agent capital accounts:
//!
//! ```text
//! project(events, agents) -> accounts by agent
//! ```
//!
//! # Guarantees
//!
//! - **Pure**: nothing outside the two arguments is consulted; folding the
//!   same input twice yields bit-identical output.
//! - **Total**: well-formed input never raises. Unknown agent references
//!   are skipped (and counted for diagnostics); unrecognized event kinds
//!   are ignored for forward compatibility.
//! - **Exact**: every quantity is a [`rust_decimal::Decimal`]; a decade of
//!   fractional-cent contributions sums without drift.
//!
//! # Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use commons_accounts::project;
//!
//! let projection = project(&[], &BTreeMap::new());
//! assert!(projection.accounts.is_empty());
//! assert_eq!(projection.unknown_agent_skips, 0);
//! ```

pub mod projector;

// Re-export the primary entry points at crate root.
pub use projector::{project, Projection};
