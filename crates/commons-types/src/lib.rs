//! Shared type definitions for the Commons cooperative ledger.
//!
//! This crate is the single source of truth for all types used across the
//! Commons workspace: the event sum type persisted in the append-only log,
//! the agent record held by the registry, and the derived capital account
//! produced by projection.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier types (event ids, agent addresses)
//! - [`enums`] -- Closed enumerations (roles, tiers, categories, cycles)
//! - [`event`] -- The event sum type and its draft form
//! - [`agent`] -- Agent registry records
//! - [`account`] -- Derived capital account snapshots

pub mod account;
pub mod agent;
pub mod enums;
pub mod event;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use account::{AllocationTotals, CapitalAccount, ContributionTotals, DistributionTotals};
pub use agent::{Agent, PaymentStream};
pub use enums::{
    AllocationCycle, AllocationTarget, ContributionCategory, ContributionCycle, EventType, Role,
    Tier,
};
pub use event::{AllocationEntry, Event, EventBody, EventDraft, EvidenceRef};
pub use ids::{AgentAddress, EventId};
