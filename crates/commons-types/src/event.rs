//! The event sum type persisted in the append-only log.
//!
//! Events are the sole source of truth for all value movement in the
//! cooperative. Once appended they are never edited or removed; every
//! capital account balance is reconstructed by folding the event sequence.
//!
//! Each record on the wire is self-describing via its `type` tag. An
//! unrecognized tag deserializes to [`EventBody::Unknown`] so that a log
//! written by a newer deployment can still be scanned and projected by an
//! older one (the fold ignores what it does not recognize).

use std::collections::BTreeMap;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{
    AllocationCycle, AllocationTarget, ContributionCategory, ContributionCycle, EventType,
};
use crate::ids::{AgentAddress, EventId};

// ---------------------------------------------------------------------------
// Supporting payload types
// ---------------------------------------------------------------------------

/// A pointer to evidence backing a contribution (a commit, an invoice, a
/// photo -- the ledger does not interpret it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// What kind of evidence this is (e.g. `"url"`, `"ipfs"`).
    pub kind: String,
    /// The opaque pointer to the evidence.
    pub reference: String,
}

/// One per-agent line of an allocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// The agent being credited.
    pub agent_id: AgentAddress,
    /// Amount credited (uses [`Decimal`] for financial-grade precision).
    pub amount: Decimal,
    /// Unit of account the amount is denominated in.
    pub unit: String,
    /// How the amount decomposes across contribution categories.
    #[serde(default)]
    pub breakdown: BTreeMap<ContributionCategory, Decimal>,
}

// ---------------------------------------------------------------------------
// Event body
// ---------------------------------------------------------------------------

/// The typed payload of one economic fact.
///
/// A closed sum over the recognized event kinds. The projector matches this
/// exhaustively, so adding a variant is a compile-time-visible change at
/// every fold site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventBody {
    /// A member performed work or brought in revenue.
    Contribution {
        /// The contributing agent.
        agent_id: AgentAddress,
        /// Which sub-daily accounting window the contribution falls in.
        cycle: ContributionCycle,
        /// The contribution category.
        category: ContributionCategory,
        /// Recorded value (uses [`Decimal`]; never floating point).
        value: Decimal,
        /// Unit of account the value is expressed in.
        unit: String,
        /// Free-text description of the work.
        description: String,
        /// Optional evidence backing the contribution.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        evidence: Option<EvidenceRef>,
    },

    /// The organization allocated surplus across members.
    Allocation {
        /// Which reconciliation pass produced this allocation.
        cycle: AllocationCycle,
        /// ISO-8601 date of the cycle being reconciled.
        cycle_date: String,
        /// Whether entries credit individuals or the shared pool.
        #[serde(default)]
        target: AllocationTarget,
        /// Per-agent allocation lines, in computed order.
        entries: Vec<AllocationEntry>,
        /// Total contributions the allocation was computed against.
        total_contributions: Decimal,
        /// The category weight vector used by the computation.
        #[serde(default)]
        weights: BTreeMap<ContributionCategory, Decimal>,
    },

    /// A member withdrew from their accrued balance.
    Distribution {
        /// The withdrawing agent.
        agent_id: AgentAddress,
        /// Amount withdrawn.
        amount: Decimal,
        /// Unit of account being debited.
        unit: String,
        /// Optional reference to an external settlement.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settlement_ref: Option<String>,
    },

    /// An agent was enrolled (audit record; registry state is canonical).
    Enrollment {
        /// The enrolled agent.
        agent_id: AgentAddress,
    },

    /// An agent was disenrolled (audit record; registry state is canonical).
    Disenrollment {
        /// The disenrolled agent.
        agent_id: AgentAddress,
    },

    /// Forward-compatibility catch-all for event kinds this build does not
    /// recognize. Never written by this implementation; ignored by the fold.
    #[serde(other)]
    Unknown,
}

impl EventBody {
    /// Return the event type, or `None` for [`EventBody::Unknown`].
    pub const fn event_type(&self) -> Option<EventType> {
        match self {
            Self::Contribution { .. } => Some(EventType::Contribution),
            Self::Allocation { .. } => Some(EventType::Allocation),
            Self::Distribution { .. } => Some(EventType::Distribution),
            Self::Enrollment { .. } => Some(EventType::Enrollment),
            Self::Disenrollment { .. } => Some(EventType::Disenrollment),
            Self::Unknown => None,
        }
    }

    /// Return the primary agent this event is about, if it has one.
    ///
    /// Allocations have no single primary agent; they name agents per entry.
    pub const fn primary_agent(&self) -> Option<&AgentAddress> {
        match self {
            Self::Contribution { agent_id, .. }
            | Self::Distribution { agent_id, .. }
            | Self::Enrollment { agent_id }
            | Self::Disenrollment { agent_id } => Some(agent_id),
            Self::Allocation { .. } | Self::Unknown => None,
        }
    }

    /// Return whether this event references the given agent, either as its
    /// primary agent or through an allocation entry.
    pub fn touches_agent(&self, address: &AgentAddress) -> bool {
        if self.primary_agent() == Some(address) {
            return true;
        }
        match self {
            Self::Allocation { entries, .. } => {
                entries.iter().any(|entry| &entry.agent_id == address)
            }
            Self::Contribution { .. }
            | Self::Distribution { .. }
            | Self::Enrollment { .. }
            | Self::Disenrollment { .. }
            | Self::Unknown => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Stored event and draft
// ---------------------------------------------------------------------------

/// An immutable event as stored in the append-only log.
///
/// The shared envelope (id, timestamp) is assigned by the log at append
/// time when the caller does not supply it; see [`EventDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Globally unique event identifier.
    pub id: EventId,
    /// Unix timestamp (seconds) when the event occurred.
    pub timestamp: i64,
    /// The typed payload, tagged by `type` on the wire.
    #[serde(flatten)]
    pub body: EventBody,
}

impl Event {
    /// Render the event timestamp as an RFC 3339 UTC string.
    ///
    /// Returns `None` if the timestamp is outside the representable range.
    pub fn iso_timestamp(&self) -> Option<String> {
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.to_rfc3339())
    }
}

/// An event submitted for appending, before the log fills in the envelope.
///
/// Callers that already hold an id or timestamp (a replayed record, a
/// backdated fact) may supply them; the log trusts caller-supplied values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Identifier to store, or `None` to have the log assign one.
    pub id: Option<EventId>,
    /// Unix timestamp (seconds) to store, or `None` for "now".
    pub timestamp: Option<i64>,
    /// The typed payload.
    pub body: EventBody,
}

impl EventDraft {
    /// Start a draft for the given payload with no envelope overrides.
    pub const fn new(body: EventBody) -> Self {
        Self {
            id: None,
            timestamp: None,
            body,
        }
    }

    /// Supply an explicit event identifier.
    #[must_use]
    pub const fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    /// Supply an explicit Unix timestamp (seconds).
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl From<EventBody> for EventDraft {
    fn from(body: EventBody) -> Self {
        Self::new(body)
    }
}
