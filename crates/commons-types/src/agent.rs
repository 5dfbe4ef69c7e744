//! Agent registry records.
//!
//! Agent attributes (role, tier, active flag) are administrative state, not
//! economic fact, so they live in a mutable keyed store rather than the
//! event log. Enrollment and disenrollment additionally emit events for
//! audit purposes, but the registry record is canonical for who exists and
//! who is active.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{Role, Tier};
use crate::ids::AgentAddress;

/// A participant in the cooperative economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable external address (primary key).
    pub address: AgentAddress,
    /// Human-readable name or subname alias.
    pub name: String,
    /// The agent's role within the cooperative.
    pub role: Role,
    /// The membership tier the agent is enrolled under.
    pub tier: Tier,
    /// Unix timestamp (seconds) of enrollment.
    pub enrolled_at: i64,
    /// Whether the agent is currently active. Agents are never deleted;
    /// disenrollment flips this to `false` and preserves history.
    pub active: bool,
    /// Optional continuous payment stream, for informational display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_stream: Option<PaymentStream>,
}

/// Descriptor of a continuous payment stream attached to an agent.
///
/// Display metadata only -- stream flows are settled elsewhere and never
/// enter the event log or the projected balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStream {
    /// Token identifier the stream pays out in.
    pub token: String,
    /// Flow rate in token units per second.
    pub flow_rate: Decimal,
    /// Unix timestamp (seconds) the stream started.
    pub started_at: i64,
}
