//! Identifier types for the Commons ledger.
//!
//! Events carry a UUID v7 (time-ordered) identifier assigned by the log at
//! append time unless the caller supplies one. Agents are identified by a
//! stable external address string -- the cooperative enrolls participants by
//! the address they already hold, so the registry never mints agent ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Unique identifier for an event in the append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// AgentAddress
// ---------------------------------------------------------------------------

/// Stable external address identifying an agent.
///
/// The address is the primary key of the agent registry and the value every
/// event uses to reference a participant. It is treated as an opaque string;
/// the ledger never derives meaning from its shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentAddress(String);

impl AgentAddress {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Return the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return whether the address is the empty string.
    ///
    /// Empty addresses are rejected by event validation; this exists so the
    /// store can check without allocating.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for AgentAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AgentAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<&str> for AgentAddress {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

impl core::str::FromStr for AgentAddress {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}
