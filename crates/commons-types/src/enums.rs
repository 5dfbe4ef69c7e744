//! Closed enumeration types for the Commons ledger.
//!
//! Every classificatory value that the event log persists is a closed enum
//! rather than a free string, so a typo cannot silently create an untracked
//! category or cycle. All variants serialize lowercase to match the wire
//! format of the durable stores.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an enumeration from operator input.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// What kind of value was being parsed (e.g. "role").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// The accepted spellings.
    pub expected: &'static str,
}

/// Generates lowercase `Display` and `FromStr` impls for a unit enum.
///
/// The event log itself round-trips enums through serde; these impls exist
/// for the operator-facing CLI, which parses bare words.
macro_rules! lowercase_text {
    ($name:ident, $kind:literal, $expected:literal, { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let text = match self {
                    $(Self::$variant => $text),+
                };
                write!(f, "{text}")
            }
        }

        impl core::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Agent attributes
// ---------------------------------------------------------------------------

/// The role an agent holds within the cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular contributing member.
    Member,
    /// A member with stewardship duties over shared resources.
    Steward,
    /// A member coordinating allocation and reconciliation passes.
    Coordinator,
}

lowercase_text!(Role, "role", "member, steward, coordinator", {
    "member" => Member,
    "steward" => Steward,
    "coordinator" => Coordinator,
});

/// The membership tier an agent is enrolled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Community participation without workspace access.
    Community,
    /// Coworking access.
    Coworking,
    /// Full cooperative membership.
    Cooperative,
}

lowercase_text!(Tier, "tier", "community, coworking, cooperative", {
    "community" => Community,
    "coworking" => Coworking,
    "cooperative" => Cooperative,
});

// ---------------------------------------------------------------------------
// Event classification
// ---------------------------------------------------------------------------

/// The four recognized contribution categories.
///
/// Contribution values and allocation weight vectors are keyed by this enum
/// rather than arbitrary strings so every recorded unit of work lands in a
/// tracked bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionCategory {
    /// Direct labor for the cooperative.
    Labor,
    /// Revenue-generating activity.
    Revenue,
    /// Community building and care work.
    Community,
    /// Infrastructure and tooling work.
    Infrastructure,
}

impl ContributionCategory {
    /// All categories, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Labor,
        Self::Revenue,
        Self::Community,
        Self::Infrastructure,
    ];
}

lowercase_text!(
    ContributionCategory,
    "category",
    "labor, revenue, community, infrastructure",
    {
        "labor" => Labor,
        "revenue" => Revenue,
        "community" => Community,
        "infrastructure" => Infrastructure,
    }
);

/// Which of the two sub-daily accounting windows a contribution falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionCycle {
    /// The daytime window.
    Day,
    /// The nighttime window.
    Night,
}

lowercase_text!(ContributionCycle, "cycle", "day, night", {
    "day" => Day,
    "night" => Night,
});

/// Which of the two reconciliation passes produced an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationCycle {
    /// The sunrise pass, crediting the shared pool.
    Sunrise,
    /// The sunset pass, crediting individuals.
    Sunset,
}

lowercase_text!(AllocationCycle, "allocation cycle", "sunrise, sunset", {
    "sunrise" => Sunrise,
    "sunset" => Sunset,
});

/// Whether an allocation credits individuals or the shared pool.
///
/// Anything on the wire that is not exactly `"pool"` deserializes as
/// [`AllocationTarget::Individual`] -- the projector's defaulting rule is
/// encoded in the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AllocationTarget {
    /// The allocation credits the shared pool.
    Pool,
    /// The allocation credits individual members (the default).
    Individual,
}

impl Default for AllocationTarget {
    fn default() -> Self {
        Self::Individual
    }
}

impl From<String> for AllocationTarget {
    fn from(value: String) -> Self {
        if value == "pool" {
            Self::Pool
        } else {
            Self::Individual
        }
    }
}

lowercase_text!(AllocationTarget, "target", "individual, pool", {
    "pool" => Pool,
    "individual" => Individual,
});

/// The recognized event kinds, used for filtered log reads.
///
/// This is the discriminant of [`EventBody`](crate::event::EventBody) minus
/// the forward-compatibility catch-all; an unknown record has no
/// [`EventType`] and matches no type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// A member contribution.
    Contribution,
    /// A periodic surplus allocation.
    Allocation,
    /// A withdrawal from accrued balance.
    Distribution,
    /// An agent enrollment.
    Enrollment,
    /// An agent disenrollment.
    Disenrollment,
}

lowercase_text!(
    EventType,
    "event type",
    "contribution, allocation, distribution, enrollment, disenrollment",
    {
        "contribution" => Contribution,
        "allocation" => Allocation,
        "distribution" => Distribution,
        "enrollment" => Enrollment,
        "disenrollment" => Disenrollment,
    }
);
