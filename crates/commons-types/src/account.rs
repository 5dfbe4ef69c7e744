//! Derived capital account snapshots.
//!
//! A [`CapitalAccount`] is the output of projection: it is constructed
//! zero-valued for every known agent, mutated only during the fold, and
//! handed to the caller as a read-only snapshot. It has no independent
//! persistence -- the event log is the only authoritative state.
//!
//! All totals use [`Decimal`] with saturating accumulation so that years of
//! fractional-unit history sum without drift.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::enums::{AllocationTarget, ContributionCategory};
use crate::ids::AgentAddress;

// ---------------------------------------------------------------------------
// Subtotals
// ---------------------------------------------------------------------------

/// Lifetime contribution totals, broken down by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTotals {
    /// Total labor contributions.
    pub labor: Decimal,
    /// Total revenue contributions.
    pub revenue: Decimal,
    /// Total community contributions.
    pub community: Decimal,
    /// Total infrastructure contributions.
    pub infrastructure: Decimal,
    /// Grand total across all four categories.
    pub total: Decimal,
}

impl ContributionTotals {
    /// Credit a contribution value to its category and the grand total.
    pub fn credit(&mut self, category: ContributionCategory, value: Decimal) {
        let bucket = match category {
            ContributionCategory::Labor => &mut self.labor,
            ContributionCategory::Revenue => &mut self.revenue,
            ContributionCategory::Community => &mut self.community,
            ContributionCategory::Infrastructure => &mut self.infrastructure,
        };
        *bucket = bucket.saturating_add(value);
        self.total = self.total.saturating_add(value);
    }

    /// Sum of the four category buckets, for conservation checks.
    pub fn category_sum(&self) -> Decimal {
        self.labor
            .saturating_add(self.revenue)
            .saturating_add(self.community)
            .saturating_add(self.infrastructure)
    }
}

/// Lifetime allocation totals, split by target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTotals {
    /// Allocations credited to the individual (sunset cycles).
    pub individual: Decimal,
    /// Allocations credited via the shared pool (sunrise cycles).
    pub pool: Decimal,
    /// Grand total across both targets.
    pub total: Decimal,
}

impl AllocationTotals {
    /// Credit an allocation amount to the given target and the grand total.
    pub fn credit(&mut self, target: AllocationTarget, amount: Decimal) {
        let bucket = match target {
            AllocationTarget::Individual => &mut self.individual,
            AllocationTarget::Pool => &mut self.pool,
        };
        *bucket = bucket.saturating_add(amount);
        self.total = self.total.saturating_add(amount);
    }
}

/// Lifetime distribution total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTotals {
    /// Total withdrawn across all distributions.
    pub total: Decimal,
}

impl DistributionTotals {
    /// Credit a withdrawn amount to the total.
    pub fn credit(&mut self, amount: Decimal) {
        self.total = self.total.saturating_add(amount);
    }
}

// ---------------------------------------------------------------------------
// Capital account
// ---------------------------------------------------------------------------

/// The derived per-agent summary of contributions, allocations,
/// distributions, and running balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalAccount {
    /// The agent this account belongs to.
    pub address: AgentAddress,
    /// Display name carried over from the registry record.
    pub name: String,
    /// Signed running balance per unit of account. Allocations mint
    /// balance, distributions burn it; negative balances are permitted.
    pub balances: BTreeMap<String, Decimal>,
    /// Lifetime contribution totals by category.
    pub contributions: ContributionTotals,
    /// Lifetime allocation totals by target.
    pub allocations: AllocationTotals,
    /// Lifetime distribution total.
    pub distributions: DistributionTotals,
    /// Unix timestamp of the last event that touched this account, or
    /// `None` if no event has.
    pub last_updated: Option<i64>,
}

impl CapitalAccount {
    /// Construct a zero-valued account seeded from a registry record.
    pub fn seeded(agent: &Agent) -> Self {
        Self {
            address: agent.address.clone(),
            name: agent.name.clone(),
            balances: BTreeMap::new(),
            contributions: ContributionTotals::default(),
            allocations: AllocationTotals::default(),
            distributions: DistributionTotals::default(),
            last_updated: None,
        }
    }

    /// Credit the named unit-of-account balance.
    pub fn credit_balance(&mut self, unit: &str, amount: Decimal) {
        let balance = self
            .balances
            .entry(unit.to_owned())
            .or_insert(Decimal::ZERO);
        *balance = balance.saturating_add(amount);
    }

    /// Debit the named unit-of-account balance. May go negative; the
    /// projector does not enforce sufficiency.
    pub fn debit_balance(&mut self, unit: &str, amount: Decimal) {
        let balance = self
            .balances
            .entry(unit.to_owned())
            .or_insert(Decimal::ZERO);
        *balance = balance.saturating_sub(amount);
    }

    /// Record that an event at the given timestamp touched this account.
    pub const fn touch(&mut self, timestamp: i64) {
        self.last_updated = Some(timestamp);
    }
}
