//! The projection fold: event sequence + registry snapshot -> accounts.
//!
//! # Design
//!
//! - **Registry is authoritative for existence**: one zero-valued account
//!   is seeded per known agent; events referencing unknown addresses are
//!   skipped, not auto-created, so an orphaned or typo'd address can never
//!   silently acquire a balance. Skips are counted for audit visibility.
//! - **Allocations mint, distributions burn**: unit-of-account balances
//!   move only through those two event kinds. Contributions track work but
//!   touch no balance.
//! - **Sufficiency is not enforced here**: a distribution may push a
//!   balance negative; whatever issued the event owns that policy.

use std::collections::BTreeMap;

use tracing::debug;

use commons_types::{Agent, AgentAddress, CapitalAccount, Event, EventBody};

/// The output of one projection run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    /// One capital account per agent known to the registry.
    pub accounts: BTreeMap<AgentAddress, CapitalAccount>,
    /// How many agent references were skipped because the registry does not
    /// know the address. Nonzero values deserve operator attention.
    pub unknown_agent_skips: u64,
}

impl Projection {
    /// Look up the account for an agent, if the registry knows it.
    pub fn account(&self, address: &AgentAddress) -> Option<&CapitalAccount> {
        self.accounts.get(address)
    }
}

/// Fold the event sequence into capital accounts.
///
/// Pure and total: consults nothing outside its arguments, never raises for
/// well-formed input, and produces bit-identical output for identical
/// input. Callers wanting a windowed view pass a filtered slice (e.g. from
/// a time-range read); the fold itself applies every event it is given, in
/// the order given.
pub fn project(
    events: &[Event],
    agents: &BTreeMap<AgentAddress, Agent>,
) -> Projection {
    let mut accounts: BTreeMap<AgentAddress, CapitalAccount> = agents
        .iter()
        .map(|(address, agent)| (address.clone(), CapitalAccount::seeded(agent)))
        .collect();
    let mut skips: u64 = 0;

    for event in events {
        match &event.body {
            EventBody::Contribution {
                agent_id,
                category,
                value,
                ..
            } => {
                if let Some(account) = accounts.get_mut(agent_id) {
                    account.contributions.credit(*category, *value);
                    account.touch(event.timestamp);
                } else {
                    skips = skips.saturating_add(1);
                }
            }

            EventBody::Allocation {
                target, entries, ..
            } => {
                for entry in entries {
                    if let Some(account) = accounts.get_mut(&entry.agent_id) {
                        account.allocations.credit(*target, entry.amount);
                        // Allocations mint balance in the entry's unit.
                        account.credit_balance(&entry.unit, entry.amount);
                        account.touch(event.timestamp);
                    } else {
                        skips = skips.saturating_add(1);
                    }
                }
            }

            EventBody::Distribution {
                agent_id,
                amount,
                unit,
                ..
            } => {
                if let Some(account) = accounts.get_mut(agent_id) {
                    account.distributions.credit(*amount);
                    // Distributions burn balance; may go negative.
                    account.debit_balance(unit, *amount);
                    account.touch(event.timestamp);
                } else {
                    skips = skips.saturating_add(1);
                }
            }

            // No balance effect: the registry is the source of truth for
            // active/inactive, these are audit records only.
            EventBody::Enrollment { agent_id } | EventBody::Disenrollment { agent_id } => {
                if !accounts.contains_key(agent_id) {
                    skips = skips.saturating_add(1);
                }
            }

            // Forward compatibility: event kinds this build does not
            // recognize fold to nothing.
            EventBody::Unknown => {}
        }
    }

    if skips > 0 {
        debug!(skips, "projection skipped unknown agent references");
    }

    Projection {
        accounts,
        unknown_agent_skips: skips,
    }
}
