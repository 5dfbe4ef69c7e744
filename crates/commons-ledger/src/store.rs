//! The explicit store handle owning both durable artifacts.
//!
//! Every component that touches the stores receives a [`Ledger`] (or one of
//! its halves) at construction; there is no ambient global store directory.
//!
//! # Consistency between the two stores
//!
//! Registration and disenrollment write the registry and then append an
//! audit event. The two writes happen inside one critical section, so no
//! other registration interleaves between them, but they are still two
//! stores with no shared transaction: a crash after the registry write and
//! before the event append leaves an agent with no audit record. This is a
//! known limitation, kept deliberately -- the registry is canonical for who
//! exists, and the audit event is best-effort.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::info;

use commons_types::{Agent, AgentAddress, Event, EventBody, EventDraft};

use crate::error::StoreError;
use crate::event_log::EventLog;
use crate::registry::AgentRegistry;

// ---------------------------------------------------------------------------
// Store configuration
// ---------------------------------------------------------------------------

/// Filesystem layout of one ledger deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding both durable artifacts.
    pub data_dir: PathBuf,
    /// File name of the append-only event log.
    pub events_file: String,
    /// File name of the agent registry snapshot.
    pub agents_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            events_file: "events.jsonl".to_owned(),
            agents_file: "agents.json".to_owned(),
        }
    }
}

impl StoreConfig {
    /// Layout rooted at the given data directory, with default file names.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the event log file.
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    /// Full path of the agent registry file.
    pub fn agents_path(&self) -> PathBuf {
        self.data_dir.join(&self.agents_file)
    }
}

// ---------------------------------------------------------------------------
// Ledger handle
// ---------------------------------------------------------------------------

/// Handle to one ledger deployment: the event log and the agent registry.
#[derive(Debug)]
pub struct Ledger {
    events: EventLog,
    agents: AgentRegistry,
    /// Critical section for operations that bridge both stores.
    bridge_lock: Mutex<()>,
}

impl Ledger {
    /// Open the stores described by `config`.
    ///
    /// Nothing is created on disk until the first write; a fresh deployment
    /// reads as an empty log and an empty registry.
    pub fn open(config: &StoreConfig) -> Self {
        Self {
            events: EventLog::new(config.events_path()),
            agents: AgentRegistry::new(config.agents_path()),
            bridge_lock: Mutex::new(()),
        }
    }

    /// The append-only event log.
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// The agent registry.
    pub const fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Enroll an agent: insert (or overwrite) the registry record, then
    /// append an `enrollment` event for audit.
    ///
    /// The event carries the agent's enrollment timestamp. See the module
    /// docs for the consistency caveat between the two writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if either store operation fails.
    pub fn register(&self, agent: Agent) -> Result<Agent, StoreError> {
        let _guard = self
            .bridge_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("ledger bridge lock"))?;

        let mut agents = self.agents.load_all()?;
        agents.insert(agent.address.clone(), agent.clone());
        self.agents.save_all(&agents)?;

        self.events.append(
            EventDraft::new(EventBody::Enrollment {
                agent_id: agent.address.clone(),
            })
            .with_timestamp(agent.enrolled_at),
        )?;

        info!(address = %agent.address, name = agent.name, "agent registered");
        Ok(agent)
    }

    /// Disenroll an agent: flip `active` to `false` in the registry, then
    /// append a `disenrollment` event for audit.
    ///
    /// The registry record is never deleted; history stays intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownAgent`] if no such agent is registered,
    /// or [`StoreError`] if either store operation fails.
    pub fn disenroll(&self, address: &AgentAddress) -> Result<(Agent, Event), StoreError> {
        let _guard = self
            .bridge_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("ledger bridge lock"))?;

        let mut agents = self.agents.load_all()?;
        let agent = agents
            .get_mut(address)
            .ok_or_else(|| StoreError::UnknownAgent {
                address: address.clone(),
            })?;
        agent.active = false;
        let agent = agent.clone();
        self.agents.save_all(&agents)?;

        let event = self.events.append(EventDraft::new(EventBody::Disenrollment {
            agent_id: address.clone(),
        }))?;

        info!(address = %address, "agent disenrolled");
        Ok((agent, event))
    }

    /// Apply an administrative mutation to an agent record in place.
    ///
    /// Role, tier, and payment-stream changes are administrative state, not
    /// economic fact, so no event is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownAgent`] if no such agent is registered.
    pub fn update_agent(
        &self,
        address: &AgentAddress,
        mutate: impl FnOnce(&mut Agent),
    ) -> Result<Agent, StoreError> {
        let _guard = self
            .bridge_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("ledger bridge lock"))?;

        let mut agents = self.agents.load_all()?;
        let agent = agents
            .get_mut(address)
            .ok_or_else(|| StoreError::UnknownAgent {
                address: address.clone(),
            })?;
        mutate(agent);
        let agent = agent.clone();
        self.agents.save_all(&agents)?;
        Ok(agent)
    }
}
