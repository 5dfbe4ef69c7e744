//! Append-only JSON-lines event log.
//!
//! One event per line, each record self-describing its variant via the
//! `type` tag. The file only ever grows; no in-place rewrite occurs. The
//! append path is an explicit critical section: the record is serialized to
//! a single buffer first and written with one `write_all` under a mutex, so
//! concurrent appends interleave only at record granularity regardless of
//! what the underlying filesystem guarantees.
//!
//! Reads are lazy line-by-line scans ([`EventLog::scan`]); the `read_*`
//! family collects from them. A malformed line aborts the scan that
//! encountered it with the offending line number -- silent skipping would
//! corrupt financial history downstream.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::debug;

use commons_types::{
    AgentAddress, ContributionCycle, Event, EventBody, EventDraft, EventId, EventType,
};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// The durable, ordered, append-only store of events.
#[derive(Debug)]
pub struct EventLog {
    /// Path of the JSON-lines file.
    path: PathBuf,
    /// Critical section for the append path.
    append_lock: Mutex<()>,
}

impl EventLog {
    /// Create a handle for the log file at `path`.
    ///
    /// The file is not created until the first append; reading a log whose
    /// file does not exist yields an empty sequence (the bootstrap case).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate, stamp, and durably append an event, returning the stored
    /// form.
    ///
    /// An id (UUID v7) and timestamp (current Unix seconds) are assigned
    /// when the draft omits them; caller-supplied values are trusted. The
    /// record is serialized before the critical section is entered and
    /// written atomically with respect to other appends through this
    /// process.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the payload is missing required
    /// content -- nothing is written in that case -- or [`StoreError::Io`]
    /// if the write fails.
    pub fn append(&self, draft: EventDraft) -> Result<Event, StoreError> {
        validate(&draft.body)?;

        let event = Event {
            id: draft.id.unwrap_or_else(EventId::new),
            timestamp: draft.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
            body: draft.body,
        };

        let mut record = serde_json::to_string(&event)?;
        record.push('\n');

        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("event log append lock"))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.sync_data()?;

        debug!(event_id = %event.id, event_type = ?event.body.event_type(), "event appended");
        Ok(event)
    }

    /// Start a lazy scan of the log in append order.
    ///
    /// The iterator yields one `Result<Event, StoreError>` per record, so a
    /// very large history can be consumed incrementally. A missing log file
    /// yields an empty iterator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be opened.
    pub fn scan(&self) -> Result<EventIter, StoreError> {
        if !self.path.exists() {
            return Ok(EventIter {
                lines: None,
                line: 0,
            });
        }
        let file = File::open(&self.path)?;
        Ok(EventIter {
            lines: Some(BufReader::new(file).lines()),
            line: 0,
        })
    }

    /// Read every event in append order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] with the offending line number if any
    /// record fails to parse; the whole read fails rather than returning
    /// partial history.
    pub fn read_all(&self) -> Result<Vec<Event>, StoreError> {
        self.scan()?.collect()
    }

    /// Read events of one recognized type, in append order.
    ///
    /// # Errors
    ///
    /// Same failure behavior as [`EventLog::read_all`].
    pub fn read_by_type(&self, event_type: EventType) -> Result<Vec<Event>, StoreError> {
        self.read_filtered(|event| event.body.event_type() == Some(event_type))
    }

    /// Read events that reference the given agent, either as the primary
    /// agent or through an allocation entry.
    ///
    /// # Errors
    ///
    /// Same failure behavior as [`EventLog::read_all`].
    pub fn read_by_agent(&self, address: &AgentAddress) -> Result<Vec<Event>, StoreError> {
        self.read_filtered(|event| event.body.touches_agent(address))
    }

    /// Read events whose timestamp falls in `[start, end]` (Unix seconds,
    /// both inclusive).
    ///
    /// # Errors
    ///
    /// Same failure behavior as [`EventLog::read_all`].
    pub fn read_by_time_range(&self, start: i64, end: i64) -> Result<Vec<Event>, StoreError> {
        self.read_filtered(|event| event.timestamp >= start && event.timestamp <= end)
    }

    /// Read contribution events for one accounting cycle whose timestamp,
    /// rendered as an RFC 3339 UTC string, starts with `iso_prefix`
    /// (e.g. `"2026-08-27"` or `"2026-08"`).
    ///
    /// # Errors
    ///
    /// Same failure behavior as [`EventLog::read_all`].
    pub fn read_by_cycle(
        &self,
        cycle: ContributionCycle,
        iso_prefix: &str,
    ) -> Result<Vec<Event>, StoreError> {
        self.read_filtered(|event| {
            let EventBody::Contribution {
                cycle: event_cycle, ..
            } = &event.body
            else {
                return false;
            };
            *event_cycle == cycle
                && event
                    .iso_timestamp()
                    .is_some_and(|iso| iso.starts_with(iso_prefix))
        })
    }

    /// Scan the log, keeping events for which `keep` returns true.
    fn read_filtered(
        &self,
        keep: impl Fn(&Event) -> bool,
    ) -> Result<Vec<Event>, StoreError> {
        let mut events = Vec::new();
        for item in self.scan()? {
            let event = item?;
            if keep(&event) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Lazy scan iterator
// ---------------------------------------------------------------------------

/// Lazy, restartable scan over the event log in append order.
///
/// Obtained from [`EventLog::scan`]. Yields [`StoreError::Corrupt`] with a
/// 1-based line number when a record fails to parse; callers decide whether
/// to abort (the `read_*` family does) or to quarantine out of band.
#[derive(Debug)]
pub struct EventIter {
    /// Line source, or `None` for a log whose file does not exist yet.
    lines: Option<Lines<BufReader<File>>>,
    /// 1-based number of the last line read.
    line: usize,
}

impl Iterator for EventIter {
    type Item = Result<Event, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        loop {
            let line = match lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(StoreError::Io(err))),
            };
            self.line = self.line.saturating_add(1);

            // A trailing blank line is not a record.
            if line.trim().is_empty() {
                continue;
            }

            return Some(serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                line: self.line,
                source,
            }));
        }
    }
}

// ---------------------------------------------------------------------------
// Write-side validation
// ---------------------------------------------------------------------------

/// Reject events missing required content for their variant, before any
/// durable write occurs.
fn validate(body: &EventBody) -> Result<(), StoreError> {
    match body {
        EventBody::Contribution {
            agent_id,
            value,
            unit,
            ..
        } => {
            require_agent(agent_id, "contribution.agent_id")?;
            require_unit(unit, "contribution.unit")?;
            require_non_negative(value.is_sign_negative(), "contribution.value")
        }
        EventBody::Allocation {
            entries,
            cycle_date,
            ..
        } => {
            if cycle_date.is_empty() {
                return Err(validation("allocation.cycle_date must not be empty"));
            }
            for entry in entries {
                require_agent(&entry.agent_id, "allocation entry agent_id")?;
                require_unit(&entry.unit, "allocation entry unit")?;
                require_non_negative(entry.amount.is_sign_negative(), "allocation entry amount")?;
            }
            Ok(())
        }
        EventBody::Distribution {
            agent_id,
            amount,
            unit,
            ..
        } => {
            require_agent(agent_id, "distribution.agent_id")?;
            require_unit(unit, "distribution.unit")?;
            require_non_negative(amount.is_sign_negative(), "distribution.amount")
        }
        EventBody::Enrollment { agent_id } => require_agent(agent_id, "enrollment.agent_id"),
        EventBody::Disenrollment { agent_id } => {
            require_agent(agent_id, "disenrollment.agent_id")
        }
        EventBody::Unknown => Err(validation(
            "unrecognized event type cannot be appended by this writer",
        )),
    }
}

fn validation(reason: &str) -> StoreError {
    StoreError::Validation {
        reason: reason.to_owned(),
    }
}

fn require_agent(address: &AgentAddress, field: &str) -> Result<(), StoreError> {
    if address.is_empty() {
        return Err(validation(&format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_unit(unit: &str, field: &str) -> Result<(), StoreError> {
    if unit.is_empty() {
        return Err(validation(&format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_non_negative(is_negative: bool, field: &str) -> Result<(), StoreError> {
    if is_negative {
        return Err(validation(&format!("{field} must not be negative")));
    }
    Ok(())
}
