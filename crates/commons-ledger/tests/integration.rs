//! Integration tests for the `commons-ledger` durable stores.
//!
//! Every test runs against a throwaway temp directory; nothing here needs
//! external services.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::items_after_statements,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing
)]

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use commons_ledger::{EventLog, Ledger, StoreConfig, StoreError};
use commons_types::{
    Agent, AgentAddress, AllocationCycle, AllocationEntry, AllocationTarget, ContributionCategory,
    ContributionCycle, Event, EventBody, EventDraft, EventId, EventType, Role, Tier,
};

// =============================================================================
// Helpers
// =============================================================================

fn contribution(agent: &str, value: i64) -> EventBody {
    EventBody::Contribution {
        agent_id: AgentAddress::from(agent),
        cycle: ContributionCycle::Day,
        category: ContributionCategory::Labor,
        value: Decimal::new(value, 0),
        unit: "SUP".to_owned(),
        description: "work".to_owned(),
        evidence: None,
    }
}

fn allocation_to(agent: &str, amount: i64) -> EventBody {
    EventBody::Allocation {
        cycle: AllocationCycle::Sunset,
        cycle_date: "2026-08-27".to_owned(),
        target: AllocationTarget::Individual,
        entries: vec![AllocationEntry {
            agent_id: AgentAddress::from(agent),
            amount: Decimal::new(amount, 0),
            unit: "SUP".to_owned(),
            breakdown: BTreeMap::new(),
        }],
        total_contributions: Decimal::new(amount, 0),
        weights: BTreeMap::new(),
    }
}

fn agent(address: &str, name: &str) -> Agent {
    Agent {
        address: AgentAddress::from(address),
        name: name.to_owned(),
        role: Role::Member,
        tier: Tier::Cooperative,
        enrolled_at: 1_700_000_000,
        active: true,
        payment_stream: None,
    }
}

// =============================================================================
// Event log: append
// =============================================================================

#[test]
fn append_assigns_id_and_timestamp() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    let stored = log
        .append(EventDraft::new(contribution("a1", 100)))
        .expect("append");
    assert!(stored.timestamp > 0);

    let all = log.read_all().expect("read");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], stored);
}

#[test]
fn append_trusts_caller_supplied_envelope() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    let id = EventId::new();
    let stored = log
        .append(
            EventDraft::new(contribution("a1", 100))
                .with_id(id)
                .with_timestamp(42),
        )
        .expect("append");

    assert_eq!(stored.id, id);
    assert_eq!(stored.timestamp, 42);
}

#[test]
fn append_order_is_read_order() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    let e1 = log.append(EventDraft::new(contribution("a1", 1))).expect("e1");
    let e2 = log.append(EventDraft::new(contribution("a2", 2))).expect("e2");
    let e3 = log.append(EventDraft::new(contribution("a3", 3))).expect("e3");

    let all = log.read_all().expect("read");
    assert_eq!(all, vec![e1, e2, e3]);
}

#[test]
fn concurrent_appends_interleave_only_at_record_granularity() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 25;

    let dir = TempDir::new().expect("temp dir");
    let log = Arc::new(EventLog::new(dir.path().join("events.jsonl")));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let log = Arc::clone(&log);
            std::thread::spawn(move || {
                for n in 0..PER_WRITER {
                    let body = contribution(&format!("w{writer}"), i64::try_from(n).unwrap_or(0));
                    log.append(EventDraft::new(body)).expect("append");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    // Every record must be intact and parseable; the count must be exact.
    let all = log.read_all().expect("read after concurrent appends");
    assert_eq!(all.len(), WRITERS * PER_WRITER);
}

#[test]
fn validation_failure_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("events.jsonl");
    let log = EventLog::new(&path);

    let result = log.append(EventDraft::new(contribution("", 100)));
    assert!(matches!(result, Err(StoreError::Validation { .. })));
    assert!(!path.exists());
}

#[test]
fn negative_distribution_amount_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    let result = log.append(EventDraft::new(EventBody::Distribution {
        agent_id: AgentAddress::from("a1"),
        amount: Decimal::new(-5, 0),
        unit: "SUP".to_owned(),
        settlement_ref: None,
    }));
    assert!(matches!(result, Err(StoreError::Validation { .. })));
}

// =============================================================================
// Event log: reads
// =============================================================================

#[test]
fn missing_log_reads_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("never-created.jsonl"));

    let all = log.read_all().expect("bootstrap read");
    assert!(all.is_empty());
}

#[test]
fn corrupt_record_fails_scan_with_line_number() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("events.jsonl");
    let log = EventLog::new(&path);

    log.append(EventDraft::new(contribution("a1", 1))).expect("good record");
    let mut raw = fs::read_to_string(&path).expect("read raw");
    raw.push_str("{not json\n");
    fs::write(&path, raw).expect("inject corruption");

    let result = log.read_all();
    assert!(matches!(result, Err(StoreError::Corrupt { line: 2, .. })));
}

#[test]
fn unknown_event_type_is_scanned_not_fatal() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("events.jsonl");
    let log = EventLog::new(&path);

    log.append(EventDraft::new(contribution("a1", 1))).expect("good record");
    let mut raw = fs::read_to_string(&path).expect("read raw");
    raw.push_str(
        "{\"id\":\"018f0000-0000-7000-8000-000000000000\",\"timestamp\":5,\"type\":\"dividend\",\"amount\":\"4\"}\n",
    );
    fs::write(&path, raw).expect("inject future record");

    let all = log.read_all().expect("forward-compatible scan");
    assert_eq!(all.len(), 2);
    assert!(matches!(all[1].body, EventBody::Unknown));

    // Unknown records match no type filter.
    let contributions = log.read_by_type(EventType::Contribution).expect("by type");
    assert_eq!(contributions.len(), 1);
}

#[test]
fn read_by_type_filters_variants() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    log.append(EventDraft::new(contribution("a1", 1))).expect("c");
    log.append(EventDraft::new(allocation_to("a1", 20))).expect("a");
    log.append(EventDraft::new(EventBody::Enrollment {
        agent_id: AgentAddress::from("a2"),
    }))
    .expect("e");

    assert_eq!(log.read_by_type(EventType::Contribution).expect("c").len(), 1);
    assert_eq!(log.read_by_type(EventType::Allocation).expect("a").len(), 1);
    assert_eq!(log.read_by_type(EventType::Distribution).expect("d").len(), 0);
}

#[test]
fn read_by_agent_includes_allocation_entries() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    log.append(EventDraft::new(contribution("a1", 1))).expect("c1");
    log.append(EventDraft::new(contribution("a2", 2))).expect("c2");
    log.append(EventDraft::new(allocation_to("a1", 20))).expect("alloc");

    let a1 = AgentAddress::from("a1");
    let events = log.read_by_agent(&a1).expect("by agent");
    assert_eq!(events.len(), 2);

    let a3 = AgentAddress::from("a3");
    assert!(log.read_by_agent(&a3).expect("by agent").is_empty());
}

#[test]
fn read_by_time_range_is_inclusive() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    for ts in [10, 20, 30] {
        log.append(EventDraft::new(contribution("a1", 1)).with_timestamp(ts))
            .expect("append");
    }

    let window = log.read_by_time_range(10, 20).expect("window");
    assert_eq!(window.len(), 2);
    let all = log.read_by_time_range(0, 100).expect("all");
    assert_eq!(all.len(), 3);
}

#[test]
fn read_by_cycle_matches_cycle_and_date_prefix() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    // 2026-08-27T00:00:00Z
    let on_date = 1_787_788_800;
    log.append(EventDraft::new(contribution("a1", 1)).with_timestamp(on_date))
        .expect("day contribution");

    let night = EventBody::Contribution {
        agent_id: AgentAddress::from("a1"),
        cycle: ContributionCycle::Night,
        category: ContributionCategory::Community,
        value: Decimal::ONE,
        unit: "SUP".to_owned(),
        description: "night shift".to_owned(),
        evidence: None,
    };
    log.append(EventDraft::new(night).with_timestamp(on_date))
        .expect("night contribution");

    // A different day entirely.
    log.append(EventDraft::new(contribution("a1", 1)).with_timestamp(0))
        .expect("epoch contribution");

    let day = log
        .read_by_cycle(ContributionCycle::Day, "2026-08-27")
        .expect("day scan");
    assert_eq!(day.len(), 1);

    let night = log
        .read_by_cycle(ContributionCycle::Night, "2026-08")
        .expect("night scan");
    assert_eq!(night.len(), 1);

    let nothing = log
        .read_by_cycle(ContributionCycle::Day, "2027")
        .expect("empty scan");
    assert!(nothing.is_empty());
}

#[test]
fn lazy_iter_yields_records_incrementally() {
    let dir = TempDir::new().expect("temp dir");
    let log = EventLog::new(dir.path().join("events.jsonl"));

    for n in 0..5 {
        log.append(EventDraft::new(contribution("a1", n))).expect("append");
    }

    let mut iter = log.scan().expect("scan");
    let first: Option<Result<Event, _>> = iter.next();
    assert!(matches!(first, Some(Ok(_))));
    // The rest of the log is still unconsumed and intact.
    assert_eq!(iter.filter_map(Result::ok).count(), 4);
}

// =============================================================================
// Agent registry
// =============================================================================

#[test]
fn missing_registry_reads_as_empty() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));

    let agents = ledger.agents().load_all().expect("bootstrap load");
    assert!(agents.is_empty());
}

#[test]
fn registry_round_trips_and_overwrites() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));

    let mut agents = BTreeMap::new();
    agents.insert(AgentAddress::from("a1"), agent("a1", "ari"));
    ledger.agents().save_all(&agents).expect("save");

    let loaded = ledger.agents().load_all().expect("load");
    assert_eq!(loaded, agents);

    // Full-overwrite semantics: a save with one agent removed removes it.
    ledger.agents().save_all(&BTreeMap::new()).expect("overwrite");
    assert!(ledger.agents().load_all().expect("reload").is_empty());
}

#[test]
fn register_writes_registry_then_enrollment_event() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));

    let registered = ledger.register(agent("a1", "ari")).expect("register");
    assert!(registered.active);

    let agents = ledger.agents().load_all().expect("load");
    assert!(agents.contains_key(&AgentAddress::from("a1")));

    let enrollments = ledger
        .events()
        .read_by_type(EventType::Enrollment)
        .expect("enrollments");
    assert_eq!(enrollments.len(), 1);
    // The audit event carries the agent's enrollment timestamp.
    assert_eq!(enrollments[0].timestamp, registered.enrolled_at);
}

#[test]
fn disenroll_flips_active_and_appends_event() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));
    ledger.register(agent("a1", "ari")).expect("register");

    let (updated, event) = ledger.disenroll(&AgentAddress::from("a1")).expect("disenroll");
    assert!(!updated.active);
    assert!(matches!(event.body, EventBody::Disenrollment { .. }));

    // Record preserved, not deleted.
    let agents = ledger.agents().load_all().expect("load");
    let stored = agents.get(&AgentAddress::from("a1")).expect("still present");
    assert!(!stored.active);
}

#[test]
fn disenroll_unknown_agent_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));

    let result = ledger.disenroll(&AgentAddress::from("ghost"));
    assert!(matches!(result, Err(StoreError::UnknownAgent { .. })));
}

#[test]
fn update_agent_mutates_in_place_without_event() {
    let dir = TempDir::new().expect("temp dir");
    let ledger = Ledger::open(&StoreConfig::in_dir(dir.path()));
    ledger.register(agent("a1", "ari")).expect("register");
    let before = ledger.events().read_all().expect("events before").len();

    let updated = ledger
        .update_agent(&AgentAddress::from("a1"), |a| a.role = Role::Coordinator)
        .expect("update");
    assert_eq!(updated.role, Role::Coordinator);

    // Administrative change, no economic fact recorded.
    assert_eq!(ledger.events().read_all().expect("events after").len(), before);
}
