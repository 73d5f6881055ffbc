use ledger_engine::audit::{merkle_root, payload_checksum, verify_chain_integrity, AuditChain};
use ledger_engine::core::entry::SettlementRequest;
use ledger_engine::core::event::{Event, Snapshot};
use ledger_engine::reconcile::{windowed_reconciliation, ReconEntry};
use ledger_engine::resilience::replay::{event_sourced_reconstruct, replay_state};
use ledger_engine::settlement::fees::{FeeSchedule, FeeTier};
use ledger_engine::settlement::pipeline::{PipelineConfig, SettlementPipeline, SettlementStatus};
use ledger_engine::workflow::{guard_transition, Authz, TransitionTable, WorkflowEvent, WorkflowState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct OpsAuthz;

impl Authz for OpsAuthz {
    fn allowed(&self, role: &str, action: &str) -> bool {
        match action {
            "settle" | "report" => role == "supervisor" || role == "director",
            _ => true,
        }
    }

    fn role_rank(&self, role: &str) -> u32 {
        match role {
            "clerk" => 1,
            "supervisor" => 2,
            "director" => 3,
            _ => 0,
        }
    }
}

fn pipeline() -> SettlementPipeline {
    SettlementPipeline::new(PipelineConfig {
        reserve_ratio: dec!(0.05),
        leverage_cap: dec!(10),
        collateral: dec!(100),
        fee_schedule: FeeSchedule::new(vec![
            FeeTier::new(dec!(100), dec!(0.01)),
            FeeTier::new(dec!(1000), dec!(0.005)),
        ])
        .unwrap(),
    })
}

/// Full flow: workflow gating → settlement → audit chain → reconciliation.
#[test]
fn full_clearing_flow() {
    // Workflow must reach risk_checked before the batch may settle.
    let table = TransitionTable::standard();
    let authz = OpsAuthz;
    let mut state = WorkflowState::Drafted;
    for event in [WorkflowEvent::Validate, WorkflowEvent::RiskCheck, WorkflowEvent::Settle] {
        let decision = guard_transition(&table, &authz, state, event, "supervisor");
        assert!(decision.allowed, "{event:?} denied: {:?}", decision.reason);
        state = decision.next_state.unwrap();
    }
    assert_eq!(state, WorkflowState::Settled);

    // Settle a mixed batch: one malformed, one breaching, two clean.
    let requests = vec![
        SettlementRequest::new("ACC-A", dec!(400)),
        SettlementRequest::new("", dec!(100)),
        SettlementRequest::new("ACC-B", dec!(-300)),
        SettlementRequest::new("ACC-C", dec!(500)), // pushes gross past 1000
    ];
    let outcome = pipeline().process(&requests);

    assert_eq!(outcome.results[0].status, SettlementStatus::Settled);
    assert_eq!(outcome.results[1].status, SettlementStatus::Rejected);
    assert_eq!(outcome.results[2].status, SettlementStatus::Settled);
    assert_eq!(outcome.results[3].status, SettlementStatus::RiskBlocked);
    assert_eq!(outcome.final_gross, dec!(1300));

    // Audit every result; the chain must verify and any tamper must not.
    let mut chain = AuditChain::new();
    for result in &outcome.results {
        chain.append(serde_json::to_string(result).unwrap());
    }
    assert!(verify_chain_integrity(chain.entries()));

    let leaves: Vec<u64> = chain
        .entries()
        .iter()
        .map(|e| payload_checksum(&e.payload))
        .collect();
    assert!(merkle_root(&leaves).is_some());

    // Reconcile settled nets against an observation feed within 100 bps.
    let expected: Vec<ReconEntry> = outcome
        .results
        .iter()
        .filter(|r| r.status == SettlementStatus::Settled)
        .map(|r| ReconEntry::new(r.account.clone(), r.net, 5))
        .collect();
    let observed = vec![
        ReconEntry::new("ACC-A", dec!(380.1), 7),
        ReconEntry::new("ACC-B", dec!(-285.2), 9),
    ];
    let buckets = windowed_reconciliation(&expected, &observed, 10, dec!(100)).unwrap();
    assert_eq!(buckets[&0].matches, 2);
    assert_eq!(buckets[&0].breaks, 0);
    assert_eq!(buckets[&0].unmatched_observed, 0);
}

/// Crash recovery: snapshots from two nodes plus an event tail replay to
/// the same state no matter how often the replay runs.
#[test]
fn crash_recovery_replay_is_deterministic() {
    let snapshots = vec![
        Snapshot::new(dec!(1000), dec!(900), 10),
        Snapshot::new(dec!(1400), dec!(1250), 14), // freshest wins
        Snapshot::new(dec!(600), dec!(540), 6),
    ];
    let events = vec![
        Event::new(15, "e15", dec!(50), dec!(45)),
        Event::new(12, "e12", dec!(999), dec!(999)), // stale vs version 14
        Event::new(16, "e16", dec!(30), dec!(27)),
        Event::new(16, "e16", dec!(30), dec!(27)), // duplicate
    ];

    let first = event_sourced_reconstruct(&snapshots, &events);
    let second = event_sourced_reconstruct(&snapshots, &events);

    assert_eq!(first, second);
    assert_eq!(first.gross, dec!(1480));
    assert_eq!(first.net, dec!(1322));
    assert_eq!(first.version, 16);
    assert_eq!(first.applied, 2);
}

/// Unordered event input replays identically to sorted input.
#[test]
fn replay_is_order_insensitive() {
    let sorted = vec![
        Event::new(1, "a", dec!(10), dec!(9)),
        Event::new(2, "b", dec!(20), dec!(18)),
        Event::new(3, "c", dec!(30), dec!(27)),
    ];
    let mut shuffled = sorted.clone();
    shuffled.reverse();

    let from_sorted = replay_state(Decimal::ZERO, Decimal::ZERO, 0, &sorted);
    let from_shuffled = replay_state(Decimal::ZERO, Decimal::ZERO, 0, &shuffled);
    assert_eq!(from_sorted, from_shuffled);
}

/// Settlement outcomes serialize to JSON envelopes a service layer can carry.
#[test]
fn outcome_json_round_trip() {
    let outcome = pipeline().process(&[SettlementRequest::new("ACC-A", dec!(42))]);
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["results"][0]["account"], "ACC-A");
    assert_eq!(parsed["results"][0]["status"], "settled");
    assert!(parsed.get("final_gross").is_some());
}

/// Denied transitions surface structured reasons, never panics.
#[test]
fn clerk_cannot_settle() {
    let table = TransitionTable::standard();
    let decision = guard_transition(
        &table,
        &OpsAuthz,
        WorkflowState::RiskChecked,
        WorkflowEvent::Settle,
        "clerk",
    );
    assert!(!decision.allowed);
    assert!(decision.reason.is_some());
}
