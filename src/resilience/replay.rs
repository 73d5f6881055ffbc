use crate::core::event::{Event, Snapshot};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::thread;

/// Replay an event stream on top of a base state.
///
/// Events are sorted by `(version, idempotency_key)` before application.
/// An event is skipped when it is stale (`version` below the base's
/// current version) or when its idempotency key was already seen in this
/// replay. Applied events accumulate gross/net and advance the snapshot
/// version. Replay never errors on individual events; callers inspect
/// `Snapshot::applied` to detect under-application.
///
/// # Examples
///
/// ```
/// use ledger_engine::core::event::Event;
/// use ledger_engine::resilience::replay::replay_state;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let events = vec![
///     Event::new(1, "k1", dec!(100), dec!(90)),
///     Event::new(1, "k1", dec!(100), dec!(90)), // duplicate, skipped
/// ];
/// let snap = replay_state(Decimal::ZERO, Decimal::ZERO, 0, &events);
/// assert_eq!(snap.gross, dec!(100));
/// assert_eq!(snap.applied, 1);
/// ```
pub fn replay_state(
    base_gross: Decimal,
    base_net: Decimal,
    current_version: u64,
    events: &[Event],
) -> Snapshot {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by(|a, b| {
        (a.version, a.idempotency_key.as_str()).cmp(&(b.version, b.idempotency_key.as_str()))
    });

    let mut snapshot = Snapshot::new(base_gross, base_net, current_version);
    let mut seen: HashSet<&str> = HashSet::new();

    for event in ordered {
        if event.version < current_version {
            debug!(
                "skipping stale event {} at version {}",
                event.idempotency_key, event.version
            );
            continue;
        }
        if !seen.insert(event.idempotency_key.as_str()) {
            debug!("skipping duplicate event {}", event.idempotency_key);
            continue;
        }
        snapshot.gross += event.gross_delta;
        snapshot.net += event.net_delta;
        snapshot.version = snapshot.version.max(event.version);
        snapshot.applied += 1;
    }

    snapshot
}

/// Reconstruct authoritative state from candidate snapshots plus the
/// event log.
///
/// The snapshot with the **highest** version is the replay base — a stale
/// base would silently discard committed state. With no candidates the
/// zero snapshot at version 0 is used.
pub fn event_sourced_reconstruct(snapshots: &[Snapshot], events: &[Event]) -> Snapshot {
    let base = snapshots
        .iter()
        .max_by_key(|s| s.version)
        .cloned()
        .unwrap_or_default();

    replay_state(base.gross, base.net, base.version, events)
}

/// Replay several event batches against the same base in parallel and
/// merge the results by summing per-batch gross/net deltas and taking the
/// maximum version.
///
/// Batches must be idempotency-key-disjoint; deduplication runs per batch
/// only, so overlapping keys across batches double-count. That invariant
/// is the caller's to uphold.
pub fn concurrent_replay(
    base_gross: Decimal,
    base_net: Decimal,
    version: u64,
    batches: &[Vec<Event>],
) -> Snapshot {
    let partials: Vec<Snapshot> = thread::scope(|scope| {
        let handles: Vec<_> = batches
            .iter()
            .map(|batch| scope.spawn(move || replay_state(base_gross, base_net, version, batch)))
            .collect();
        handles.into_iter().map(|h| h.join().expect("replay thread panicked")).collect()
    });

    let mut merged = Snapshot::new(base_gross, base_net, version);
    for partial in partials {
        merged.gross += partial.gross - base_gross;
        merged.net += partial.net - base_net;
        merged.version = merged.version.max(partial.version);
        merged.applied += partial.applied;
    }
    merged
}
