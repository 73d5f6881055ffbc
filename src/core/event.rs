use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One record in the append-only event log.
///
/// Events carry the gross and net deltas a committed operation produced.
/// The `idempotency_key` guarantees at-most-once application per replay;
/// `version` orders events within a stream and gates staleness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic stream version this event was committed at.
    pub version: u64,
    /// Unique token ensuring the event is applied at most once per replay.
    pub idempotency_key: String,
    /// Gross exposure delta.
    pub gross_delta: Decimal,
    /// Net settled delta.
    pub net_delta: Decimal,
}

impl Event {
    pub fn new(
        version: u64,
        idempotency_key: impl Into<String>,
        gross_delta: Decimal,
        net_delta: Decimal,
    ) -> Self {
        Self {
            version,
            idempotency_key: idempotency_key.into(),
            gross_delta,
            net_delta,
        }
    }
}

/// A materialized checkpoint of ledger state at a given version.
///
/// Multiple candidate snapshots may coexist (for example from different
/// nodes); reconstruction always selects the most recent by `version`.
/// `applied` counts the events folded in since the base, so callers can
/// detect under-application after a replay that silently skipped records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Accumulated gross exposure.
    pub gross: Decimal,
    /// Accumulated net settled value.
    pub net: Decimal,
    /// Highest event version folded into this snapshot.
    pub version: u64,
    /// Number of events applied on top of the base state.
    pub applied: u64,
}

impl Snapshot {
    pub fn new(gross: Decimal, net: Decimal, version: u64) -> Self {
        Self {
            gross,
            net,
            version,
            applied: 0,
        }
    }
}
