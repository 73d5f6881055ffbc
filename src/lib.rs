//! # ledger-engine
//!
//! Ledger clearing and resilience engine.
//!
//! Given batches of signed ledger entries, this engine nets positions,
//! gates risk exposure, reconciles expected against observed state,
//! replays event streams after failure, and maintains a tamper-evident
//! audit trail.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: accounts, ledger entries, events, snapshots
//! - **settlement** — Netting, reserves, tiered fees, and the settlement pipeline
//! - **risk** — Pure leverage/margin/exposure predicates
//! - **reconcile** — Windowed expected-vs-observed reconciliation
//! - **resilience** — Event-sourced replay, checkpointing, circuit breaking
//! - **workflow** — Settlement state machine, saga compensation, approvals
//! - **audit** — Hash-chain and Merkle primitives for tamper detection
//! - **queue** — Admission control and fair multi-queue draining
//!
//! Nothing in this core performs I/O or raises on partial failure: every
//! operation returns a result describing success, partial success, or a
//! structured denial, so settlement and replay always produce a
//! deterministic, inspectable outcome.

pub mod audit;
pub mod core;
pub mod queue;
pub mod reconcile;
pub mod resilience;
pub mod risk;
pub mod scenario;
pub mod settlement;
pub mod workflow;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::audit::AuditChain;
    pub use crate::core::account::AccountId;
    pub use crate::core::entry::{LedgerEntry, SettlementRequest};
    pub use crate::core::event::{Event, Snapshot};
    pub use crate::settlement::fees::FeeSchedule;
    pub use crate::settlement::netting::NetPositions;
    pub use crate::settlement::pipeline::{
        PipelineConfig, PipelineOutcome, SettlementPipeline, SettlementResult, SettlementStatus,
    };
    pub use crate::workflow::{TransitionTable, WorkflowEvent, WorkflowState};
}
