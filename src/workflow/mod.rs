//! Settlement workflow: a fixed finite-state machine with guarded
//! transitions, saga compensation, and approval-chain validation.
//!
//! Authorization is an injected capability ([`Authz`]), never an ambient
//! singleton, and transition denial is a structured decision rather than
//! an error.

pub mod approval;
pub mod saga;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Lifecycle states of a settlement workflow.
/// `Reported` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Drafted,
    Validated,
    RiskChecked,
    Settled,
    Reported,
    Canceled,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Reported | WorkflowState::Canceled)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Drafted => "drafted",
            WorkflowState::Validated => "validated",
            WorkflowState::RiskChecked => "risk_checked",
            WorkflowState::Settled => "settled",
            WorkflowState::Reported => "reported",
            WorkflowState::Canceled => "canceled",
        };
        write!(f, "{name}")
    }
}

/// Events that drive the workflow forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    Validate,
    RiskCheck,
    Settle,
    Report,
    Cancel,
}

impl WorkflowEvent {
    /// The state this event targets.
    pub fn target(&self) -> WorkflowState {
        match self {
            WorkflowEvent::Validate => WorkflowState::Validated,
            WorkflowEvent::RiskCheck => WorkflowState::RiskChecked,
            WorkflowEvent::Settle => WorkflowState::Settled,
            WorkflowEvent::Report => WorkflowState::Reported,
            WorkflowEvent::Cancel => WorkflowState::Canceled,
        }
    }

    /// The authorization action name checked for this event.
    pub fn action(&self) -> &'static str {
        match self {
            WorkflowEvent::Validate => "validate",
            WorkflowEvent::RiskCheck => "risk_check",
            WorkflowEvent::Settle => "settle",
            WorkflowEvent::Report => "report",
            WorkflowEvent::Cancel => "cancel",
        }
    }
}

/// Authorization capability consumed by guarded transitions.
///
/// Injected explicitly so the workflow never reaches for a module-level
/// singleton. Implementations are expected to be side-effect-free.
pub trait Authz {
    /// May `role` perform `action`?
    fn allowed(&self, role: &str, action: &str) -> bool;

    /// Rank of `role` in the approval hierarchy. Higher outranks lower;
    /// unknown roles rank 0.
    fn role_rank(&self, role: &str) -> u32;
}

/// Result of a guarded transition check. Never an error: denial carries
/// a reason instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDecision {
    pub allowed: bool,
    pub next_state: Option<WorkflowState>,
    pub reason: Option<String>,
}

impl TransitionDecision {
    fn granted(next: WorkflowState) -> Self {
        Self {
            allowed: true,
            next_state: Some(next),
            reason: None,
        }
    }

    fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            next_state: None,
            reason: Some(reason.into()),
        }
    }
}

/// The fixed transition table of the settlement workflow.
///
/// Built once (see [`TransitionTable::standard`]) and injected into
/// whatever owns the workflow; the table itself is immutable. Every state
/// has an explicit (possibly empty) outgoing edge set, so the table is
/// total.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    edges: HashMap<WorkflowState, Vec<WorkflowState>>,
}

impl TransitionTable {
    /// The standard settlement lifecycle:
    /// drafted → {validated, canceled}, validated → {risk_checked, canceled},
    /// risk_checked → {settled, canceled}, settled → {reported},
    /// reported/canceled terminal.
    pub fn standard() -> Self {
        use WorkflowState::*;
        let edges = HashMap::from([
            (Drafted, vec![Validated, Canceled]),
            (Validated, vec![RiskChecked, Canceled]),
            (RiskChecked, vec![Settled, Canceled]),
            (Settled, vec![Reported]),
            (Reported, vec![]),
            (Canceled, vec![]),
        ]);
        Self { edges }
    }

    /// Build a custom table from explicit edges. States without an entry
    /// have no outgoing transitions.
    pub fn from_edges(edges: HashMap<WorkflowState, Vec<WorkflowState>>) -> Self {
        Self { edges }
    }

    pub fn can_transition(&self, from: WorkflowState, to: WorkflowState) -> bool {
        self.edges
            .get(&from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    pub fn outgoing(&self, from: WorkflowState) -> &[WorkflowState] {
        self.edges.get(&from).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// True when the table contains a directed cycle.
    ///
    /// DFS with an explicit recursion stack: a cycle is reported only on
    /// a back-edge to a state in the active path, never as a blanket
    /// fallback.
    pub fn has_cycle(&self) -> bool {
        let mut finished: HashSet<WorkflowState> = HashSet::new();
        let mut on_path: HashSet<WorkflowState> = HashSet::new();

        for &state in self.edges.keys() {
            if !finished.contains(&state)
                && self.dfs_cycle(state, &mut on_path, &mut finished)
            {
                return true;
            }
        }
        false
    }

    fn dfs_cycle(
        &self,
        state: WorkflowState,
        on_path: &mut HashSet<WorkflowState>,
        finished: &mut HashSet<WorkflowState>,
    ) -> bool {
        on_path.insert(state);
        for &next in self.outgoing(state) {
            if on_path.contains(&next) {
                return true; // back-edge into the active path
            }
            if !finished.contains(&next) && self.dfs_cycle(next, on_path, finished) {
                return true;
            }
        }
        on_path.remove(&state);
        finished.insert(state);
        false
    }
}

/// Check whether `role` may drive `state` through `event`.
///
/// Requires both an authorization grant and a valid edge in the table.
/// Terminal states deny everything.
pub fn guard_transition(
    table: &TransitionTable,
    authz: &dyn Authz,
    state: WorkflowState,
    event: WorkflowEvent,
    role: &str,
) -> TransitionDecision {
    if !authz.allowed(role, event.action()) {
        return TransitionDecision::denied(format!(
            "role '{role}' is not authorized for '{}'",
            event.action()
        ));
    }

    let target = event.target();
    if !table.can_transition(state, target) {
        return TransitionDecision::denied(format!("no transition from {state} to {target}"));
    }

    TransitionDecision::granted(target)
}
