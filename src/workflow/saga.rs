use crate::core::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One completed step of a multi-step settlement saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaStep {
    pub account: AccountId,
    pub delta: Decimal,
}

impl SagaStep {
    pub fn new(account: impl Into<String>, delta: Decimal) -> Self {
        Self {
            account: AccountId::new(account),
            delta,
        }
    }
}

/// A compensating entry emitted while unwinding a saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationEntry {
    pub account: AccountId,
    /// Negation of the original step's delta.
    pub delta: Decimal,
    /// Running balance after this compensation was applied.
    pub balance_after: Decimal,
}

/// The full unwind of a saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPlan {
    /// Compensations in the order they must be applied.
    pub log: Vec<CompensationEntry>,
    pub final_balance: Decimal,
}

/// Walk completed steps in strict reverse order, emitting one
/// compensating negative-delta entry per step and reducing the running
/// balance.
///
/// Reverse order is the only correct order: later steps may depend on
/// earlier steps' side effects, so they must be undone first.
///
/// # Examples
///
/// ```
/// use ledger_engine::workflow::saga::{saga_compensate, SagaStep};
/// use rust_decimal_macros::dec;
///
/// let steps = vec![
///     SagaStep::new("A", dec!(10)),
///     SagaStep::new("B", dec!(5)),
///     SagaStep::new("C", dec!(-2)),
/// ];
/// let plan = saga_compensate(&steps, dec!(100));
/// assert_eq!(plan.log[0].account.as_str(), "C");
/// assert_eq!(plan.final_balance, dec!(87));
/// ```
pub fn saga_compensate(completed_steps: &[SagaStep], initial_balance: Decimal) -> CompensationPlan {
    let mut balance = initial_balance;
    let mut log = Vec::with_capacity(completed_steps.len());

    for step in completed_steps.iter().rev() {
        balance -= step.delta;
        log.push(CompensationEntry {
            account: step.account.clone(),
            delta: -step.delta,
            balance_after: balance,
        });
    }

    CompensationPlan {
        log,
        final_balance: balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compensation_reverse_order_and_balance() {
        let steps = vec![
            SagaStep::new("A", dec!(10)),
            SagaStep::new("B", dec!(5)),
            SagaStep::new("C", dec!(-2)),
        ];
        let plan = saga_compensate(&steps, dec!(100));

        assert_eq!(plan.log.len(), 3);
        assert_eq!(plan.log[0].account.as_str(), "C");
        assert_eq!(plan.log[1].account.as_str(), "B");
        assert_eq!(plan.log[2].account.as_str(), "A");

        // 100 + 2 - 5 - 10
        assert_eq!(plan.final_balance, dec!(87));
    }

    #[test]
    fn test_compensation_negates_deltas() {
        let steps = vec![SagaStep::new("A", dec!(25)), SagaStep::new("B", dec!(-7))];
        let plan = saga_compensate(&steps, dec!(50));

        assert_eq!(plan.log[0].delta, dec!(7));
        assert_eq!(plan.log[1].delta, dec!(-25));
    }

    #[test]
    fn test_compensation_running_balance_recorded() {
        let steps = vec![SagaStep::new("A", dec!(10)), SagaStep::new("B", dec!(5))];
        let plan = saga_compensate(&steps, dec!(100));

        assert_eq!(plan.log[0].balance_after, dec!(95));
        assert_eq!(plan.log[1].balance_after, dec!(85));
        assert_eq!(plan.final_balance, dec!(85));
    }

    #[test]
    fn test_compensation_empty_saga() {
        let plan = saga_compensate(&[], dec!(42));
        assert!(plan.log.is_empty());
        assert_eq!(plan.final_balance, dec!(42));
    }

    #[test]
    fn test_full_unwind_restores_initial_balance() {
        // Balance tracked from zero through the steps, then unwound.
        let steps = vec![
            SagaStep::new("A", dec!(3)),
            SagaStep::new("B", dec!(-8)),
            SagaStep::new("C", dec!(21)),
        ];
        let applied: Decimal = steps.iter().map(|s| s.delta).sum();
        let plan = saga_compensate(&steps, dec!(100) + applied);
        assert_eq!(plan.final_balance, dec!(100));
    }
}
