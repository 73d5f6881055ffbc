use serde::{Deserialize, Serialize};

/// Consecutive failures at which the circuit opens.
pub const FAILURE_THRESHOLD: usize = 5;

/// Exponent cap on the retry backoff multiplier (`2^6`).
pub const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Outcome of one guarded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// True when the trailing run of consecutive failures has reached
/// [`FAILURE_THRESHOLD`]. An open circuit is a signal, not an error:
/// callers must stop submitting and re-check before retrying.
///
/// # Examples
///
/// ```
/// use ledger_engine::resilience::breaker::{circuit_open, AttemptOutcome::*};
///
/// assert!(!circuit_open(&[Failure, Failure, Failure, Failure]));
/// assert!(circuit_open(&[Failure, Failure, Failure, Failure, Failure]));
/// assert!(!circuit_open(&[Failure, Failure, Failure, Failure, Success]));
/// ```
pub fn circuit_open(recent: &[AttemptOutcome]) -> bool {
    let trailing_failures = recent
        .iter()
        .rev()
        .take_while(|o| **o == AttemptOutcome::Failure)
        .count();
    trailing_failures >= FAILURE_THRESHOLD
}

/// Exponential retry backoff in milliseconds, with the multiplier capped
/// at `2^6` to bound the maximum delay.
pub fn retry_backoff_ms(attempt: u32, base_ms: u64) -> u64 {
    let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
    base_ms.saturating_mul(1u64 << exponent)
}
