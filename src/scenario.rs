//! Scenario generation for stress testing the pipeline and replay paths.
//!
//! Generates random settlement batches and event streams with realistic
//! shape: mixed credit/debit deltas, unique idempotency keys, and
//! mostly-increasing versions.

use crate::core::entry::SettlementRequest;
use crate::core::event::Event;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random scenario.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of distinct accounts.
    pub account_count: usize,
    /// Number of settlement requests / events to generate.
    pub entry_count: usize,
    /// Maximum absolute delta, in whole units.
    pub max_amount: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            account_count: 10,
            entry_count: 50,
            max_amount: 1_000_000,
        }
    }
}

/// Generate a random settlement batch.
pub fn generate_requests(config: &ScenarioConfig) -> Vec<SettlementRequest> {
    let mut rng = rand::thread_rng();
    (0..config.entry_count)
        .map(|_| {
            let account = format!("ACC-{:03}", rng.gen_range(0..config.account_count.max(1)));
            let magnitude = Decimal::from(rng.gen_range(1..=config.max_amount.max(1)));
            let delta = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            SettlementRequest::new(account, delta)
        })
        .collect()
}

/// Generate a random event stream with unique idempotency keys and
/// monotonically increasing versions.
pub fn generate_events(config: &ScenarioConfig) -> Vec<Event> {
    let mut rng = rand::thread_rng();
    (0..config.entry_count as u64)
        .map(|i| {
            let gross = Decimal::from(rng.gen_range(1..=config.max_amount.max(1)));
            let net = gross * Decimal::new(9, 1); // 90% of gross
            Event::new(i + 1, format!("evt-{i:06}"), gross, net)
        })
        .collect()
}
