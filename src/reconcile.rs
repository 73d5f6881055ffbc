//! Windowed reconciliation of expected against observed entries.
//!
//! The settlement pipeline's outputs are periodically cross-checked
//! against an independent observation feed. Entries are bucketed by time
//! window; inside a bucket each expected entry may consume at most one
//! observed entry on the same account within tolerance. Matching never
//! crosses bucket boundaries.

use crate::core::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from reconciliation configuration.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("window size must be positive, got {window_size}")]
    InvalidWindow { window_size: i64 },
}

/// An entry on either side of a reconciliation: the expectation derived
/// from our own ledger, or the independent observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconEntry {
    pub account: AccountId,
    pub amount: Decimal,
    /// Numeric timestamp; bucketed by integer division with the window size.
    pub ts: i64,
}

impl ReconEntry {
    pub fn new(account: impl Into<String>, amount: Decimal, ts: i64) -> Self {
        Self {
            account: AccountId::new(account),
            amount,
            ts,
        }
    }
}

/// Per-window reconciliation tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationBucket {
    pub matches: usize,
    pub breaks: usize,
    pub unmatched_observed: usize,
}

/// Direction of a systematic observation bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasDirection {
    OverObserved,
    UnderObserved,
}

/// Mean signed difference between paired expected and observed amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasReport {
    pub bias: Decimal,
    pub direction: BiasDirection,
    pub count: usize,
}

/// True when `observed` differs from `expected` by more than
/// `tolerance_bps` basis points, relative to the larger of `|expected|`
/// and 1 (which keeps a zero expectation from dividing by zero).
pub fn mismatch(expected: Decimal, observed: Decimal, tolerance_bps: Decimal) -> bool {
    let reference = expected.abs().max(Decimal::ONE);
    let diff_bps = (expected - observed).abs() / reference * Decimal::from(10_000);
    diff_bps > tolerance_bps
}

/// Group both entry sets by `ts div window_size` and match within each
/// bucket: each expected entry consumes at most one unconsumed observed
/// entry on the same account within tolerance. Unmatched expected entries
/// count as breaks; observed entries never consumed count as
/// `unmatched_observed`.
pub fn windowed_reconciliation(
    expected: &[ReconEntry],
    observed: &[ReconEntry],
    window_size: i64,
    tolerance_bps: Decimal,
) -> Result<BTreeMap<i64, ReconciliationBucket>, ReconcileError> {
    if window_size <= 0 {
        return Err(ReconcileError::InvalidWindow { window_size });
    }

    let mut expected_by_bucket: BTreeMap<i64, Vec<&ReconEntry>> = BTreeMap::new();
    for entry in expected {
        expected_by_bucket
            .entry(entry.ts.div_euclid(window_size))
            .or_default()
            .push(entry);
    }

    let mut observed_by_bucket: BTreeMap<i64, Vec<&ReconEntry>> = BTreeMap::new();
    for entry in observed {
        observed_by_bucket
            .entry(entry.ts.div_euclid(window_size))
            .or_default()
            .push(entry);
    }

    let mut buckets: BTreeMap<i64, ReconciliationBucket> = BTreeMap::new();

    for (&bucket_key, bucket_expected) in &expected_by_bucket {
        let bucket = buckets.entry(bucket_key).or_default();
        let mut candidates: Vec<&ReconEntry> = observed_by_bucket
            .get(&bucket_key)
            .cloned()
            .unwrap_or_default();

        for exp in bucket_expected {
            let found = candidates.iter().position(|obs| {
                obs.account == exp.account && !mismatch(exp.amount, obs.amount, tolerance_bps)
            });
            match found {
                Some(idx) => {
                    // Consumed: at most one match per observed entry.
                    candidates.remove(idx);
                    bucket.matches += 1;
                }
                None => bucket.breaks += 1,
            }
        }
        bucket.unmatched_observed = candidates.len();
    }

    // Buckets with only observed entries still surface as unmatched.
    for (&bucket_key, bucket_observed) in &observed_by_bucket {
        buckets
            .entry(bucket_key)
            .or_insert_with(|| ReconciliationBucket {
                matches: 0,
                breaks: 0,
                unmatched_observed: bucket_observed.len(),
            });
    }

    Ok(buckets)
}

/// Mean signed difference between paired amounts (`observed - expected`).
/// Pairs beyond the shorter slice are ignored. Returns `None` when there
/// are no pairs to compare.
pub fn detect_systematic_bias(expected: &[ReconEntry], observed: &[ReconEntry]) -> Option<BiasReport> {
    let count = expected.len().min(observed.len());
    if count == 0 {
        return None;
    }

    let sum: Decimal = expected
        .iter()
        .zip(observed.iter())
        .map(|(e, o)| o.amount - e.amount)
        .sum();
    let bias = sum / Decimal::from(count as u64);

    Some(BiasReport {
        bias,
        direction: if bias > Decimal::ZERO {
            BiasDirection::OverObserved
        } else {
            BiasDirection::UnderObserved
        },
        count,
    })
}
