//! Admission control and fair multi-queue draining.
//!
//! These policies push backpressure onto callers: admission tightens as
//! failure bursts grow, and draining guarantees small queues are never
//! starved by a monopolizing large one.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Failure-burst threshold for the most restrictive admission tier.
pub const SEVERE_BURST: u32 = 6;

/// Failure-burst threshold for the intermediate admission tier.
pub const ELEVATED_BURST: u32 = 3;

/// How much concurrent settlement work is admitted under load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    pub max_inflight: usize,
    pub drop_oldest: bool,
}

/// Select the admission policy for the current failure burst:
/// `>= 6` most restrictive, `>= 3` intermediate, otherwise permissive.
pub fn next_policy(failure_burst: u32) -> AdmissionPolicy {
    if failure_burst >= SEVERE_BURST {
        AdmissionPolicy {
            max_inflight: 1,
            drop_oldest: true,
        }
    } else if failure_burst >= ELEVATED_BURST {
        AdmissionPolicy {
            max_inflight: 4,
            drop_oldest: true,
        }
    } else {
        AdmissionPolicy {
            max_inflight: 16,
            drop_oldest: false,
        }
    }
}

/// A prioritized work queue.
#[derive(Debug, Clone)]
pub struct WorkQueue<T> {
    pub priority: i32,
    pub items: VecDeque<T>,
}

impl<T> WorkQueue<T> {
    pub fn new(priority: i32, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            priority,
            items: items.into_iter().collect(),
        }
    }
}

/// Drain queues in descending priority order, taking at most
/// `per_queue_max` items per queue per round, looping rounds until the
/// budget is exhausted or a full round yields nothing.
///
/// The round cap is the fairness guarantee: a monopolizing high-priority
/// queue cannot starve small queues when `per_queue_max` is small
/// relative to its backlog, and the empty-round exit guarantees
/// termination.
pub fn priority_drain_with_fairness<T>(
    queues: &mut [WorkQueue<T>],
    budget: usize,
    per_queue_max: usize,
) -> Vec<T> {
    let mut drained = Vec::new();
    if budget == 0 || per_queue_max == 0 {
        return drained;
    }

    queues.sort_by(|a, b| b.priority.cmp(&a.priority));

    let mut remaining = budget;
    loop {
        let mut yielded_this_round = 0;
        for queue in queues.iter_mut() {
            let mut taken = 0;
            while taken < per_queue_max && remaining > 0 {
                match queue.items.pop_front() {
                    Some(item) => {
                        drained.push(item);
                        taken += 1;
                        remaining -= 1;
                    }
                    None => break,
                }
            }
            yielded_this_round += taken;
            if remaining == 0 {
                return drained;
            }
        }
        if yielded_this_round == 0 {
            return drained;
        }
    }
}
