use crate::workflow::Authz;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sign-off in a multi-level approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub role: String,
    pub approved: bool,
    pub timestamp: DateTime<Utc>,
}

impl ApprovalRecord {
    pub fn new(role: impl Into<String>, approved: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: role.into(),
            approved,
            timestamp,
        }
    }
}

/// Validate a multi-level, temporally-ordered sign-off chain ahead of a
/// high-risk transition.
///
/// A chain is valid when every record is approved, timestamps never move
/// backwards, and role rank (per the injected [`Authz`]) never decreases —
/// junior roles sign before senior ones. An empty chain is invalid:
/// high-risk transitions require at least one sign-off.
pub fn approval_chain_valid(records: &[ApprovalRecord], authz: &dyn Authz) -> bool {
    if records.is_empty() {
        return false;
    }
    if records.iter().any(|r| !r.approved) {
        return false;
    }
    for pair in records.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return false;
        }
        if authz.role_rank(&pair[1].role) < authz.role_rank(&pair[0].role) {
            return false;
        }
    }
    true
}
