use crate::core::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed movement on an account's position.
///
/// This is the atomic unit of the clearing ledger. Entries are immutable
/// once recorded; the settlement pipeline consumes batches of them and the
/// reconciliation module cross-checks them against an independent
/// observation feed.
///
/// # Examples
///
/// ```
/// use ledger_engine::core::entry::LedgerEntry;
/// use ledger_engine::core::account::AccountId;
/// use rust_decimal_macros::dec;
///
/// let entry = LedgerEntry::new(AccountId::new("ACC-ALPHA"), dec!(250.75));
/// assert_eq!(entry.delta(), dec!(250.75));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    id: Uuid,
    /// The account whose position moves.
    account: AccountId,
    /// Signed amount. Positive credits, negative debits.
    delta: Decimal,
    /// When this entry was recorded, if known.
    timestamp: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    pub fn new(account: AccountId, delta: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            account,
            delta,
            timestamp: None,
        }
    }

    /// Create an entry with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, account: AccountId, delta: Decimal) -> Self {
        Self {
            id,
            account,
            delta,
            timestamp: None,
        }
    }

    /// Set the record timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn delta(&self) -> Decimal {
        self.delta
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// A raw inbound settlement request, before validation.
///
/// Unlike [`LedgerEntry`], a request can be malformed: the account may be
/// empty, the delta missing or zero. The pipeline's validation stage turns
/// well-formed requests into entries and rejects the rest without aborting
/// the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub account: String,
    #[serde(default)]
    pub delta: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SettlementRequest {
    pub fn new(account: impl Into<String>, delta: Decimal) -> Self {
        Self {
            account: account.into(),
            delta: Some(delta),
            timestamp: None,
        }
    }

    /// The reason this request fails validation, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.account.trim().is_empty() {
            return Some("missing account");
        }
        match self.delta {
            None => Some("missing delta"),
            Some(d) if d == Decimal::ZERO => Some("zero delta"),
            Some(_) => None,
        }
    }

    /// The raw delta this request carries toward exposure tracking.
    /// Malformed requests with no delta contribute nothing.
    pub fn raw_delta(&self) -> Decimal {
        self.delta.unwrap_or(Decimal::ZERO)
    }
}
