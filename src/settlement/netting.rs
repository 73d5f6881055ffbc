use crate::core::account::AccountId;
use crate::core::entry::LedgerEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decimal places used when withholding reserves.
pub const RESERVE_PRECISION: u32 = 6;

/// Net position of each account: the sum of its signed deltas.
///
/// Positions are derived, recomputed per batch, and never partially
/// mutated — a `NetPositions` is always rebuilt from the entry set it
/// summarizes.
///
/// # Examples
///
/// ```
/// use ledger_engine::core::account::AccountId;
/// use ledger_engine::core::entry::LedgerEntry;
/// use ledger_engine::settlement::netting::net_positions;
/// use rust_decimal_macros::dec;
///
/// let entries = vec![
///     LedgerEntry::new(AccountId::new("A"), dec!(100)),
///     LedgerEntry::new(AccountId::new("A"), dec!(-40)),
/// ];
/// let net = net_positions(&entries);
/// assert_eq!(net.position(&AccountId::new("A")), dec!(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPositions {
    positions: HashMap<AccountId, Decimal>,
}

impl NetPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one signed delta into an account's position.
    pub fn accumulate(&mut self, account: AccountId, delta: Decimal) {
        *self.positions.entry(account).or_insert(Decimal::ZERO) += delta;
    }

    /// Net position of an account. Unknown accounts are flat.
    pub fn position(&self, account: &AccountId) -> Decimal {
        self.positions
            .get(account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn all_positions(&self) -> &HashMap<AccountId, Decimal> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total absolute exposure across all accounts (sum of |position|).
    pub fn gross_exposure(&self) -> Decimal {
        self.positions.values().map(|v| v.abs()).sum()
    }
}

/// Sum deltas per account. Addition is commutative, so no ordering
/// requirement; an empty batch yields an empty mapping.
pub fn net_positions(entries: &[LedgerEntry]) -> NetPositions {
    let mut net = NetPositions::new();
    for entry in entries {
        net.accumulate(entry.account().clone(), entry.delta());
    }
    net
}

/// Withhold `|position| * reserve_ratio` from every position, preserving
/// sign and rounding to [`RESERVE_PRECISION`] decimal places so repeated
/// application cannot drift.
pub fn apply_reserve(net: &NetPositions, reserve_ratio: Decimal) -> NetPositions {
    let mut reserved = NetPositions::new();
    for (account, value) in net.all_positions() {
        let withheld = (value.abs() * reserve_ratio).round_dp(RESERVE_PRECISION);
        let after = if *value >= Decimal::ZERO {
            value - withheld
        } else {
            value + withheld
        };
        reserved.accumulate(account.clone(), after);
    }
    reserved
}
