//! Pure risk predicates: leverage, margin, and exposure tiering.
//!
//! All functions are total. Degenerate inputs are clamped rather than
//! rejected, so the settlement pipeline can call these on running totals
//! without wrapping every call in error handling.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Minimum collateral used in leverage ratios. Guards division by zero.
pub const COLLATERAL_EPSILON: Decimal = dec!(0.000001);

/// Ordered exposure bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

/// True when gross exposure strictly exceeds the leverage cap.
///
/// Collateral is floored to [`COLLATERAL_EPSILON`]. Sitting exactly at the
/// cap is not a breach.
///
/// # Examples
///
/// ```
/// use ledger_engine::risk::limit_breached;
/// use rust_decimal_macros::dec;
///
/// assert!(!limit_breached(dec!(100), dec!(10), dec!(10)));
/// assert!(limit_breached(dec!(101), dec!(10), dec!(10)));
/// ```
pub fn limit_breached(gross: Decimal, collateral: Decimal, leverage_cap: Decimal) -> bool {
    let collateral = collateral.max(COLLATERAL_EPSILON);
    gross / collateral > leverage_cap
}

/// True when mark-to-market has fallen below the maintenance margin.
pub fn margin_call(mark_to_market: Decimal, maintenance_margin: Decimal) -> bool {
    mark_to_market < maintenance_margin
}

/// Classify an exposure ratio into one of four ordered bands:
/// `< 2` low, `< 5` medium, `< 10` high, otherwise critical.
pub fn risk_tier(exposure_ratio: Decimal) -> RiskTier {
    if exposure_ratio < dec!(2) {
        RiskTier::Low
    } else if exposure_ratio < dec!(5) {
        RiskTier::Medium
    } else if exposure_ratio < dec!(10) {
        RiskTier::High
    } else {
        RiskTier::Critical
    }
}
