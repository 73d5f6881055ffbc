use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from fee schedule construction.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error("fee tiers must be sorted ascending by limit: {prev} then {next}")]
    UnsortedTiers { prev: Decimal, next: Decimal },
    #[error("fee rate must be non-negative, got {rate}")]
    NegativeRate { rate: Decimal },
    #[error("fee schedule requires at least one tier")]
    Empty,
}

/// One band of a progressive fee schedule: amounts up to `limit`
/// (cumulative) are charged at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub limit: Decimal,
    pub rate: Decimal,
}

impl FeeTier {
    pub fn new(limit: Decimal, rate: Decimal) -> Self {
        Self { limit, rate }
    }
}

/// A validated, ascending-by-limit fee schedule.
///
/// Fees accrue per band: the slice of the amount falling inside each
/// tier's band is charged at that tier's rate, and any remainder beyond
/// the last limit is charged at the last tier's rate.
///
/// # Examples
///
/// ```
/// use ledger_engine::settlement::fees::{FeeSchedule, FeeTier};
/// use rust_decimal_macros::dec;
///
/// let schedule = FeeSchedule::new(vec![
///     FeeTier::new(dec!(100), dec!(0.01)),
///     FeeTier::new(dec!(1000), dec!(0.005)),
/// ]).unwrap();
///
/// // 100 * 0.01 + 400 * 0.005
/// assert_eq!(schedule.tiered_fee(dec!(500)), dec!(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    pub fn new(tiers: Vec<FeeTier>) -> Result<Self, FeeError> {
        if tiers.is_empty() {
            return Err(FeeError::Empty);
        }
        for tier in &tiers {
            if tier.rate < Decimal::ZERO {
                return Err(FeeError::NegativeRate { rate: tier.rate });
            }
        }
        for pair in tiers.windows(2) {
            if pair[1].limit <= pair[0].limit {
                return Err(FeeError::UnsortedTiers {
                    prev: pair[0].limit,
                    next: pair[1].limit,
                });
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Progressive fee on `amount`. Negative amounts are charged on
    /// magnitude; the result is never negative.
    pub fn tiered_fee(&self, amount: Decimal) -> Decimal {
        let mut remaining = amount.abs();
        let mut fee = Decimal::ZERO;
        let mut band_floor = Decimal::ZERO;

        for tier in &self.tiers {
            if remaining <= Decimal::ZERO {
                break;
            }
            let band_width = tier.limit - band_floor;
            let charged = remaining.min(band_width);
            fee += charged * tier.rate;
            remaining -= charged;
            band_floor = tier.limit;
        }

        // Remainder beyond the last limit at the last tier's rate.
        if remaining > Decimal::ZERO {
            if let Some(last) = self.tiers.last() {
                fee += remaining * last.rate;
            }
        }

        fee.max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn schedule() -> FeeSchedule {
        FeeSchedule::new(vec![
            FeeTier::new(dec!(100), dec!(0.01)),
            FeeTier::new(dec!(1000), dec!(0.005)),
            FeeTier::new(dec!(10000), dec!(0.001)),
        ])
        .unwrap()
    }

    #[test]
    fn test_fee_within_first_band() {
        assert_eq!(schedule().tiered_fee(dec!(50)), dec!(0.5));
    }

    #[test]
    fn test_fee_spans_bands() {
        // 100 * 0.01 + 400 * 0.005 = 1 + 2
        assert_eq!(schedule().tiered_fee(dec!(500)), dec!(3));
    }

    #[test]
    fn test_fee_remainder_at_last_rate() {
        // 100 * 0.01 + 900 * 0.005 + 9000 * 0.001 + 10000 * 0.001
        assert_eq!(schedule().tiered_fee(dec!(20000)), dec!(24.5));
    }

    #[test]
    fn test_fee_negative_amount_uses_magnitude() {
        assert_eq!(schedule().tiered_fee(dec!(-50)), dec!(0.5));
    }

    #[test]
    fn test_fee_zero_amount() {
        assert_eq!(schedule().tiered_fee(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_unsorted_tiers_rejected() {
        let result = FeeSchedule::new(vec![
            FeeTier::new(dec!(1000), dec!(0.005)),
            FeeTier::new(dec!(100), dec!(0.01)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = FeeSchedule::new(vec![FeeTier::new(dec!(100), dec!(-0.01))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_schedule_rejected() {
        assert!(FeeSchedule::new(vec![]).is_err());
    }
}
