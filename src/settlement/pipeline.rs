use crate::core::entry::SettlementRequest;
use crate::risk;
use crate::settlement::fees::FeeSchedule;
use crate::settlement::netting::RESERVE_PRECISION;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terminal status of one processed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Failed validation: missing account, missing delta, or zero delta.
    Rejected,
    /// Running exposure breached the leverage cap at this entry.
    RiskBlocked,
    /// Validated, risk-checked, fee charged, reserve withheld.
    Settled,
}

/// Outcome of one request, immutable once emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    pub account: String,
    pub status: SettlementStatus,
    /// Why the request was rejected or blocked, when it was.
    pub reason: Option<String>,
    /// Settled delta after reserve withholding. Zero unless settled.
    pub net: Decimal,
    /// Fee charged. Zero unless settled.
    pub fee: Decimal,
    /// Batch gross exposure after this entry, including its raw delta.
    pub running_gross: Decimal,
}

/// Outcome of a full pipeline run over one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub results: Vec<SettlementResult>,
    /// Total gross exposure across the batch, rejected entries included.
    pub final_gross: Decimal,
    /// Total raw net across the batch, rejected entries included.
    pub final_net: Decimal,
}

impl PipelineOutcome {
    pub fn settled_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == SettlementStatus::Settled)
            .count()
    }

    /// Sum of settled nets after reserves.
    pub fn settled_net(&self) -> Decimal {
        self.results.iter().map(|r| r.net).sum()
    }

    /// Total fees charged across the batch.
    pub fn total_fees(&self) -> Decimal {
        self.results.iter().map(|r| r.fee).sum()
    }
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Outcome ===")?;
        writeln!(f, "Entries:      {}", self.results.len())?;
        writeln!(f, "Settled:      {}", self.settled_count())?;
        writeln!(f, "Final Gross:  {}", self.final_gross)?;
        writeln!(f, "Final Net:    {}", self.final_net)?;
        writeln!(f, "Settled Net:  {}", self.settled_net())?;
        writeln!(f, "Total Fees:   {}", self.total_fees())?;
        for result in &self.results {
            writeln!(
                f,
                "  {:<16} {:?} net={} fee={} gross={}",
                result.account, result.status, result.net, result.fee, result.running_gross
            )?;
        }
        Ok(())
    }
}

/// Configuration for one pipeline run.
///
/// Collateral is posted per batch and checked against *running* gross
/// exposure, so the risk decision for entry `k` depends on entries
/// `1..=k`. Processing order must equal submission order.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of each settled delta withheld as reserve.
    pub reserve_ratio: Decimal,
    /// Maximum allowed gross / collateral ratio.
    pub leverage_cap: Decimal,
    /// Collateral posted against this batch.
    pub collateral: Decimal,
    /// Progressive fee schedule.
    pub fee_schedule: FeeSchedule,
}

/// Four-stage settlement pipeline: validate, risk-check, fee, reserve.
///
/// A single entry's rejection or risk block never aborts the batch.
/// Rejected and blocked entries still contribute their raw delta to the
/// running gross/net totals — they count toward exposure tracking, not
/// toward settled value — so downstream risk decisions see them.
pub struct SettlementPipeline {
    config: PipelineConfig,
}

impl SettlementPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a batch in submission order.
    pub fn process(&self, requests: &[SettlementRequest]) -> PipelineOutcome {
        let mut results = Vec::with_capacity(requests.len());
        let mut running_gross = Decimal::ZERO;
        let mut running_net = Decimal::ZERO;

        for request in requests {
            let raw = request.raw_delta();
            running_gross += raw.abs();
            running_net += raw;

            // Stage 1: validate.
            if let Some(reason) = request.validation_error() {
                debug!("rejected {}: {}", request.account, reason);
                results.push(SettlementResult {
                    account: request.account.clone(),
                    status: SettlementStatus::Rejected,
                    reason: Some(reason.to_string()),
                    net: Decimal::ZERO,
                    fee: Decimal::ZERO,
                    running_gross,
                });
                continue;
            }

            // Stage 2: risk-check against the running gross, not this entry alone.
            if risk::limit_breached(running_gross, self.config.collateral, self.config.leverage_cap)
            {
                debug!(
                    "risk blocked {}: gross {} exceeds cap",
                    request.account, running_gross
                );
                results.push(SettlementResult {
                    account: request.account.clone(),
                    status: SettlementStatus::RiskBlocked,
                    reason: Some("leverage cap breached".to_string()),
                    net: Decimal::ZERO,
                    fee: Decimal::ZERO,
                    running_gross,
                });
                continue;
            }

            // Stage 3: fee on the entry's magnitude.
            let fee = self.config.fee_schedule.tiered_fee(raw);

            // Stage 4: reserve withholding, fixed precision.
            let withheld = (raw.abs() * self.config.reserve_ratio).round_dp(RESERVE_PRECISION);
            let net = if raw >= Decimal::ZERO {
                raw - withheld
            } else {
                raw + withheld
            };

            results.push(SettlementResult {
                account: request.account.clone(),
                status: SettlementStatus::Settled,
                reason: None,
                net,
                fee,
                running_gross,
            });
        }

        PipelineOutcome {
            results,
            final_gross: running_gross,
            final_net: running_net,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::fees::FeeTier;
    use rust_decimal_macros::dec;

    fn config() -> PipelineConfig {
        PipelineConfig {
            reserve_ratio: dec!(0.1),
            leverage_cap: dec!(10),
            collateral: dec!(100),
            fee_schedule: FeeSchedule::new(vec![FeeTier::new(dec!(1000), dec!(0.01))]).unwrap(),
        }
    }

    #[test]
    fn test_all_stages_settle() {
        let pipeline = SettlementPipeline::new(config());
        let outcome = pipeline.process(&[SettlementRequest::new("ACC-A", dec!(100))]);

        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.status, SettlementStatus::Settled);
        assert_eq!(result.fee, dec!(1));
        assert_eq!(result.net, dec!(90));
        assert_eq!(outcome.final_gross, dec!(100));
        assert_eq!(outcome.final_net, dec!(100));
    }

    #[test]
    fn test_rejection_does_not_abort_batch() {
        let pipeline = SettlementPipeline::new(config());
        let outcome = pipeline.process(&[
            SettlementRequest::new("", dec!(50)),
            SettlementRequest::new("ACC-B", dec!(30)),
        ]);

        assert_eq!(outcome.results[0].status, SettlementStatus::Rejected);
        assert_eq!(outcome.results[1].status, SettlementStatus::Settled);
        // Rejected entry still contributed its raw delta to exposure.
        assert_eq!(outcome.final_gross, dec!(80));
        assert_eq!(outcome.results[1].running_gross, dec!(80));
    }

    #[test]
    fn test_risk_block_halts_entry_not_batch() {
        let mut cfg = config();
        cfg.collateral = dec!(10); // cap 10 -> gross above 100 breaches
        let pipeline = SettlementPipeline::new(cfg);

        let outcome = pipeline.process(&[
            SettlementRequest::new("ACC-A", dec!(100)),
            SettlementRequest::new("ACC-B", dec!(-1)),
            SettlementRequest::new("ACC-C", dec!(-1)),
        ]);

        // First entry sits exactly at the cap: not a breach.
        assert_eq!(outcome.results[0].status, SettlementStatus::Settled);
        // Second pushes running gross to 101: blocked.
        assert_eq!(outcome.results[1].status, SettlementStatus::RiskBlocked);
        // Third stays blocked too; the blocked delta still counted.
        assert_eq!(outcome.results[2].status, SettlementStatus::RiskBlocked);
        assert_eq!(outcome.final_gross, dec!(102));
    }

    #[test]
    fn test_running_gross_is_monotonic() {
        let pipeline = SettlementPipeline::new(config());
        let requests: Vec<SettlementRequest> = (1..=10)
            .map(|i| SettlementRequest::new(format!("ACC-{i}"), Decimal::from(i * 3 - 15)))
            .collect();

        let outcome = pipeline.process(&requests);
        let mut prev = Decimal::ZERO;
        for result in &outcome.results {
            assert!(result.running_gross >= prev);
            prev = result.running_gross;
        }
        assert_eq!(outcome.final_gross, prev);
    }

    #[test]
    fn test_order_preserved() {
        let pipeline = SettlementPipeline::new(config());
        let outcome = pipeline.process(&[
            SettlementRequest::new("ACC-1", dec!(10)),
            SettlementRequest::new("ACC-2", dec!(20)),
            SettlementRequest::new("ACC-3", dec!(30)),
        ]);
        let accounts: Vec<&str> = outcome.results.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(accounts, vec!["ACC-1", "ACC-2", "ACC-3"]);
    }

    #[test]
    fn test_empty_batch() {
        let pipeline = SettlementPipeline::new(config());
        let outcome = pipeline.process(&[]);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.final_gross, Decimal::ZERO);
        assert_eq!(outcome.final_net, Decimal::ZERO);
    }
}
