use serde::{Deserialize, Serialize};

use crate::distribution::params::{
    DistributionModel, DistributionStatistics, InvestmentDistributionParams,
};
use crate::error::InvestDistError;
use crate::special::normal_inverse_cdf;
use crate::types::Money;
use crate::InvestDistResult;

/// Lowest threshold callers should pass to `worst_case_outcome`.
pub const MIN_PROBABILITY_THRESHOLD: f64 = 0.1;
/// Highest threshold callers should pass to `worst_case_outcome`.
pub const MAX_PROBABILITY_THRESHOLD: f64 = 99.9;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Asset value at the lower-tail cut-off for a probability threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorstCaseOutcome {
    /// Share of outcomes considered, in percent (90 = "9 times out of 10").
    pub probability_threshold: f64,
    /// `1 - threshold / 100`: the mass left below `asset_value`.
    pub tail_probability: f64,
    pub z_score: f64,
    pub asset_value: Money,
    /// `asset_value - initial_assets`. Negative is a loss.
    pub loss_or_gain: Money,
}

/// Analytical percentile summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileLadder {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clamp a UI threshold into the range the inverse CDF can resolve.
pub fn clamp_probability_threshold(threshold: f64) -> f64 {
    threshold.clamp(MIN_PROBABILITY_THRESHOLD, MAX_PROBABILITY_THRESHOLD)
}

/// Value at standard-normal score `z` under the model in `stats`.
fn value_at_z(stats: &DistributionStatistics, z: f64) -> InvestDistResult<f64> {
    match stats.model {
        DistributionModel::Normal => Ok((stats.mean + z * stats.std_dev).max(0.0)),
        DistributionModel::Lognormal => {
            let (log_mean, log_std_dev) = stats.log_params()?;
            Ok((log_mean + z * log_std_dev).exp())
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value below which `percentile`% of outcomes fall. `percentile` must lie
/// strictly inside (0, 100).
pub fn percentile_value(stats: &DistributionStatistics, percentile: f64) -> InvestDistResult<f64> {
    let z = normal_inverse_cdf(percentile / 100.0)?;
    value_at_z(stats, z)
}

pub fn percentile_ladder(stats: &DistributionStatistics) -> InvestDistResult<PercentileLadder> {
    Ok(PercentileLadder {
        p5: percentile_value(stats, 5.0)?,
        p10: percentile_value(stats, 10.0)?,
        p25: percentile_value(stats, 25.0)?,
        p50: percentile_value(stats, 50.0)?,
        p75: percentile_value(stats, 75.0)?,
        p90: percentile_value(stats, 90.0)?,
        p95: percentile_value(stats, 95.0)?,
    })
}

/// Worst case "at `probability_threshold`% confidence".
///
/// The complementary tail `1 - threshold/100` is mapped through the inverse
/// CDF. A threshold of exactly 0 or 100 has no finite answer and fails with
/// `InvalidProbability`; use [`clamp_probability_threshold`] beforehand.
pub fn worst_case_outcome(
    params: &InvestmentDistributionParams,
    stats: &DistributionStatistics,
    probability_threshold: f64,
) -> InvestDistResult<WorstCaseOutcome> {
    if !(0.0..=100.0).contains(&probability_threshold) {
        return Err(InvestDistError::InvalidInput {
            field: "probability_threshold".into(),
            reason: "Must be between 0 and 100".into(),
        });
    }

    let tail_probability = 1.0 - probability_threshold / 100.0;
    let z_score = normal_inverse_cdf(tail_probability)?;
    let asset_value = value_at_z(stats, z_score)?;

    Ok(WorstCaseOutcome {
        probability_threshold,
        tail_probability,
        z_score,
        asset_value,
        loss_or_gain: asset_value - params.initial_assets,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::params::derive_statistics;

    fn params(risk: f64) -> InvestmentDistributionParams {
        InvestmentDistributionParams {
            initial_assets: 1_000_000.0,
            expected_return: 5.0,
            risk,
            years: 10.0,
        }
    }

    fn worst(model: DistributionModel, risk: f64, threshold: f64) -> WorstCaseOutcome {
        let p = params(risk);
        let s = derive_statistics(&p, model).unwrap();
        worst_case_outcome(&p, &s, threshold).unwrap()
    }

    #[test]
    fn test_zero_risk_equals_deterministic_mean() {
        for model in [DistributionModel::Normal, DistributionModel::Lognormal] {
            let p = params(0.0);
            let s = derive_statistics(&p, model).unwrap();
            let w = worst_case_outcome(&p, &s, 90.0).unwrap();
            assert!((w.asset_value - s.mean).abs() < 1e-6, "{model:?}");
            assert!(w.loss_or_gain > 0.0);
        }
    }

    #[test]
    fn test_loss_decreases_with_risk() {
        for model in [DistributionModel::Normal, DistributionModel::Lognormal] {
            let mut prev = worst(model, 0.0, 90.0).loss_or_gain;
            for risk in [2.0, 5.0, 10.0, 15.0, 20.0] {
                let cur = worst(model, risk, 90.0).loss_or_gain;
                assert!(cur < prev, "{model:?} risk={risk}: {cur} !< {prev}");
                prev = cur;
            }
        }
    }

    #[test]
    fn test_normal_worst_case_formula() {
        let p = params(18.0);
        let s = derive_statistics(&p, DistributionModel::Normal).unwrap();
        let w = worst_case_outcome(&p, &s, 90.0).unwrap();
        // z(0.10) ≈ -1.2815516
        assert!((w.z_score + 1.281_551_6).abs() < 1e-5);
        assert!((w.tail_probability - 0.1).abs() < 1e-12);
        assert!((w.asset_value - (s.mean + w.z_score * s.std_dev)).abs() < 1e-6);
        assert!((w.loss_or_gain - (w.asset_value - 1_000_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_normal_worst_case_clipped_at_zero() {
        let p = params(60.0);
        let s = derive_statistics(&p, DistributionModel::Normal).unwrap();
        let w = worst_case_outcome(&p, &s, 99.0).unwrap();
        assert_eq!(w.asset_value, 0.0);
        assert_eq!(w.loss_or_gain, -1_000_000.0);
    }

    #[test]
    fn test_lognormal_worst_case_never_negative() {
        let w = worst(DistributionModel::Lognormal, 80.0, 99.9);
        assert!(w.asset_value > 0.0);
    }

    #[test]
    fn test_gain_possible_at_low_threshold() {
        // 50% threshold lands on the median, which beats the start for r > sigma^2/2
        let w = worst(DistributionModel::Lognormal, 10.0, 50.0);
        assert!(w.loss_or_gain > 0.0);
    }

    #[test]
    fn test_threshold_bounds_are_not_clamped() {
        let p = params(15.0);
        let s = derive_statistics(&p, DistributionModel::Lognormal).unwrap();
        assert!(matches!(
            worst_case_outcome(&p, &s, 100.0),
            Err(InvestDistError::InvalidProbability(_))
        ));
        assert!(matches!(
            worst_case_outcome(&p, &s, 0.0),
            Err(InvestDistError::InvalidProbability(_))
        ));
        assert!(matches!(
            worst_case_outcome(&p, &s, 120.0),
            Err(InvestDistError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_clamp_threshold() {
        assert_eq!(clamp_probability_threshold(100.0), 99.9);
        assert_eq!(clamp_probability_threshold(0.0), 0.1);
        assert_eq!(clamp_probability_threshold(90.0), 90.0);
    }

    #[test]
    fn test_ladder_is_ordered_and_median_is_exp_log_mean() {
        let p = params(15.0);
        let s = derive_statistics(&p, DistributionModel::Lognormal).unwrap();
        let l = percentile_ladder(&s).unwrap();
        let v = [l.p5, l.p10, l.p25, l.p50, l.p75, l.p90, l.p95];
        assert!(v.windows(2).all(|w| w[0] < w[1]));
        assert!((l.p50 - s.log_mean.unwrap().exp()).abs() < 1e-3);
    }

    #[test]
    fn test_worst_case_matches_ladder() {
        let p = params(15.0);
        let s = derive_statistics(&p, DistributionModel::Normal).unwrap();
        let l = percentile_ladder(&s).unwrap();
        let w = worst_case_outcome(&p, &s, 90.0).unwrap();
        assert!((w.asset_value - l.p10).abs() < 1e-6);
    }
}
