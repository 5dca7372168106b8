use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::distribution::curve::{
    default_num_points, default_span_std_devs, generate_density_curve, CurveOptions, DensityCurve,
};
use crate::distribution::density::normal_cdf_general;
use crate::distribution::params::{
    derive_statistics, DistributionModel, DistributionStatistics, InvestmentDistributionParams,
};
use crate::distribution::worst_case::{
    clamp_probability_threshold, percentile_ladder, worst_case_outcome, PercentileLadder,
    WorstCaseOutcome,
};
use crate::error::InvestDistError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::InvestDistResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything needed to render one distribution page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionAnalysisInput {
    pub initial_assets: Money,
    pub expected_return: Percent,
    pub risk: Percent,
    pub years: Years,
    #[serde(default = "default_model")]
    pub model: DistributionModel,
    /// Percent of outcomes the worst case must cover (e.g. 90).
    #[serde(default = "default_probability_threshold")]
    pub probability_threshold: f64,
    #[serde(default = "default_num_points")]
    pub num_points: usize,
    #[serde(default = "default_span_std_devs")]
    pub span_std_devs: f64,
}

fn default_model() -> DistributionModel {
    DistributionModel::Lognormal
}

fn default_probability_threshold() -> f64 {
    90.0
}

impl DistributionAnalysisInput {
    pub fn params(&self) -> InvestmentDistributionParams {
        InvestmentDistributionParams {
            initial_assets: self.initial_assets,
            expected_return: self.expected_return,
            risk: self.risk,
            years: self.years,
        }
    }

    pub fn curve_options(&self) -> CurveOptions {
        CurveOptions {
            num_points: self.num_points,
            span_std_devs: self.span_std_devs,
        }
    }
}

/// Output of `analyze_distribution`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionAnalysis {
    pub statistics: DistributionStatistics,
    pub worst_case: WorstCaseOutcome,
    pub percentiles: PercentileLadder,
    /// Expected gain over the horizon (`mean - initial_assets`).
    pub expected_gain: Money,
    /// `None` when risk is zero and the outcome is certain.
    pub density_curve: Option<DensityCurve>,
}

/// Both models evaluated on the same input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComparison {
    pub normal: DistributionAnalysis,
    pub lognormal: DistributionAnalysis,
    /// `lognormal.worst_case.asset_value - normal.worst_case.asset_value`
    pub worst_case_difference: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_analysis(
    input: &DistributionAnalysisInput,
    model: DistributionModel,
    threshold: f64,
    warnings: &mut Vec<String>,
) -> InvestDistResult<DistributionAnalysis> {
    let params = input.params();
    let statistics = derive_statistics(&params, model)?;
    let worst_case = worst_case_outcome(&params, &statistics, threshold)?;

    let (percentiles, density_curve) = if statistics.is_degenerate() {
        warnings.push(format!(
            "{} model: risk is zero, terminal value is certain at {:.2}; density curve omitted",
            model.label(),
            statistics.mean
        ));
        let p = statistics.mean;
        let flat = PercentileLadder {
            p5: p,
            p10: p,
            p25: p,
            p50: p,
            p75: p,
            p90: p,
            p95: p,
        };
        (flat, None)
    } else {
        let curve = match generate_density_curve(&statistics, &input.curve_options()) {
            Ok(curve) => Some(curve),
            Err(InvestDistError::DegenerateDistribution { context }) => {
                warnings.push(format!(
                    "{} model: density curve omitted ({context})",
                    model.label()
                ));
                None
            }
            Err(e) => return Err(e),
        };
        (percentile_ladder(&statistics)?, curve)
    };

    if model == DistributionModel::Normal && !statistics.is_degenerate() {
        let below_zero = normal_cdf_general(0.0, statistics.mean, statistics.std_dev);
        if below_zero > 1e-4 {
            warnings.push(format!(
                "normal model places {:.2}% of outcomes below zero; \
                 curve and worst case are clipped at 0",
                below_zero * 100.0
            ));
        }
    }

    Ok(DistributionAnalysis {
        expected_gain: statistics.mean - params.initial_assets,
        statistics,
        worst_case,
        percentiles,
        density_curve,
    })
}

fn resolve_threshold(input: &DistributionAnalysisInput, warnings: &mut Vec<String>) -> f64 {
    let threshold = clamp_probability_threshold(input.probability_threshold);
    if threshold != input.probability_threshold {
        warnings.push(format!(
            "probability_threshold {} clamped to {}",
            input.probability_threshold, threshold
        ));
    }
    threshold
}

fn common_warnings(input: &DistributionAnalysisInput, warnings: &mut Vec<String>) {
    if input.expected_return < 0.0 {
        warnings.push(format!(
            "expected_return is negative ({}%): \
             the mean terminal value is below the initial amount",
            input.expected_return
        ));
    }
}

fn assumptions(input: &DistributionAnalysisInput, threshold: f64) -> serde_json::Value {
    serde_json::json!({
        "initial_assets": input.initial_assets,
        "expected_return_pct": input.expected_return,
        "risk_pct": input.risk,
        "years": input.years,
        "probability_threshold": threshold,
        "num_points": input.num_points,
        "span_std_devs": input.span_std_devs,
        "constant_parameters": true,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Statistics, worst case, percentile ladder and density curve for one model.
///
/// Out-of-range thresholds are clamped to [0.1, 99.9] with a warning.
pub fn analyze_distribution(
    input: &DistributionAnalysisInput,
) -> InvestDistResult<ComputationOutput<DistributionAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.params().validate()?;
    let threshold = resolve_threshold(input, &mut warnings);
    common_warnings(input, &mut warnings);

    let analysis = build_analysis(input, input.model, threshold, &mut warnings)?;

    let methodology = match input.model {
        DistributionModel::Normal => {
            "Normal approximation of terminal value (discrete compounding)"
        }
        DistributionModel::Lognormal => "Lognormal terminal value (continuous compounding, GBM)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &assumptions(input, threshold),
        warnings,
        elapsed,
        analysis,
    ))
}

/// Run both models on the same input. `input.model` is ignored.
pub fn compare_models(
    input: &DistributionAnalysisInput,
) -> InvestDistResult<ComputationOutput<ModelComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.params().validate()?;
    let threshold = resolve_threshold(input, &mut warnings);
    common_warnings(input, &mut warnings);

    let normal = build_analysis(input, DistributionModel::Normal, threshold, &mut warnings)?;
    let lognormal = build_analysis(input, DistributionModel::Lognormal, threshold, &mut warnings)?;
    let worst_case_difference = lognormal.worst_case.asset_value - normal.worst_case.asset_value;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Normal vs lognormal terminal value comparison",
        &assumptions(input, threshold),
        warnings,
        elapsed,
        ModelComparison {
            normal,
            lognormal,
            worst_case_difference,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_input() -> DistributionAnalysisInput {
        DistributionAnalysisInput {
            initial_assets: 5_000_000.0,
            expected_return: 5.0,
            risk: 15.0,
            years: 10.0,
            model: DistributionModel::Lognormal,
            probability_threshold: 90.0,
            num_points: 300,
            span_std_devs: 3.0,
        }
    }

    #[test]
    fn test_analysis_runs() {
        let out = analyze_distribution(&basic_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.statistics.model, DistributionModel::Lognormal);
        assert_eq!(r.density_curve.as_ref().unwrap().len(), 300);
        assert!(r.worst_case.asset_value < r.percentiles.p50);
        assert!((r.worst_case.asset_value - r.percentiles.p10).abs() < 1e-6);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.metadata.precision, "ieee754_f64");
    }

    #[test]
    fn test_threshold_clamped_with_warning() {
        let mut input = basic_input();
        input.probability_threshold = 100.0;
        let out = analyze_distribution(&input).unwrap();
        assert!((out.result.worst_case.probability_threshold - 99.9).abs() < 1e-12);
        assert!(out.warnings.iter().any(|w| w.contains("clamped")));
    }

    #[test]
    fn test_zero_risk_omits_curve() {
        let mut input = basic_input();
        input.risk = 0.0;
        let out = analyze_distribution(&input).unwrap();
        assert!(out.result.density_curve.is_none());
        assert_eq!(out.result.percentiles.p5, out.result.statistics.mean);
        assert!(out.warnings.iter().any(|w| w.contains("certain")));
    }

    #[test]
    fn test_normal_model_warns_about_negative_mass() {
        let mut input = basic_input();
        input.model = DistributionModel::Normal;
        input.risk = 40.0;
        let out = analyze_distribution(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("below zero")));
        assert!(out.result.density_curve.unwrap().x_min >= 0.0);
    }

    #[test]
    fn test_near_zero_risk_keeps_report_without_curve() {
        let mut input = basic_input();
        input.initial_assets = 1_000_000.0;
        input.risk = 1e-13;
        let out = compare_models(&input).unwrap();
        for analysis in [&out.result.normal, &out.result.lognormal] {
            assert!(analysis.density_curve.is_none());
            assert!(analysis.percentiles.p5 <= analysis.percentiles.p95);
        }
        assert_eq!(
            out.warnings.iter().filter(|w| w.contains("density curve omitted")).count(),
            2
        );
    }

    #[test]
    fn test_tiny_lognormal_position_keeps_statistics() {
        // log-space floor puts x_min at 1 while x_max falls below it
        let mut input = basic_input();
        input.initial_assets = 0.01;
        let out = analyze_distribution(&input).unwrap();
        let r = &out.result;
        assert!(r.density_curve.is_none());
        assert!(r.statistics.mean > 0.0);
        assert!(r.worst_case.asset_value > 0.0);
        assert!((r.worst_case.asset_value - r.percentiles.p10).abs() < 1e-12);
        assert!(out.warnings.iter().any(|w| w.contains("density curve omitted")));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut input = basic_input();
        input.years = 0.0;
        assert!(matches!(
            analyze_distribution(&input),
            Err(InvestDistError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_curve_options_rejected() {
        let mut input = basic_input();
        input.num_points = 1;
        assert!(analyze_distribution(&input).is_err());
    }

    #[test]
    fn test_compare_models() {
        let out = compare_models(&basic_input()).unwrap();
        let r = &out.result;
        assert_eq!(r.normal.statistics.model, DistributionModel::Normal);
        assert_eq!(r.lognormal.statistics.model, DistributionModel::Lognormal);
        // continuous compounding at the same nominal rate yields a higher mean
        assert!(r.lognormal.statistics.mean > r.normal.statistics.mean);
        assert!(
            (r.worst_case_difference
                - (r.lognormal.worst_case.asset_value - r.normal.worst_case.asset_value))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: DistributionAnalysisInput = serde_json::from_str(
            r#"{"initial_assets": 1000000, "expected_return": 7.5, "risk": 18, "years": 10}"#,
        )
        .unwrap();
        assert_eq!(input.model, DistributionModel::Lognormal);
        assert_eq!(input.probability_threshold, 90.0);
        assert_eq!(input.num_points, 300);
        assert_eq!(input.span_std_devs, 3.0);
    }
}
