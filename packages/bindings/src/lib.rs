use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use invest_dist_core::analysis::report::{self, DistributionAnalysisInput};
use invest_dist_core::distribution::curve::{self, CurveOptions};
use invest_dist_core::distribution::density;
use invest_dist_core::distribution::params::{
    self, DistributionModel, DistributionStatistics, InvestmentDistributionParams,
};
use invest_dist_core::distribution::worst_case;
use invest_dist_core::special;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Investment parameters plus the model to evaluate them under.
#[derive(Deserialize)]
struct ModelInput {
    #[serde(flatten)]
    params: InvestmentDistributionParams,
    model: DistributionModel,
}

impl ModelInput {
    fn statistics(&self) -> NapiResult<DistributionStatistics> {
        params::derive_statistics(&self.params, self.model).map_err(to_napi_error)
    }
}

// ---------------------------------------------------------------------------
// Special functions
// ---------------------------------------------------------------------------

#[napi]
pub fn normal_cdf(x: f64) -> f64 {
    special::normal_cdf(x)
}

#[napi]
pub fn normal_inverse_cdf(p: f64) -> NapiResult<f64> {
    special::normal_inverse_cdf(p).map_err(to_napi_error)
}

#[napi]
pub fn lognormal_cdf(x: f64, log_mean: f64, log_std_dev: f64) -> f64 {
    density::lognormal_cdf(x, log_mean, log_std_dev)
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_statistics(input_json: String) -> NapiResult<String> {
    let input: ModelInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = input.statistics()?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CurveBindingInput {
    #[serde(flatten)]
    input: ModelInput,
    #[serde(default)]
    options: CurveOptions,
}

#[napi]
pub fn density_curve(input_json: String) -> NapiResult<String> {
    let binding_input: CurveBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let stats = binding_input.input.statistics()?;
    let output =
        curve::generate_density_curve(&stats, &binding_input.options).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct WorstCaseBindingInput {
    #[serde(flatten)]
    input: ModelInput,
    probability_threshold: f64,
}

#[napi]
pub fn worst_case(input_json: String) -> NapiResult<String> {
    let binding_input: WorstCaseBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let stats = binding_input.input.statistics()?;
    let output = worst_case::worst_case_outcome(
        &binding_input.input.params,
        &stats,
        binding_input.probability_threshold,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ProbabilityBindingInput {
    #[serde(flatten)]
    input: ModelInput,
    value: f64,
}

/// Tooltip helper: P(terminal value <= value).
#[napi]
pub fn probability_at_or_below(input_json: String) -> NapiResult<f64> {
    let binding_input: ProbabilityBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let stats = binding_input.input.statistics()?;
    density::probability_at_or_below(&stats, binding_input.value).map_err(to_napi_error)
}

#[napi]
pub fn percentile_ladder(input_json: String) -> NapiResult<String> {
    let input: ModelInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = worst_case::percentile_ladder(&input.statistics()?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_distribution(input_json: String) -> NapiResult<String> {
    let input: DistributionAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::analyze_distribution(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_models(input_json: String) -> NapiResult<String> {
    let input: DistributionAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::compare_models(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
