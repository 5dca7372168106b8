use clap::{Args, ValueEnum};
use serde_json::Value;
use std::time::Instant;

use invest_dist_core::distribution::curve::{self, CurveOptions};
use invest_dist_core::distribution::density;
use invest_dist_core::distribution::params::{
    self, DistributionModel, DistributionStatistics, InvestmentDistributionParams,
};
use invest_dist_core::distribution::worst_case;
use invest_dist_core::types::with_metadata;

use crate::commands::settings::load_or_default;

/// Model selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliModel {
    Normal,
    Lognormal,
}

impl From<CliModel> for DistributionModel {
    fn from(value: CliModel) -> Self {
        match value {
            CliModel::Normal => DistributionModel::Normal,
            CliModel::Lognormal => DistributionModel::Lognormal,
        }
    }
}

/// Investment parameters shared by every distribution command.
/// Omitted values come from the settings file.
#[derive(Args, Debug, Clone)]
pub struct DistributionArgs {
    /// Amount invested at the start (defaults to totalAssets * investmentRatio / 100)
    #[arg(long)]
    pub initial_assets: Option<f64>,

    /// Expected annual return in percent (e.g. 7.5)
    #[arg(long, allow_hyphen_values = true)]
    pub expected_return: Option<f64>,

    /// Annual risk (volatility) in percent (e.g. 18)
    #[arg(long)]
    pub risk: Option<f64>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<f64>,

    /// Terminal-value model
    #[arg(long, value_enum, default_value = "lognormal")]
    pub model: CliModel,
}

/// Arguments for terminal-value statistics
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub dist: DistributionArgs,
}

/// Arguments for the density curve
#[derive(Args)]
pub struct CurveArgs {
    #[command(flatten)]
    pub dist: DistributionArgs,

    /// Number of samples (at least 2)
    #[arg(long, default_value = "300")]
    pub points: usize,

    /// Half-width of the sampled range in standard deviations
    #[arg(long, default_value = "3")]
    pub span: f64,
}

/// Arguments for the worst-case outcome
#[derive(Args)]
pub struct WorstCaseArgs {
    #[command(flatten)]
    pub dist: DistributionArgs,

    /// Percent of outcomes the worst case must cover, strictly between 0 and 100
    #[arg(long, default_value = "90")]
    pub threshold: f64,
}

/// Arguments for the at-or-below probability
#[derive(Args)]
pub struct ProbabilityArgs {
    #[command(flatten)]
    pub dist: DistributionArgs,

    /// Asset value to evaluate
    #[arg(long, allow_hyphen_values = true)]
    pub value: f64,
}

/// Arguments for the percentile ladder
#[derive(Args)]
pub struct PercentilesArgs {
    #[command(flatten)]
    pub dist: DistributionArgs,
}

/// Fill any missing parameter from the settings file (or its defaults).
pub fn resolve_params(
    args: &DistributionArgs,
    settings_path: &str,
) -> Result<InvestmentDistributionParams, Box<dyn std::error::Error>> {
    let settings = load_or_default(settings_path)?;
    let params = InvestmentDistributionParams {
        initial_assets: args.initial_assets.unwrap_or_else(|| settings.initial_assets()),
        expected_return: args.expected_return.unwrap_or(settings.expected_return),
        risk: args.risk.unwrap_or(settings.risk),
        years: args.years.unwrap_or(settings.years),
    };
    params.validate()?;
    Ok(params)
}

fn resolve_statistics(
    args: &DistributionArgs,
    settings_path: &str,
) -> Result<(InvestmentDistributionParams, DistributionStatistics), Box<dyn std::error::Error>> {
    let p = resolve_params(args, settings_path)?;
    let stats = params::derive_statistics(&p, args.model.into())?;
    Ok((p, stats))
}

pub fn run_stats(
    args: StatsArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (p, stats) = resolve_statistics(&args.dist, settings_path)?;
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata("Terminal value moments", &p, Vec::new(), elapsed, stats);
    Ok(serde_json::to_value(output)?)
}

pub fn run_curve(
    args: CurveArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (p, stats) = resolve_statistics(&args.dist, settings_path)?;
    let options = CurveOptions {
        num_points: args.points,
        span_std_devs: args.span,
    };
    let density_curve = curve::generate_density_curve(&stats, &options)?;
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Discretized terminal value density",
        &serde_json::json!({ "params": p, "options": options }),
        Vec::new(),
        elapsed,
        density_curve,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_worst_case(
    args: WorstCaseArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (p, stats) = resolve_statistics(&args.dist, settings_path)?;
    let outcome = worst_case::worst_case_outcome(&p, &stats, args.threshold)?;
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Lower-tail percentile via inverse normal CDF",
        &serde_json::json!({ "params": p, "model": stats.model }),
        Vec::new(),
        elapsed,
        outcome,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_probability(
    args: ProbabilityArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (p, stats) = resolve_statistics(&args.dist, settings_path)?;
    let probability = density::probability_at_or_below(&stats, args.value)?;
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Cumulative probability at or below value",
        &serde_json::json!({ "params": p, "model": stats.model }),
        Vec::new(),
        elapsed,
        serde_json::json!({ "value": args.value, "probability": probability }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_percentiles(
    args: PercentilesArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (p, stats) = resolve_statistics(&args.dist, settings_path)?;
    let ladder = worst_case::percentile_ladder(&stats)?;
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Analytical percentiles via inverse normal CDF",
        &serde_json::json!({ "params": p, "model": stats.model }),
        Vec::new(),
        elapsed,
        ladder,
    );
    Ok(serde_json::to_value(output)?)
}
