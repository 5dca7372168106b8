use clap::Args;
use serde_json::Value;

use invest_dist_core::analysis::report::{self, DistributionAnalysisInput};

use crate::commands::distribution::{resolve_params, DistributionArgs};
use crate::input;

/// Arguments for the full report and the model comparison
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML input file (takes precedence over flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub dist: DistributionArgs,

    /// Percent of outcomes the worst case must cover (clamped to 0.1-99.9)
    #[arg(long, default_value = "90")]
    pub threshold: f64,

    /// Number of curve samples
    #[arg(long, default_value = "300")]
    pub points: usize,

    /// Curve half-width in standard deviations
    #[arg(long, default_value = "3")]
    pub span: f64,
}

fn build_input(
    args: &AnalyzeArgs,
    settings_path: &str,
) -> Result<DistributionAnalysisInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if args.dist.initial_assets.is_none() {
        if let Some(piped) = input::stdin::read_stdin::<DistributionAnalysisInput>()? {
            return Ok(piped);
        }
    }

    let p = resolve_params(&args.dist, settings_path)?;
    Ok(DistributionAnalysisInput {
        initial_assets: p.initial_assets,
        expected_return: p.expected_return,
        risk: p.risk,
        years: p.years,
        model: args.dist.model.into(),
        probability_threshold: args.threshold,
        num_points: args.points,
        span_std_devs: args.span,
    })
}

pub fn run_analyze(
    args: AnalyzeArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis_input = build_input(&args, settings_path)?;
    let result = report::analyze_distribution(&analysis_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Both models always run, so `--model` has no effect here.
pub fn run_compare(
    args: AnalyzeArgs,
    settings_path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis_input = build_input(&args, settings_path)?;
    let result = report::compare_models(&analysis_input)?;
    Ok(serde_json::to_value(result)?)
}
