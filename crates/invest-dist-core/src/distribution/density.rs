use std::f64::consts::PI;

use crate::distribution::params::{DistributionModel, DistributionStatistics};
use crate::error::InvestDistError;
use crate::special::{normal_cdf, normal_pdf};
use crate::InvestDistResult;

/// Normal density with the given mean and standard deviation.
pub fn normal_pdf_general(x: f64, mean: f64, std_dev: f64) -> f64 {
    normal_pdf((x - mean) / std_dev) / std_dev
}

/// P(X <= x) for X ~ N(mean, std_dev^2).
pub fn normal_cdf_general(x: f64, mean: f64, std_dev: f64) -> f64 {
    normal_cdf((x - mean) / std_dev)
}

/// Lognormal density. Zero outside the support (`x <= 0`).
pub fn lognormal_pdf(x: f64, log_mean: f64, log_std_dev: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let z = (x.ln() - log_mean) / log_std_dev;
    (-0.5 * z * z).exp() / (x * log_std_dev * (2.0 * PI).sqrt())
}

/// P(X <= x) for ln X ~ N(log_mean, log_std_dev^2). Zero for `x <= 0`.
pub fn lognormal_cdf(x: f64, log_mean: f64, log_std_dev: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    normal_cdf((x.ln() - log_mean) / log_std_dev)
}

/// Probability that the terminal value ends at or below `x`, using the CDF
/// that matches `stats.model`.
pub fn probability_at_or_below(stats: &DistributionStatistics, x: f64) -> InvestDistResult<f64> {
    if !x.is_finite() {
        return Err(InvestDistError::InvalidInput {
            field: "value".into(),
            reason: "Must be a finite number".into(),
        });
    }
    if stats.is_degenerate() {
        return Err(InvestDistError::DegenerateDistribution {
            context: "probability_at_or_below".into(),
        });
    }
    match stats.model {
        DistributionModel::Normal => Ok(normal_cdf_general(x, stats.mean, stats.std_dev)),
        DistributionModel::Lognormal => {
            let (log_mean, log_std_dev) = stats.log_params()?;
            Ok(lognormal_cdf(x, log_mean, log_std_dev))
        }
    }
}
