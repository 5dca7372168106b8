use serde::{Deserialize, Serialize};

use crate::distribution::density::{lognormal_pdf, normal_pdf_general};
use crate::distribution::params::{DistributionModel, DistributionStatistics};
use crate::error::InvestDistError;
use crate::InvestDistResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One point on a discretized density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensitySample {
    /// Asset value.
    pub x: f64,
    /// Probability density at `x`.
    pub y: f64,
}

/// Discretized density, strictly increasing in `x`, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub model: DistributionModel,
    pub x_min: f64,
    pub x_max: f64,
    pub samples: Vec<DensitySample>,
}

impl DensityCurve {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Trapezoidal integral of the sampled density over `[x_min, x_max]`.
    pub fn area(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
            .sum()
    }
}

/// Grid settings for the discretizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveOptions {
    #[serde(default = "default_num_points")]
    pub num_points: usize,
    /// Half-width of the sampled range, in standard deviations.
    #[serde(default = "default_span_std_devs")]
    pub span_std_devs: f64,
}

pub fn default_num_points() -> usize {
    300
}

pub fn default_span_std_devs() -> f64 {
    3.0
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            num_points: default_num_points(),
            span_std_devs: default_span_std_devs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_grid(num_points: usize, num_std_dev: f64) -> InvestDistResult<()> {
    if num_points < 2 {
        return Err(InvestDistError::InvalidInput {
            field: "num_points".into(),
            reason: "At least 2 points are required to span a range".into(),
        });
    }
    if !num_std_dev.is_finite() || num_std_dev <= 0.0 {
        return Err(InvestDistError::InvalidInput {
            field: "span_std_devs".into(),
            reason: "Must be a positive finite number".into(),
        });
    }
    Ok(())
}

/// Sample `density` at `num_points` equally spaced values in `[x_min, x_max]`.
fn sample_linear(
    model: DistributionModel,
    x_min: f64,
    x_max: f64,
    num_points: usize,
    density: impl Fn(f64) -> f64,
) -> InvestDistResult<DensityCurve> {
    if !(x_max > x_min) || !x_max.is_finite() {
        return Err(InvestDistError::DegenerateDistribution {
            context: format!("{} curve range [{x_min}, {x_max}]", model.label()),
        });
    }

    let step = (x_max - x_min) / (num_points - 1) as f64;
    let samples: Vec<DensitySample> = (0..num_points)
        .map(|i| {
            let x = x_min + i as f64 * step;
            DensitySample { x, y: density(x) }
        })
        .collect();

    // Range narrower than num_points - 1 representable steps
    if samples.windows(2).any(|w| w[1].x <= w[0].x) {
        return Err(InvestDistError::DegenerateDistribution {
            context: format!(
                "{} curve range [{x_min}, {x_max}] is too narrow for {num_points} points",
                model.label()
            ),
        });
    }

    Ok(DensityCurve {
        model,
        x_min,
        x_max,
        samples,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Discretize N(mean, std_dev^2) over `mean ± num_std_dev * std_dev`, clipped at zero.
pub fn generate_normal_distribution_data(
    mean: f64,
    std_dev: f64,
    num_points: usize,
    num_std_dev: f64,
) -> InvestDistResult<DensityCurve> {
    validate_grid(num_points, num_std_dev)?;
    if !(std_dev > 0.0) {
        return Err(InvestDistError::DegenerateDistribution {
            context: "normal density curve".into(),
        });
    }

    let x_min = (mean - num_std_dev * std_dev).max(0.0);
    let x_max = mean + num_std_dev * std_dev;
    sample_linear(DistributionModel::Normal, x_min, x_max, num_points, |x| {
        normal_pdf_general(x, mean, std_dev)
    })
}

/// Discretize a lognormal density.
///
/// The span is taken in log space (`log_mean ± num_std_dev * log_std_dev`,
/// lower bound clipped at 0), both bounds are exponentiated, and the samples
/// are spaced linearly on the natural scale between them.
pub fn generate_lognormal_distribution_data(
    log_mean: f64,
    log_std_dev: f64,
    num_points: usize,
    num_std_dev: f64,
) -> InvestDistResult<DensityCurve> {
    validate_grid(num_points, num_std_dev)?;
    if !(log_std_dev > 0.0) {
        return Err(InvestDistError::DegenerateDistribution {
            context: "lognormal density curve".into(),
        });
    }

    let log_x_min = (log_mean - num_std_dev * log_std_dev).max(0.0);
    let log_x_max = log_mean + num_std_dev * log_std_dev;
    sample_linear(
        DistributionModel::Lognormal,
        log_x_min.exp(),
        log_x_max.exp(),
        num_points,
        |x| lognormal_pdf(x, log_mean, log_std_dev),
    )
}

/// Discretize the distribution described by `stats`.
pub fn generate_density_curve(
    stats: &DistributionStatistics,
    options: &CurveOptions,
) -> InvestDistResult<DensityCurve> {
    match stats.model {
        DistributionModel::Normal => generate_normal_distribution_data(
            stats.mean,
            stats.std_dev,
            options.num_points,
            options.span_std_devs,
        ),
        DistributionModel::Lognormal => {
            let (log_mean, log_std_dev) = stats.log_params()?;
            generate_lognormal_distribution_data(
                log_mean,
                log_std_dev,
                options.num_points,
                options.span_std_devs,
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::params::{derive_statistics, InvestmentDistributionParams};

    fn assert_strictly_increasing(curve: &DensityCurve) {
        for w in curve.samples.windows(2) {
            assert!(w[1].x > w[0].x, "{} !> {}", w[1].x, w[0].x);
        }
    }

    #[test]
    fn test_normal_curve_bounds_and_length() {
        let curve = generate_normal_distribution_data(100.0, 10.0, 300, 3.0).unwrap();
        assert_eq!(curve.len(), 300);
        assert!((curve.samples[0].x - 70.0).abs() < 1e-9);
        assert!((curve.samples[299].x - 130.0).abs() < 1e-9);
        assert_strictly_increasing(&curve);
    }

    #[test]
    fn test_normal_curve_clips_at_zero() {
        let curve = generate_normal_distribution_data(100.0, 60.0, 50, 3.0).unwrap();
        assert_eq!(curve.x_min, 0.0);
        assert_eq!(curve.samples[0].x, 0.0);
        assert!(curve.samples.iter().all(|s| s.x >= 0.0 && s.y >= 0.0));
    }

    #[test]
    fn test_normal_curve_peak_at_mean() {
        // odd count puts a sample exactly on the mean
        let curve = generate_normal_distribution_data(100.0, 10.0, 301, 3.0).unwrap();
        let peak = curve
            .samples
            .iter()
            .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap())
            .unwrap();
        assert!((peak.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_normal_curve_area_close_to_one() {
        let curve = generate_normal_distribution_data(1_000.0, 100.0, 300, 4.0).unwrap();
        assert!((curve.area() - 1.0).abs() < 1e-3, "area={}", curve.area());
    }

    #[test]
    fn test_lognormal_curve_bounds() {
        let (m, s) = (13.5, 0.4);
        let curve = generate_lognormal_distribution_data(m, s, 300, 3.0).unwrap();
        assert_eq!(curve.len(), 300);
        assert!((curve.x_min - (m - 1.2_f64).exp()).abs() < 1e-6);
        assert!((curve.x_max - (m + 1.2_f64).exp()).abs() < 1e-3);
        assert_strictly_increasing(&curve);
        // natural-scale spacing is uniform
        let d0 = curve.samples[1].x - curve.samples[0].x;
        let d1 = curve.samples[299].x - curve.samples[298].x;
        assert!((d0 - d1).abs() / d0 < 1e-9);
    }

    #[test]
    fn test_lognormal_curve_log_floor_at_zero() {
        // log_mean - 3 * log_std_dev < 0 => x_min = exp(0) = 1
        let curve = generate_lognormal_distribution_data(1.0, 0.5, 100, 3.0).unwrap();
        assert_eq!(curve.x_min, 1.0);
    }

    #[test]
    fn test_lognormal_curve_area_close_to_one() {
        let curve = generate_lognormal_distribution_data(12.0, 0.3, 2_000, 5.0).unwrap();
        assert!((curve.area() - 1.0).abs() < 1e-3, "area={}", curve.area());
    }

    #[test]
    fn test_rejects_too_few_points() {
        for n in [0, 1] {
            assert!(matches!(
                generate_normal_distribution_data(100.0, 10.0, n, 3.0),
                Err(InvestDistError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_span() {
        assert!(generate_normal_distribution_data(100.0, 10.0, 10, 0.0).is_err());
        assert!(generate_lognormal_distribution_data(5.0, 0.2, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_spread_is_degenerate() {
        assert!(matches!(
            generate_normal_distribution_data(100.0, 0.0, 300, 3.0),
            Err(InvestDistError::DegenerateDistribution { .. })
        ));
        assert!(matches!(
            generate_lognormal_distribution_data(5.0, 0.0, 300, 3.0),
            Err(InvestDistError::DegenerateDistribution { .. })
        ));
    }

    #[test]
    fn test_near_zero_risk_rejects_collapsed_grid() {
        let p = InvestmentDistributionParams {
            initial_assets: 1_000_000.0,
            expected_return: 5.0,
            risk: 1e-13,
            years: 10.0,
        };
        for model in [DistributionModel::Normal, DistributionModel::Lognormal] {
            let stats = derive_statistics(&p, model).unwrap();
            assert!(!stats.is_degenerate());
            assert!(matches!(
                generate_density_curve(&stats, &CurveOptions::default()),
                Err(InvestDistError::DegenerateDistribution { .. })
            ));
        }
    }

    #[test]
    fn test_curve_from_statistics_both_models() {
        let p = InvestmentDistributionParams {
            initial_assets: 5_000_000.0,
            expected_return: 5.0,
            risk: 15.0,
            years: 10.0,
        };
        for model in [DistributionModel::Normal, DistributionModel::Lognormal] {
            let stats = derive_statistics(&p, model).unwrap();
            let curve = generate_density_curve(&stats, &CurveOptions::default()).unwrap();
            assert_eq!(curve.model, model);
            assert_eq!(curve.len(), 300);
            assert_strictly_increasing(&curve);
            assert!(curve.samples.iter().all(|s| s.y.is_finite() && s.y >= 0.0));
        }
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: CurveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, CurveOptions::default());
    }
}
