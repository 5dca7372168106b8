use serde::{Deserialize, Serialize};

use crate::error::InvestDistError;
use crate::types::{Money, Percent, Years};
use crate::InvestDistResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which terminal-value model to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionModel {
    /// Discretely compounded mean with risk scaled by sqrt(years).
    /// Linear view; may put mass below zero.
    Normal,
    /// Geometric Brownian motion terminal value (continuous compounding).
    Lognormal,
}

impl DistributionModel {
    pub fn label(self) -> &'static str {
        match self {
            DistributionModel::Normal => "normal",
            DistributionModel::Lognormal => "lognormal",
        }
    }
}

/// Inputs describing one investment over a holding period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentDistributionParams {
    /// Amount invested at the start of the horizon. Must be > 0.
    pub initial_assets: Money,
    /// Expected annual return in percent (7.5 = 7.5%). May be negative, must be > -100.
    pub expected_return: Percent,
    /// Annual volatility in percent. Must be >= 0.
    pub risk: Percent,
    /// Holding period in years. Must be > 0.
    pub years: Years,
}

/// Moments of the terminal asset value.
///
/// `log_mean` / `log_std_dev` are only populated for the lognormal model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStatistics {
    pub model: DistributionModel,
    pub mean: Money,
    pub std_dev: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_std_dev: Option<f64>,
}

impl DistributionStatistics {
    /// True when the distribution has collapsed to a point mass (risk = 0).
    pub fn is_degenerate(&self) -> bool {
        match self.model {
            DistributionModel::Normal => self.std_dev <= 0.0,
            DistributionModel::Lognormal => self.log_std_dev.unwrap_or(0.0) <= 0.0,
        }
    }

    /// Log-scale parameters, or an error when called on a normal-model result.
    pub fn log_params(&self) -> InvestDistResult<(f64, f64)> {
        match (self.log_mean, self.log_std_dev) {
            (Some(m), Some(s)) => Ok((m, s)),
            _ => Err(InvestDistError::InvalidInput {
                field: "statistics".into(),
                reason: format!(
                    "log-scale parameters are not defined for the {} model",
                    self.model.label()
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl InvestmentDistributionParams {
    pub fn validate(&self) -> InvestDistResult<()> {
        let finite = [
            ("initial_assets", self.initial_assets),
            ("expected_return", self.expected_return),
            ("risk", self.risk),
            ("years", self.years),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(InvestDistError::InvalidInput {
                    field: field.into(),
                    reason: "Must be a finite number".into(),
                });
            }
        }
        if self.initial_assets <= 0.0 {
            return Err(InvestDistError::InvalidInput {
                field: "initial_assets".into(),
                reason: "Must be greater than zero".into(),
            });
        }
        if self.expected_return <= -100.0 {
            return Err(InvestDistError::InvalidInput {
                field: "expected_return".into(),
                reason: "Must be greater than -100%".into(),
            });
        }
        if self.risk < 0.0 {
            return Err(InvestDistError::InvalidInput {
                field: "risk".into(),
                reason: "Must be non-negative".into(),
            });
        }
        if self.years <= 0.0 {
            return Err(InvestDistError::InvalidInput {
                field: "years".into(),
                reason: "Must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Derive terminal-value statistics for the selected model.
///
/// Normal: `mean = A (1 + r)^T`, `sd = mean * sigma * sqrt(T)`.
///
/// Lognormal: `ln V ~ N(ln A + (mu - sigma^2/2) T, sigma^2 T)`, with natural
/// moments `mean = A e^(mu T)` and `sd = mean * sqrt(e^(sigma^2 T) - 1)`.
pub fn derive_statistics(
    params: &InvestmentDistributionParams,
    model: DistributionModel,
) -> InvestDistResult<DistributionStatistics> {
    params.validate()?;

    let mu = params.expected_return / 100.0;
    let sigma = params.risk / 100.0;
    let years = params.years;

    let stats = match model {
        DistributionModel::Normal => {
            let mean = params.initial_assets * (1.0 + mu).powf(years);
            DistributionStatistics {
                model,
                mean,
                std_dev: mean * sigma * years.sqrt(),
                log_mean: None,
                log_std_dev: None,
            }
        }
        DistributionModel::Lognormal => {
            let mean = params.initial_assets * (mu * years).exp();
            DistributionStatistics {
                model,
                mean,
                std_dev: mean * (sigma * sigma * years).exp_m1().sqrt(),
                log_mean: Some(params.initial_assets.ln() + (mu - sigma * sigma / 2.0) * years),
                log_std_dev: Some(sigma * years.sqrt()),
            }
        }
    };

    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
