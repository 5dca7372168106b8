use serde::{Deserialize, Serialize};

use crate::distribution::params::InvestmentDistributionParams;
use crate::error::InvestDistError;
use crate::types::{Money, Percent, Years};
use crate::InvestDistResult;

/// The flat record a front end persists between sessions.
///
/// Serialized in camelCase so the same JSON round-trips through browser
/// storage and the CLI settings file. Missing fields fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentSettings {
    /// Total household assets.
    pub total_assets: Money,
    /// Share of `total_assets` that is invested, in percent.
    pub investment_ratio: Percent,
    pub expected_return: Percent,
    pub risk: Percent,
    /// Default holding period; UI controls may override it per query.
    pub years: Years,
}

impl Default for InvestmentSettings {
    fn default() -> Self {
        Self {
            total_assets: 10_000_000.0,
            investment_ratio: 50.0,
            expected_return: 5.0,
            risk: 15.0,
            years: 10.0,
        }
    }
}

impl InvestmentSettings {
    /// Amount actually invested: `total_assets * investment_ratio / 100`.
    pub fn initial_assets(&self) -> Money {
        self.total_assets * self.investment_ratio / 100.0
    }

    pub fn validate(&self) -> InvestDistResult<()> {
        if !self.total_assets.is_finite() || self.total_assets <= 0.0 {
            return Err(InvestDistError::InvalidInput {
                field: "totalAssets".into(),
                reason: "Must be a positive finite number".into(),
            });
        }
        if !(self.investment_ratio > 0.0 && self.investment_ratio <= 100.0) {
            return Err(InvestDistError::InvalidInput {
                field: "investmentRatio".into(),
                reason: "Must be in (0, 100]".into(),
            });
        }
        self.to_params(None)?;
        Ok(())
    }

    /// Distribution parameters, optionally overriding the stored horizon.
    pub fn to_params(
        &self,
        years: Option<Years>,
    ) -> InvestDistResult<InvestmentDistributionParams> {
        let params = InvestmentDistributionParams {
            initial_assets: self.initial_assets(),
            expected_return: self.expected_return,
            risk: self.risk,
            years: years.unwrap_or(self.years),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> InvestDistResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> InvestDistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
