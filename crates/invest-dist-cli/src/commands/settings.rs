use clap::{Args, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::Path;

use invest_dist_core::settings::InvestmentSettings;

pub const DEFAULT_SETTINGS_FILE: &str = "invest-dist-settings.json";

/// Settings record actions
#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the stored settings (defaults if no file exists)
    Show,
    /// Update and persist one or more fields
    Save(SettingsSaveArgs),
    /// Overwrite the stored settings with defaults
    Reset,
}

/// Fields to change; anything omitted keeps its stored value
#[derive(Args)]
pub struct SettingsSaveArgs {
    /// Total household assets
    #[arg(long)]
    pub total_assets: Option<f64>,

    /// Percent of total assets that is invested (0-100]
    #[arg(long)]
    pub investment_ratio: Option<f64>,

    /// Expected annual return in percent (e.g. 5 for 5%)
    #[arg(long, allow_hyphen_values = true)]
    pub expected_return: Option<f64>,

    /// Annual risk (volatility) in percent
    #[arg(long)]
    pub risk: Option<f64>,

    /// Default holding period in years
    #[arg(long)]
    pub years: Option<f64>,
}

/// Load the settings record, or `None` when the file does not exist yet.
pub fn load_settings(path: &str) -> Result<Option<InvestmentSettings>, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if !p.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(p)
        .map_err(|e| format!("Failed to read '{}': {}", p.display(), e))?;
    let settings = InvestmentSettings::from_json(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", p.display(), e))?;
    Ok(Some(settings))
}

/// Stored settings, falling back to defaults.
pub fn load_or_default(path: &str) -> Result<InvestmentSettings, Box<dyn std::error::Error>> {
    Ok(load_settings(path)?.unwrap_or_default())
}

pub fn save_settings(
    path: &str,
    settings: &InvestmentSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    settings.validate()?;
    fs::write(path, settings.to_json()?)
        .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
    Ok(())
}

fn apply_changes(mut settings: InvestmentSettings, args: &SettingsSaveArgs) -> InvestmentSettings {
    if let Some(v) = args.total_assets {
        settings.total_assets = v;
    }
    if let Some(v) = args.investment_ratio {
        settings.investment_ratio = v;
    }
    if let Some(v) = args.expected_return {
        settings.expected_return = v;
    }
    if let Some(v) = args.risk {
        settings.risk = v;
    }
    if let Some(v) = args.years {
        settings.years = v;
    }
    settings
}

fn settings_value(
    settings: &InvestmentSettings,
    path: &str,
    stored: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::json!({
        "result": serde_json::to_value(settings)?,
        "initial_assets": settings.initial_assets(),
        "path": path,
        "stored": stored,
    }))
}

pub fn run_settings(
    action: SettingsAction,
    path: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Show => {
            let stored = load_settings(path)?;
            let is_stored = stored.is_some();
            settings_value(&stored.unwrap_or_default(), path, is_stored)
        }
        SettingsAction::Save(args) => {
            let updated = apply_changes(load_or_default(path)?, &args);
            save_settings(path, &updated)?;
            settings_value(&updated, path, true)
        }
        SettingsAction::Reset => {
            let defaults = InvestmentSettings::default();
            save_settings(path, &defaults)?;
            settings_value(&defaults, path, true)
        }
    }
}
