mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::AnalyzeArgs;
use commands::distribution::{
    CurveArgs, PercentilesArgs, ProbabilityArgs, StatsArgs, WorstCaseArgs,
};
use commands::settings::SettingsAction;

/// Terminal-value distributions for long-horizon investments
#[derive(Parser)]
#[command(
    name = "idist",
    version,
    about = "Terminal-value distributions for long-horizon investments",
    long_about = "Models the value of an investment after a multi-year holding period \
                  under a normal approximation or a lognormal (continuous compounding) \
                  model. Derives moments, density curves, percentile ladders and \
                  worst-case outcomes at a chosen probability threshold."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Settings file used for any parameter not given on the command line
    #[arg(long, default_value = commands::settings::DEFAULT_SETTINGS_FILE, global = true)]
    settings: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean and standard deviation of the terminal value
    Stats(StatsArgs),
    /// Discretized density curve for plotting
    Curve(CurveArgs),
    /// Asset value at the lower tail for a probability threshold
    WorstCase(WorstCaseArgs),
    /// Probability that the terminal value ends at or below a value
    Probability(ProbabilityArgs),
    /// 5th to 95th percentile ladder of the terminal value
    Percentiles(PercentilesArgs),
    /// Full report: statistics, worst case, percentiles and density curve
    Analyze(AnalyzeArgs),
    /// Run the normal and lognormal models side by side (--model is ignored)
    Compare(AnalyzeArgs),
    /// Show, save or reset the persisted settings record
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    let settings_path = cli.settings.as_str();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Stats(args) => commands::distribution::run_stats(args, settings_path),
        Commands::Curve(args) => commands::distribution::run_curve(args, settings_path),
        Commands::WorstCase(args) => commands::distribution::run_worst_case(args, settings_path),
        Commands::Probability(args) => commands::distribution::run_probability(args, settings_path),
        Commands::Percentiles(args) => commands::distribution::run_percentiles(args, settings_path),
        Commands::Analyze(args) => commands::analysis::run_analyze(args, settings_path),
        Commands::Compare(args) => commands::analysis::run_compare(args, settings_path),
        Commands::Settings { action } => commands::settings::run_settings(action, settings_path),
        Commands::Version => {
            println!("idist {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_compare_help_says_model_is_ignored() {
        let cmd = Cli::command();
        let compare = cmd
            .get_subcommands()
            .find(|c| c.get_name() == "compare")
            .unwrap();
        let about = compare.get_about().unwrap().to_string();
        assert!(about.contains("--model is ignored"), "{about}");
    }

    #[test]
    fn test_compare_parses_with_model_flag() {
        let cli = Cli::try_parse_from(["idist", "compare", "--model", "normal", "--risk", "12"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Compare(_)));
    }
}
