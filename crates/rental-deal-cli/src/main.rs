mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::criteria::CriteriaArgs;
use commands::mortgage::MortgageArgs;
use commands::recalc::RecalcArgs;

/// Rental property deal analysis
#[derive(Parser)]
#[command(
    name = "rda",
    version,
    about = "Rental property deal analysis",
    long_about = "Analyse rental property listings against an investment criteria set \
                  with decimal precision. Computes mortgage payments (external pricing \
                  service with manual fallback), cash flow, cash-on-cash return, cap \
                  rate, and a pass/fail verdict."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a property listing against investment criteria
    Analyze(AnalyzeArgs),
    /// Compute a mortgage payment quote
    Mortgage(MortgageArgs),
    /// Recompute corrected metrics from a stored analysis
    Recalc(RecalcArgs),
    /// Show the active investment criteria set
    Criteria(CriteriaArgs),
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
    env_logger::init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Recalc(args) => commands::recalc::run_recalc(args),
        Commands::Criteria(args) => commands::criteria::run_criteria(args),
        Commands::Version => {
            println!("rda {}", env!("CARGO_PKG_VERSION"));
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
