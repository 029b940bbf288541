mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::compare::CompareCommand;
use commands::fields::FieldsArgs;
use commands::history::HistoryCommand;
use commands::loan::{CalculateArgs, ScheduleArgs};
use config::{Config, Context};

/// Loan amortization schedules, history and comparison
#[derive(Parser)]
#[command(
    name = "pathpay",
    version,
    about = "Loan amortization schedules, history and comparison",
    long_about = "Calculate personal, mortgage, auto and business loan repayments with \
                  decimal precision. Supports equal-total and equal-principal amortization, \
                  weekly to yearly repayment, saved history and a three-loan compare list."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Directory holding history and compare-list files
    #[arg(long, global = true, env = "PATHPAY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// YAML config file (default: ~/.config/pathpay/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate periodic payment, totals and payoff date
    Calculate(CalculateArgs),
    /// Print the full amortization table
    Schedule(ScheduleArgs),
    /// Saved calculations
    #[command(subcommand)]
    History(HistoryCommand),
    /// Side-by-side comparison of up to three loans
    #[command(subcommand)]
    Compare(CompareCommand),
    /// Explain the loan form fields
    Fields(FieldsArgs),
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

fn version_line() -> String {
    format!("pathpay {}", env!("CARGO_PKG_VERSION"))
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = Config::load(cli.config.as_deref())?;
    let ctx = Context::resolve(cli.data_dir, config)?;

    match cli.command {
        Commands::Calculate(args) => commands::loan::run_calculate(args, &ctx),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &ctx),
        Commands::History(cmd) => commands::history::run_history(cmd, &ctx),
        Commands::Compare(cmd) => commands::compare::run_compare(cmd, &ctx),
        Commands::Fields(args) => commands::fields::run_fields(args),
        Commands::Version => Ok(serde_json::Value::from(version_line())),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("{}", version_line());
        return;
    }

    let format = cli.output.clone();
    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
