mod commands;
mod config;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::bmi::BmiArgs;
use commands::loan::LoanArgs;
use commands::mortgage::MortgageArgs;
use commands::schedule::ScheduleArgs;
use config::CliConfig;

/// Loan, mortgage and BMI calculations
#[derive(Parser)]
#[command(
    name = "calchub",
    version,
    about = "Loan, mortgage and BMI calculations",
    long_about = "A CLI for loan payments, mortgage payments with escrow and PMI, \
                  amortization schedules and body mass index, computed with decimal \
                  precision. Inputs can be given as flags, a JSON/YAML file or JSON \
                  on stdin, and the last parameters can be saved for reuse."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Save the parameters used so the next run can reuse them
    #[arg(long, global = true)]
    save: bool,

    /// Ignore previously saved parameters
    #[arg(long, global = true)]
    no_saved: bool,

    /// Directory for saved parameters (defaults to $CALCHUB_STORE_DIR or ~/.calchub)
    #[arg(long, global = true)]
    store_dir: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and total interest for a fixed-rate loan
    Loan(LoanArgs),
    /// Mortgage payment with property tax, insurance and PMI
    Mortgage(MortgageArgs),
    /// Body mass index and weight category
    Bmi(BmiArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
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

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = match CliConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    init_tracing(config.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args, &config),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &config),
        Commands::Bmi(args) => commands::bmi::run_bmi(args, &config),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("calchub {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result.and_then(|value| output::format_output(&cli.output, &value)) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
