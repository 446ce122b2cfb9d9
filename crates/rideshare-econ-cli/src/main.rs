mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::models::{ModelArgs, ProjectionArgs};
use commands::sensitivity::SensitivityArgs;

/// Aggregator vs fleet ride-sharing economics
#[derive(Parser)]
#[command(
    name = "rse",
    version,
    about = "Aggregator vs fleet ride-sharing economics",
    long_about = "Compare a commission-based aggregator with an EV fleet operator. \
                  Computes monthly turnover, costs, profit, break-even timing and ROI \
                  over a 36-month horizon with decimal precision. Parameters come from \
                  built-in defaults, a JSON/YAML file or stdin, and per-field flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregator model: commission on driver-owned vehicles
    Aggregator(ModelArgs),
    /// Fleet model: owned EVs and salaried drivers
    Fleet(ModelArgs),
    /// Run both models and compare them
    Compare(ModelArgs),
    /// Month-by-month projection table for one model
    Projections(ProjectionArgs),
    /// Sweep one or two parameters across both models
    Sensitivity(SensitivityArgs),
    /// Print the default parameter bundle
    Defaults,
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

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Aggregator(args) => commands::models::run_aggregator(args),
        Commands::Fleet(args) => commands::models::run_fleet(args),
        Commands::Compare(args) => commands::models::run_compare(args),
        Commands::Projections(args) => commands::models::run_projections(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Defaults => commands::models::run_defaults(),
        Commands::Version => {
            println!("rse {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
