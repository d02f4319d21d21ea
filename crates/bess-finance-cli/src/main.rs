mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::export::ExportArgs;
use commands::metrics::MetricsArgs;
use commands::model::{ModelArgs, ParamsArgs};
use commands::sensitivity::{ReportArgs, SensitivityArgs, TornadoArgs};

/// Battery storage project finance modelling
#[derive(Parser)]
#[command(
    name = "bessfin",
    version,
    about = "Battery storage project finance modelling",
    long_about = "Projects revenue, costs, debt service and cash flows for a battery \
                  energy-storage project with decimal precision, and reports project \
                  and equity IRR, NPV, payback and sensitivity analysis."
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
    /// Run the full project model
    Model(ModelArgs),
    /// Print the default raw inputs
    Defaults,
    /// Print the normalised parameter record
    Params(ParamsArgs),
    /// IRR, NPV and payback of an ad-hoc cash flow vector
    Metrics(MetricsArgs),
    /// Sweep one parameter by a set of multipliers
    Sensitivity(SensitivityArgs),
    /// ±10% IRR tornado over the headline parameters
    Tornado(TornadoArgs),
    /// Full sensitivity report: spread, CAPEX, efficiency, degradation, tornado
    Report(ReportArgs),
    /// Export the line-item statements as CSV
    Export(ExportArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Model(args) => commands::model::run_model(args),
        Commands::Defaults => commands::model::run_defaults(),
        Commands::Params(args) => commands::model::run_params(args),
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Tornado(args) => commands::sensitivity::run_tornado(args),
        Commands::Report(args) => commands::sensitivity::run_report(args),
        Commands::Export(args) => match commands::export::run_export(args) {
            Ok(()) => return,
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("bessfin {}", env!("CARGO_PKG_VERSION"));
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
