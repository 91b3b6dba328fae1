//! Specgate CLI
//!
//! Command-line entry point for the contract gate.

use clap::{Parser, Subcommand, ValueEnum};
use specgate_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "specgate")]
#[command(about = "Contract diff and policy gate", long_about = None)]
struct Cli {
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff current documents against committed snapshots and enforce
    /// policy
    Check(commands::check::CheckArgs),
    /// Validate current documents and commit them as the new snapshots
    Generate(commands::generate::GenerateArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Text => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let code = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
    };
    std::process::exit(code);
}
