//! # compval CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, loads the
//! optional configuration file and dispatches to the subcommand handler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use compval_cli::config::ValidatorConfig;
use compval_cli::validate::{run_validate, ValidateArgs};
use compval_cli::EXIT_ERROR;

/// Validates Tekton and supply-chain component manifests.
#[derive(Parser, Debug)]
#[command(name = "compval", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file (policy, extra schemas, message templates).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validates all components with the path supplied.
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("compval v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => ValidatorConfig::load(path),
        None => Ok(ValidatorConfig::default()),
    };

    let result = config.and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
