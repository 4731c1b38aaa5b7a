//! # rxzk CLI entry point
//!
//! Parses command-line arguments, loads the optional YAML configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rxzk_cli::config::CliConfig;
use rxzk_cli::inspect::{run_inspect, InspectArgs};
use rxzk_cli::prove::{run_prove, ProveArgs};
use rxzk_cli::scenarios::{run_scenarios, ScenariosArgs};
use rxzk_cli::setup::{run_setup, SetupArgs};
use rxzk_cli::verify::{run_verify, VerifyArgs};

/// Prescription-validity proofs.
///
/// Generates keys for the prescription circuit, builds witnesses and
/// proofs from signal assignments, verifies proofs against public inputs,
/// and runs the security scenario catalog.
#[derive(Parser, Debug)]
#[command(name = "rxzk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a mock key pair for the prescription circuit.
    Setup(SetupArgs),

    /// Build a witness from a signal assignment and prove it.
    Prove(ProveArgs),

    /// Verify a proof against a public input vector.
    Verify(VerifyArgs),

    /// Print the circuit's constraint count, signals and shape digest.
    Inspect(InspectArgs),

    /// Run the standard scenario catalog.
    Scenarios(ScenariosArgs),
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
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rxzk starting");

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Setup(args) => run_setup(&args, &config),
        Commands::Prove(args) => run_prove(&args, &config),
        Commands::Verify(args) => run_verify(&args, &config),
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Scenarios(args) => run_scenarios(&args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
