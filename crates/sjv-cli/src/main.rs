//! # sjv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sjv_cli::compile::{run_compile, CompileArgs};
use sjv_cli::validate::{run_validate, ValidateArgs};
use sjv_cli::EXIT_ERROR;

/// Swagger 2.0 request validation.
///
/// Compiles Swagger documents into one JSON Schema per operation and
/// validates request parameters against them.
#[derive(Parser, Debug)]
#[command(name = "sjv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML or JSON configuration file listing spec documents.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile Swagger documents and list or emit the operation schemas.
    Compile(CompileArgs),

    /// Validate request parameters against one operation's schema.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "sjv CLI starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Compile(args) => run_compile(args, config),
        Commands::Validate(args) => run_validate(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
