//! casegen CLI - Command-line interface
//!
//! Commands:
//!   generate  - List expected test identifiers for a contract
//!   validate  - Reconcile a contract against a JUnit report
//!   schema    - Print JSON schema for an output type

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Generate(args) => cli::cmd_generate(args, &cli),
        Command::Validate(args) => cli::cmd_validate(args, &cli),
        Command::Schema { name } => cli::cmd_schema(name.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Log to stderr so stdout carries only the report
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
