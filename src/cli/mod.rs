//! CLI command implementations
//!
//! - `generate`: expected identifiers for a contract
//! - `validate`: reconciliation against a JUnit report
//! - `schema`: JSON schemas of the JSON output types
//! - `util`: shared helpers

pub mod generate;
pub mod schema;
pub mod util;
pub mod validate;

pub use generate::cmd_generate;
pub use schema::cmd_schema;
pub use validate::cmd_validate;

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Derive test-case identifiers from OpenAPI 3.0 / Swagger 2.0 contracts
#[derive(Parser, Debug)]
#[command(name = "casegen", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./.casegen.yaml when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the expected test identifiers, grouped by endpoint
    Generate(GenerateArgs),
    /// Compare expected identifiers with the test cases in a JUnit report
    Validate(ValidateArgs),
    /// Print the JSON schema for an output type (case-report, reconciliation, config)
    Schema {
        /// Schema name; omit to list the available ones
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// OpenAPI 3.0 or Swagger 2.0 contract (JSON or YAML)
    pub contract: PathBuf,

    /// JSON output format
    #[arg(long)]
    pub json: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// OpenAPI 3.0 or Swagger 2.0 contract (JSON or YAML)
    pub contract: PathBuf,

    /// JUnit XML test report
    pub report: PathBuf,

    /// JSON output format
    #[arg(long)]
    pub json: bool,

    /// Fail when coverage is below this percentage
    #[arg(long, value_name = "PCT")]
    pub fail_under: Option<f64>,
}
