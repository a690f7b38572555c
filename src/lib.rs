// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # casegen — contract-derived test identifiers
//!
//! Reads an OpenAPI 3.0 or Swagger 2.0 contract, derives a canonical,
//! ordered list of test-case identifiers for every endpoint and parameter,
//! and optionally reconciles that list against a JUnit report.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use casegen::{generate_cases, validate_report, Config};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let cases = generate_cases(Path::new("openapi.yaml"), &config)?;
//! for id in cases.identifiers() {
//!     println!("{}", id);
//! }
//!
//! let report = validate_report(Path::new("openapi.yaml"), Path::new("results.xml"), &config)?;
//! println!("coverage: {:.1}%", report.coverage.percentage);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! contract file ──► detect_dialect ──► ContractAdapter::extract
//!                                           │
//!                                           ▼
//!                                 Vec<EndpointDescriptor>
//!                                           │
//!                      synthesize (classify + generate per parameter)
//!                                           │
//!                                           ▼
//!                                      CaseReport ──► identifiers()
//!                                                          │
//! JUnit XML ──► parse_test_report ──► names() ──► reconcile ┘
//!                                                  │
//!                                                  ▼
//!                                         ReconciliationReport
//! ```
//!
//! ## Identifier Format
//!
//! | Case              | Identifier                                   |
//! |-------------------|----------------------------------------------|
//! | Endpoint access   | `<path>_<method>_basic_access`               |
//! | Parameter case    | `<path>_<param>_<suffix>`                    |
//!
//! `<path>` is the endpoint path without its leading `/`, with `/` replaced
//! by `_` and `{}` removed.

pub mod config;
pub mod contract;
pub mod error;
pub mod junit;
pub mod reconcile;
pub mod synthesize;
pub mod testgen;

// Re-exports
pub use config::{Config, OutputFormat, CONFIG_FILE};
pub use contract::{
    detect_dialect, load_contract, parse_contract, Contract, ContractAdapter, Dialect,
    EndpointDescriptor, ExtractOptions, OpenApi3Adapter, ParameterDescriptor, ParameterLocation,
    Swagger2Adapter,
};
pub use error::{Error, ErrorClass, Result};
pub use junit::{load_test_report, parse_test_report, ObservedTestCase, TestReport};
pub use reconcile::{reconcile, CoverageSummary, ReconciliationReport, ReconciliationResult};
pub use synthesize::{
    base_identifier, clean_path, endpoint_access_id, synthesize, CaseReport, EndpointCases,
    ParameterCases,
};
pub use testgen::{classify, generate_test_cases, AbstractTestCase, Strategy, TestCaseKind};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load a contract and synthesize its expected identifiers
pub fn generate_cases(contract_path: &Path, config: &Config) -> Result<CaseReport> {
    let contract = load_contract(contract_path, &config.extract_options())?;
    Ok(synthesize(&contract))
}

/// Load a contract and a JUnit report and reconcile them
///
/// Either input failing to load aborts the whole run.
pub fn validate_report(
    contract_path: &Path,
    report_path: &Path,
    config: &Config,
) -> Result<ReconciliationReport> {
    let cases = generate_cases(contract_path, config)?;
    let observed = load_test_report(report_path)?;
    Ok(reconcile(cases.identifiers(), observed.names()).into())
}
