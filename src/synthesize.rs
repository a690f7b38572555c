//! Identifier synthesis — turn extracted endpoints into test identifiers
//!
//! Identifiers are flat and underscore-joined:
//!
//! ```text
//! GET /users/{id}, parameter `id` (integer)
//!   users_id_get_basic_access
//!   users_id_id_valid_input
//!   users_id_id_invalid_input
//!   users_id_id_boundary_min
//!   users_id_id_boundary_max
//! ```
//!
//! Parameter identifiers carry the cleaned path and the parameter name but
//! not the method; only the endpoint access identifier includes it.

use crate::contract::{Contract, Dialect, EndpointDescriptor, ParameterDescriptor, ParameterLocation};
use crate::testgen::{generate_test_cases, AbstractTestCase};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Join character between path segments and the parameter name
pub const JOIN: char = '_';

/// Suffix of the per-endpoint access identifier
pub const BASIC_ACCESS: &str = "basic_access";

/// Clean an endpoint path for use in identifiers
///
/// Drops one leading `/`, joins the remaining segments with [`JOIN`] and
/// removes template braces: `/users/{id}` becomes `users_id`.
pub fn clean_path(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed
        .replace('/', &JOIN.to_string())
        .replace(['{', '}'], "")
}

/// Base identifier shared by all test cases of one parameter
pub fn base_identifier(path: &str, param_name: &str) -> String {
    format!("{}{}{}", clean_path(path), JOIN, param_name)
}

/// Identifier for simply reaching an endpoint
pub fn endpoint_access_id(path: &str, method: &str) -> String {
    format!(
        "{}{}{}{}{}",
        clean_path(path),
        JOIN,
        method.to_lowercase(),
        JOIN,
        BASIC_ACCESS
    )
}

/// Generated cases for one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParameterCases {
    pub name: String,
    pub location: ParameterLocation,
    pub declared_type: String,
    pub required: bool,
    pub cases: Vec<AbstractTestCase>,
}

/// Generated identifiers for one (path, method) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointCases {
    pub method: String,
    pub path: String,
    pub access_id: String,
    pub parameters: Vec<ParameterCases>,
}

/// Expected identifiers for a whole contract, grouped by endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Case Report", description = "Expected test identifiers per endpoint")]
pub struct CaseReport {
    pub dialect: Dialect,
    pub endpoints: Vec<EndpointCases>,
}

/// Synthesize cases for one parameter of an endpoint
pub fn parameter_cases(endpoint: &EndpointDescriptor, param: &ParameterDescriptor) -> ParameterCases {
    let base = base_identifier(&endpoint.path, &param.name);
    ParameterCases {
        name: param.name.clone(),
        location: param.location,
        declared_type: param.declared_type.clone(),
        required: param.required,
        cases: generate_test_cases(&base, &param.declared_type, &param.enum_values),
    }
}

/// Synthesize cases for one endpoint
pub fn endpoint_cases(endpoint: &EndpointDescriptor) -> EndpointCases {
    EndpointCases {
        method: endpoint.http_method.clone(),
        path: endpoint.path.clone(),
        access_id: endpoint_access_id(&endpoint.path, &endpoint.http_method),
        parameters: endpoint
            .parameters
            .iter()
            .map(|p| parameter_cases(endpoint, p))
            .collect(),
    }
}

/// Synthesize the full case report for a contract
pub fn synthesize(contract: &Contract) -> CaseReport {
    let report = CaseReport {
        dialect: contract.dialect,
        endpoints: contract.endpoints.iter().map(endpoint_cases).collect(),
    };
    debug!(
        endpoints = report.endpoints.len(),
        identifiers = report.identifier_count(),
        "synthesized identifiers"
    );
    report
}

impl EndpointCases {
    /// Access identifier followed by every parameter identifier
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.access_id.as_str()).chain(
            self.parameters
                .iter()
                .flat_map(|p| p.cases.iter().map(|c| c.identifier.as_str())),
        )
    }
}

impl CaseReport {
    /// Every expected identifier in report order (duplicates kept)
    pub fn identifiers(&self) -> Vec<String> {
        self.endpoints
            .iter()
            .flat_map(|e| e.identifiers())
            .map(str::to_string)
            .collect()
    }

    pub fn identifier_count(&self) -> usize {
        self.endpoints.iter().map(|e| e.identifiers().count()).sum()
    }

    /// Human-readable listing grouped by endpoint
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str("===== Generated Test Case IDs =====\n");

        for endpoint in &self.endpoints {
            out.push_str(&format!("\n[{}] {}\n", endpoint.method, endpoint.path));
            for id in endpoint.identifiers() {
                out.push_str(&format!("- {}\n", id));
            }
        }

        out
    }
}
