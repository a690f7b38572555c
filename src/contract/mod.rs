//! Contract loading — normalize OpenAPI 3.0 / Swagger 2.0 documents
//!
//! A contract document is read once, its dialect is detected, and the
//! matching adapter flattens it into an ordered list of
//! [`EndpointDescriptor`]s. Everything downstream works on these
//! descriptors and never touches the raw document again.
//!
//! ## Ordering
//!
//! Extraction is deterministic for a given document:
//! - paths in document order
//! - methods in the fixed order `get, put, post, delete, options, head, patch, trace`
//! - operation parameters, then path-level parameters, then body properties

mod openapi3;
mod swagger2;

pub use openapi3::OpenApi3Adapter;
pub use swagger2::Swagger2Adapter;

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// HTTP methods in extraction order
pub const METHOD_ORDER: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Declared type used when a schema does not say
pub const DEFAULT_TYPE: &str = "string";

/// Contract dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Dialect {
    #[serde(rename = "openapi3")]
    OpenApi3,
    #[serde(rename = "swagger2")]
    Swagger2,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::OpenApi3 => write!(f, "openapi3"),
            Dialect::Swagger2 => write!(f, "swagger2"),
        }
    }
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
    FormData,
}

impl ParameterLocation {
    /// Parse the `in` field of a parameter object
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            "body" => Some(Self::Body),
            "formData" => Some(Self::FormData),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request parameter, normalized across dialects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// One of `integer`, `number`, `string`, `boolean`, `object`, `array[<T>]`
    pub declared_type: String,
    /// Enumeration in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One (path, method) pair and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub path: String,
    /// Upper-case HTTP method (`GET`, `POST`, ...)
    pub http_method: String,
    pub parameters: Vec<ParameterDescriptor>,
}

/// An extracted contract
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub dialect: Dialect,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Extraction options
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Request body media types to expand, first match wins (OpenAPI 3 only)
    pub body_media_types: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            body_media_types: vec!["application/json".to_string()],
        }
    }
}

/// Flattens one contract dialect into endpoint descriptors
pub trait ContractAdapter {
    fn dialect(&self) -> Dialect;

    /// Parse `source` and extract its endpoints in deterministic order
    fn extract(&self, source: &str) -> Result<Vec<EndpointDescriptor>>;
}

/// Select the adapter for a dialect
pub fn adapter_for(dialect: Dialect, options: &ExtractOptions) -> Box<dyn ContractAdapter> {
    match dialect {
        Dialect::OpenApi3 => Box::new(OpenApi3Adapter::new(options.body_media_types.clone())),
        Dialect::Swagger2 => Box::new(Swagger2Adapter),
    }
}

/// Detect the dialect of a contract document
///
/// JSON documents are classified by their top-level `swagger` or `openapi`
/// key. Anything that is not JSON is accepted as OpenAPI 3 only when it
/// begins with the `openapi` token.
pub fn detect_dialect(source: &str) -> Result<Dialect> {
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(map)) => {
            if map.contains_key("swagger") {
                Ok(Dialect::Swagger2)
            } else if map.contains_key("openapi") {
                Ok(Dialect::OpenApi3)
            } else {
                Err(Error::UnknownDialect)
            }
        }
        Ok(_) => Err(Error::UnknownDialect),
        Err(_) => {
            if source.starts_with("openapi") {
                Ok(Dialect::OpenApi3)
            } else {
                Err(Error::UnknownDialect)
            }
        }
    }
}

/// Extract a contract that is already in memory
pub fn parse_contract(source: &str, options: &ExtractOptions) -> Result<Contract> {
    let adapter = adapter_for(detect_dialect(source)?, options);
    let dialect = adapter.dialect();
    debug!(%dialect, "detected contract dialect");

    let endpoints = adapter.extract(source)?;
    Ok(Contract { dialect, endpoints })
}

/// Read and extract a contract file
pub fn load_contract(path: &Path, options: &ExtractOptions) -> Result<Contract> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let contract = parse_contract(&source, options)?;

    info!(
        path = %path.display(),
        dialect = %contract.dialect,
        endpoints = contract.endpoints.len(),
        "contract loaded"
    );
    Ok(contract)
}

/// Keep operation parameters and append path-level ones the operation
/// does not override (same name and location).
pub(crate) fn merge_parameters(
    mut operation: Vec<ParameterDescriptor>,
    path_level: Vec<ParameterDescriptor>,
) -> Vec<ParameterDescriptor> {
    for param in path_level {
        let overridden = operation
            .iter()
            .any(|p| p.name == param.name && p.location == param.location);
        if !overridden {
            operation.push(param);
        }
    }
    operation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_json_dialects() {
        assert_eq!(
            detect_dialect(r#"{"swagger": "2.0", "paths": {}}"#).unwrap(),
            Dialect::Swagger2
        );
        assert_eq!(
            detect_dialect(r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap(),
            Dialect::OpenApi3
        );
    }

    #[test]
    fn test_detect_yaml_openapi() {
        let yaml = "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths: {}\n";
        assert_eq!(detect_dialect(yaml).unwrap(), Dialect::OpenApi3);
    }

    #[test]
    fn test_detect_rejects_unknown() {
        assert!(matches!(
            detect_dialect(r#"{"asyncapi": "2.0"}"#),
            Err(Error::UnknownDialect)
        ));
        assert!(matches!(
            detect_dialect("[1, 2, 3]"),
            Err(Error::UnknownDialect)
        ));
        // YAML swagger is not recognized
        assert!(matches!(
            detect_dialect("swagger: '2.0'\npaths: {}\n"),
            Err(Error::UnknownDialect)
        ));
    }

    #[test]
    fn test_location_round_trip() {
        for name in ["path", "query", "header", "cookie", "body", "formData"] {
            let loc = ParameterLocation::parse(name).unwrap();
            assert_eq!(loc.as_str(), name);
        }
        assert_eq!(ParameterLocation::parse("matrix"), None);
    }

    #[test]
    fn test_merge_parameters_skips_overridden() {
        let param = |name: &str, location, ty: &str| ParameterDescriptor {
            name: name.into(),
            location,
            required: false,
            declared_type: ty.into(),
            enum_values: vec![],
            description: String::new(),
        };

        let merged = merge_parameters(
            vec![param("id", ParameterLocation::Path, "integer")],
            vec![
                param("id", ParameterLocation::Path, "string"),
                param("trace", ParameterLocation::Header, "string"),
            ],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].declared_type, "integer");
        assert_eq!(merged[1].name, "trace");
    }

    #[test]
    fn test_adapter_reports_its_dialect() {
        let options = ExtractOptions::default();
        for dialect in [Dialect::OpenApi3, Dialect::Swagger2] {
            assert_eq!(adapter_for(dialect, &options).dialect(), dialect);
        }

        let contract = parse_contract(r#"{"swagger": "2.0", "paths": {}}"#, &options).unwrap();
        assert_eq!(contract.dialect, Dialect::Swagger2);
        assert!(contract.endpoints.is_empty());
    }
}
