//! Type classification — pick one generation strategy per parameter

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generation strategy for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Integer,
    Number,
    String,
    Boolean,
    Enum,
}

/// Select the strategy for a declared type and its enumeration
///
/// A non-empty enumeration always wins. Unknown types (`object`,
/// `array[...]`, anything unrecognized) fall back to [`Strategy::String`];
/// this never fails.
pub fn classify(declared_type: &str, enum_values: &[Value]) -> Strategy {
    if !enum_values.is_empty() {
        return Strategy::Enum;
    }

    match declared_type {
        "integer" => Strategy::Integer,
        "number" => Strategy::Number,
        "boolean" => Strategy::Boolean,
        _ => Strategy::String,
    }
}
