//! Test-case generation — derive abstract test cases for a parameter
//!
//! Each [`Strategy`] produces a fixed, ordered list of cases from a base
//! identifier. Suffixes are appended with [`SEPARATOR`]:
//!
//! | Strategy | Suffixes                                                   |
//! |----------|------------------------------------------------------------|
//! | boolean  | `valid_true`, `valid_false`, `invalid_input`               |
//! | integer  | `valid_input`, `invalid_input`, `boundary_min`, `boundary_max` |
//! | number   | `valid_input`, `invalid_input`, `boundary_min`, `boundary_max` |
//! | string   | `valid_input`, `invalid_input`                             |
//! | enum     | `valid_<value>` per value in declared order, `invalid_input` |
//!
//! Boundary cases are placeholders; schema `minimum`/`maximum` are not read.

mod classify;

pub use classify::{classify, Strategy};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between a base identifier and a case suffix
pub const SEPARATOR: char = '_';

pub const VALID_INPUT: &str = "valid_input";
pub const INVALID_INPUT: &str = "invalid_input";
pub const BOUNDARY_MIN: &str = "boundary_min";
pub const BOUNDARY_MAX: &str = "boundary_max";
pub const VALID_TRUE: &str = "valid_true";
pub const VALID_FALSE: &str = "valid_false";
pub const VALID_PREFIX: &str = "valid_";

/// Kind of an abstract test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseKind {
    Valid,
    Invalid,
    BoundaryMin,
    BoundaryMax,
    EnumValue,
}

/// A generated test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AbstractTestCase {
    pub identifier: String,
    pub kind: TestCaseKind,
    pub description: String,
}

impl AbstractTestCase {
    fn new(base_id: &str, suffix: &str, kind: TestCaseKind, description: String) -> Self {
        Self {
            identifier: format!("{}{}{}", base_id, SEPARATOR, suffix),
            kind,
            description,
        }
    }
}

/// Generate the test cases for one parameter
pub fn generate_test_cases(
    base_id: &str,
    declared_type: &str,
    enum_values: &[Value],
) -> Vec<AbstractTestCase> {
    classify(declared_type, enum_values).generate(base_id, enum_values)
}

impl Strategy {
    /// Produce this strategy's fixed case list
    pub fn generate(self, base_id: &str, enum_values: &[Value]) -> Vec<AbstractTestCase> {
        use TestCaseKind::*;

        match self {
            Strategy::Boolean => vec![
                AbstractTestCase::new(base_id, VALID_TRUE, Valid, "Valid boolean true value".into()),
                AbstractTestCase::new(base_id, VALID_FALSE, Valid, "Valid boolean false value".into()),
                AbstractTestCase::new(
                    base_id,
                    INVALID_INPUT,
                    Invalid,
                    "Invalid input for boolean parameter".into(),
                ),
            ],
            Strategy::Integer => numeric(base_id, "integer"),
            Strategy::Number => numeric(base_id, "number"),
            Strategy::String => vec![
                AbstractTestCase::new(base_id, VALID_INPUT, Valid, "Valid string input".into()),
                AbstractTestCase::new(
                    base_id,
                    INVALID_INPUT,
                    Invalid,
                    "Invalid input for string parameter".into(),
                ),
            ],
            Strategy::Enum => {
                let mut cases: Vec<_> = enum_values
                    .iter()
                    .map(|value| {
                        let text = scalar_text(value);
                        AbstractTestCase::new(
                            base_id,
                            &format!("{}{}", VALID_PREFIX, text),
                            EnumValue,
                            format!("Valid enum value: {}", text),
                        )
                    })
                    .collect();
                cases.push(AbstractTestCase::new(
                    base_id,
                    INVALID_INPUT,
                    Invalid,
                    "Invalid input for enum parameter".into(),
                ));
                cases
            }
        }
    }
}

fn numeric(base_id: &str, type_name: &str) -> Vec<AbstractTestCase> {
    vec![
        AbstractTestCase::new(
            base_id,
            VALID_INPUT,
            TestCaseKind::Valid,
            format!("Valid {} input", type_name),
        ),
        AbstractTestCase::new(
            base_id,
            INVALID_INPUT,
            TestCaseKind::Invalid,
            format!("Invalid input for {} parameter", type_name),
        ),
        AbstractTestCase::new(
            base_id,
            BOUNDARY_MIN,
            TestCaseKind::BoundaryMin,
            format!("Minimum boundary value for {}", type_name),
        ),
        AbstractTestCase::new(
            base_id,
            BOUNDARY_MAX,
            TestCaseKind::BoundaryMax,
            format!("Maximum boundary value for {}", type_name),
        ),
    ]
}

/// Text of an enumeration value as it appears in an identifier
///
/// Strings are used verbatim; other scalars use their JSON text.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(cases: &[AbstractTestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.identifier.as_str()).collect()
    }

    #[test]
    fn test_boolean_cases() {
        let cases = generate_test_cases("flags_verbose", "boolean", &[]);
        assert_eq!(
            ids(&cases),
            vec![
                "flags_verbose_valid_true",
                "flags_verbose_valid_false",
                "flags_verbose_invalid_input",
            ]
        );
        let kinds: Vec<_> = cases.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![TestCaseKind::Valid, TestCaseKind::Valid, TestCaseKind::Invalid]
        );
    }

    #[test]
    fn test_integer_and_number_share_suffixes() {
        let int = generate_test_cases("p", "integer", &[]);
        let num = generate_test_cases("p", "number", &[]);
        assert_eq!(ids(&int), ids(&num));
        assert_eq!(
            ids(&int),
            vec!["p_valid_input", "p_invalid_input", "p_boundary_min", "p_boundary_max"]
        );
        assert_eq!(int[2].kind, TestCaseKind::BoundaryMin);
        assert_eq!(int[3].kind, TestCaseKind::BoundaryMax);
        assert_eq!(int[0].description, "Valid integer input");
        assert_eq!(num[0].description, "Valid number input");
    }

    #[test]
    fn test_string_and_fallback_cases() {
        let expected = vec!["p_valid_input", "p_invalid_input"];
        assert_eq!(ids(&generate_test_cases("p", "string", &[])), expected);
        assert_eq!(ids(&generate_test_cases("p", "object", &[])), expected);
        assert_eq!(ids(&generate_test_cases("p", "array[string]", &[])), expected);
    }

    #[test]
    fn test_enum_preserves_declared_order() {
        let values = [json!("zeta"), json!("alpha"), json!("mid")];
        let cases = generate_test_cases("s", "string", &values);
        assert_eq!(
            ids(&cases),
            vec!["s_valid_zeta", "s_valid_alpha", "s_valid_mid", "s_invalid_input"]
        );
        assert!(cases[..3].iter().all(|c| c.kind == TestCaseKind::EnumValue));
        assert_eq!(cases[3].kind, TestCaseKind::Invalid);
    }

    #[test]
    fn test_non_string_enum_values() {
        let values = [json!(1), json!(2.5), json!(true), json!(null)];
        let cases = generate_test_cases("n", "integer", &values);
        assert_eq!(
            ids(&cases),
            vec![
                "n_valid_1",
                "n_valid_2.5",
                "n_valid_true",
                "n_valid_null",
                "n_invalid_input",
            ]
        );
    }
}
