//! Reconciliation — compare expected identifiers with observed ones
//!
//! Both inputs are treated as sets: duplicates collapse. The result keeps
//! a stable order so reports can be diffed: `implemented` and `missing`
//! follow the expected order, `extra` follows the observed order.

use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Note attached to the coverage line when nothing was expected
pub const EMPTY_EXPECTED_NOTE: &str = "no expected test identifiers; coverage reported as 0%";

/// Set comparison of expected and observed identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReconciliationResult {
    /// expected ∩ observed
    pub implemented: Vec<String>,
    /// expected − observed
    pub missing: Vec<String>,
    /// observed − expected
    pub extra: Vec<String>,
}

/// Coverage statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoverageSummary {
    pub expected: usize,
    /// Distinct identifiers the report contained
    pub observed: usize,
    pub implemented: usize,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Reconciliation plus coverage, as printed by `validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Reconciliation Report", description = "Expected vs observed test identifiers")]
pub struct ReconciliationReport {
    #[serde(flatten)]
    pub result: ReconciliationResult,
    pub coverage: CoverageSummary,
}

/// Compare expected identifiers with observed identifiers
pub fn reconcile<E, O>(expected: E, observed: O) -> ReconciliationResult
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    O: IntoIterator,
    O::Item: AsRef<str>,
{
    let expected: IndexSet<String> = expected.into_iter().map(|s| s.as_ref().to_string()).collect();
    let observed: IndexSet<String> = observed.into_iter().map(|s| s.as_ref().to_string()).collect();

    let (implemented, missing): (Vec<String>, Vec<String>) = expected
        .iter()
        .cloned()
        .partition(|id| observed.contains(id));
    let extra = observed
        .iter()
        .filter(|id| !expected.contains(*id))
        .cloned()
        .collect();

    let result = ReconciliationResult {
        implemented,
        missing,
        extra,
    };
    info!(
        implemented = result.implemented.len(),
        missing = result.missing.len(),
        extra = result.extra.len(),
        "reconciled test identifiers"
    );
    result
}

impl ReconciliationResult {
    /// Number of distinct expected identifiers
    pub fn expected_count(&self) -> usize {
        self.implemented.len() + self.missing.len()
    }

    /// Number of distinct observed identifiers
    pub fn observed_count(&self) -> usize {
        self.implemented.len() + self.extra.len()
    }

    /// `|implemented| / |expected| * 100`, or 0 when nothing was expected
    pub fn coverage(&self) -> f64 {
        let expected = self.expected_count();
        if expected == 0 {
            return 0.0;
        }
        self.implemented.len() as f64 / expected as f64 * 100.0
    }

    pub fn summary(&self) -> CoverageSummary {
        let expected = self.expected_count();
        CoverageSummary {
            expected,
            observed: self.observed_count(),
            implemented: self.implemented.len(),
            percentage: self.coverage(),
            note: (expected == 0).then(|| EMPTY_EXPECTED_NOTE.to_string()),
        }
    }
}

impl From<ReconciliationResult> for ReconciliationReport {
    fn from(result: ReconciliationResult) -> Self {
        let coverage = result.summary();
        Self { result, coverage }
    }
}

impl ReconciliationReport {
    /// True when coverage reaches `threshold` percent
    pub fn meets(&self, threshold: f64) -> bool {
        self.coverage.percentage >= threshold
    }

    /// Human-readable validation report
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let r = &self.result;

        out.push_str("===== Test Validation Report =====\n");
        out.push_str(&format!("✅ Implemented: {} tests\n", r.implemented.len()));
        out.push_str(&format!("❌ Missing: {} tests\n", r.missing.len()));
        out.push_str(&format!("➕ Extra: {} tests\n", r.extra.len()));

        push_section(&mut out, "✅ IMPLEMENTED TESTS:", &r.implemented);
        push_section(&mut out, "❌ MISSING TESTS:", &r.missing);
        push_section(&mut out, "➕ EXTRA TESTS (not in contract):", &r.extra);

        out.push_str(&format!(
            "\n📊 Coverage: {:.1}% ({}/{} generated tests implemented)\n",
            self.coverage.percentage, self.coverage.implemented, self.coverage.expected
        ));
        if let Some(note) = &self.coverage.note {
            out.push_str(&format!("   Note: {}\n", note));
        }

        out
    }
}

fn push_section(out: &mut String, title: &str, ids: &[String]) {
    if ids.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", title));
    for id in ids {
        out.push_str(&format!("  - {}\n", id));
    }
}
