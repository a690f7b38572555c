//! CLI tests for the casegen binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONTRACT: &str = r#"openapi: 3.0.0
info:
  title: Users
  version: "1.0"
paths:
  /users/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
"#;

const REPORT: &str = r#"<testsuites>
  <testsuite name="users">
    <testcase name="users_id_get_basic_access"/>
    <testcase name="users_id_id_valid_input"/>
    <testcase name="legacy_check"/>
  </testsuite>
</testsuites>
"#;

fn casegen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("casegen").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn fixtures() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("openapi.yaml"), CONTRACT).unwrap();
    fs::write(dir.path().join("results.xml"), REPORT).unwrap();
    dir
}

#[test]
fn test_generate_prints_grouped_ids() {
    let dir = fixtures();
    casegen(&dir)
        .args(["generate", "openapi.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("===== Generated Test Case IDs ====="))
        .stdout(predicate::str::contains("[GET] /users/{id}"))
        .stdout(predicate::str::contains("- users_id_get_basic_access"))
        .stdout(predicate::str::contains("- users_id_id_boundary_max"));
}

#[test]
fn test_generate_json_output() {
    let dir = fixtures();
    let output = casegen(&dir)
        .args(["generate", "openapi.yaml", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["dialect"], "openapi3");
    assert_eq!(value["endpoints"][0]["access_id"], "users_id_get_basic_access");
    assert_eq!(
        value["endpoints"][0]["parameters"][0]["cases"][2]["kind"],
        "boundary_min"
    );
}

#[test]
fn test_validate_reports_coverage() {
    let dir = fixtures();
    casegen(&dir)
        .args(["validate", "openapi.yaml", "results.xml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Implemented: 2 tests"))
        .stdout(predicate::str::contains("❌ Missing: 3 tests"))
        .stdout(predicate::str::contains("➕ Extra: 1 tests"))
        .stdout(predicate::str::contains("📊 Coverage: 40.0% (2/5"));
}

#[test]
fn test_validate_fail_under() {
    let dir = fixtures();
    casegen(&dir)
        .args(["validate", "openapi.yaml", "results.xml", "--fail-under", "50"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Coverage: 40.0%"))
        .stderr(predicate::str::contains("below the required 50.0%"));
}

#[test]
fn test_config_file_switches_to_json() {
    let dir = fixtures();
    fs::write(dir.path().join(".casegen.yaml"), "output: json\n").unwrap();
    let output = casegen(&dir)
        .args(["validate", "openapi.yaml", "results.xml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["extra"][0], "legacy_check");
    assert_eq!(value["coverage"]["expected"], 5);
    assert_eq!(value["coverage"]["observed"], 3);
}

#[test]
fn test_missing_contract_is_single_line_error() {
    let dir = fixtures();
    casegen(&dir)
        .args(["generate", "nope.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: cannot read nope.yaml"))
        .stderr(predicate::function(|s: &str| s.trim_end().lines().count() == 1));
}

#[test]
fn test_unknown_dialect_fails() {
    let dir = fixtures();
    fs::write(dir.path().join("other.json"), r#"{"asyncapi": "2.6.0"}"#).unwrap();
    casegen(&dir)
        .args(["generate", "other.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: unable to determine specification format",
        ));
}

#[test]
fn test_bad_report_produces_no_partial_output() {
    let dir = fixtures();
    fs::write(dir.path().join("broken.xml"), "<testsuites><testsuite>").unwrap();
    casegen(&dir)
        .args(["validate", "openapi.yaml", "broken.xml"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Report parse error"));
}

#[test]
fn test_schema_command() {
    let dir = fixtures();
    casegen(&dir)
        .args(["schema", "reconciliation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"coverage\""));

    casegen(&dir)
        .args(["schema", "nonsense"])
        .assert()
        .code(1);
}
