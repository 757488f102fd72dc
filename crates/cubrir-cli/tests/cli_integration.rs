//! End-to-end CLI tests for the cubridor binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CANDIDATE: &str = "def sign(n):\n    if n >= 0:\n        return 1\n    return -1\n";

fn write_fixture(dir: &Path, tests: &str) -> (String, String) {
    let candidate = dir.join("cand.py");
    let test_file = dir.join("tests.txt");
    std::fs::write(&candidate, CANDIDATE).unwrap();
    std::fs::write(&test_file, tests).unwrap();
    (
        candidate.display().to_string(),
        test_file.display().to_string(),
    )
}

fn cubridor() -> Command {
    Command::cargo_bin("cubridor").unwrap()
}

#[test]
fn analyze_passing_suite_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (candidate, tests) =
        write_fixture(dir.path(), "assert candidate(3) == 1\nassert candidate(-3) == -1\n");
    cubridor()
        .args([
            "analyze",
            &candidate,
            "--tests",
            &tests,
            "--problem-id",
            "HumanEval_demo",
            "--output-dir",
            dir.path().join("reports").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests Passed:        2/2"))
        .stdout(predicate::str::contains("Statement Coverage:  100.0%"))
        .stdout(predicate::str::contains(
            "Excellent coverage - well-tested code",
        ));
    assert!(dir.path().join("reports/HumanEval_demo/index.html").exists());
}

#[test]
fn analyze_failing_suite_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let (candidate, tests) = write_fixture(dir.path(), "assert candidate(3) == -1\n");
    cubridor()
        .args(["analyze", &candidate, "--tests", &tests, "--no-html"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED TESTS - Expected vs Actual"))
        .stdout(predicate::str::contains("Expected: -1"))
        .stdout(predicate::str::contains("Actual: 1"));
}

#[test]
fn analyze_json_format_emits_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let (candidate, tests) = write_fixture(dir.path(), "assert candidate(3) == 1\n");
    let output = cubridor()
        .args([
            "analyze",
            &candidate,
            "--tests",
            &tests,
            "--format",
            "json",
            "--no-html",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["problem_id"], "cand");
    assert_eq!(json["passed"], 1);
    assert_eq!(json["total"], 1);
}

#[test]
fn analyze_no_html_skips_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (candidate, tests) = write_fixture(dir.path(), "assert candidate(3) == 1\n");
    cubridor()
        .args([
            "analyze",
            &candidate,
            "--tests",
            &tests,
            "--no-html",
            "--output-dir",
            dir.path().join("reports").to_str().unwrap(),
        ])
        .assert()
        .success();
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn missing_candidate_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let tests = dir.path().join("tests.txt");
    std::fs::write(&tests, "assert candidate(1) == 1\n").unwrap();
    cubridor()
        .args([
            "analyze",
            dir.path().join("missing.py").to_str().unwrap(),
            "--tests",
            tests.to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn malformed_test_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let (candidate, tests) = write_fixture(dir.path(), "assert candidate(( == 1\n");
    cubridor()
        .args(["analyze", &candidate, "--tests", &tests, "--no-html"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn help_lists_analyze() {
    cubridor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"));
}
