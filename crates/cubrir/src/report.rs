//! Aggregation of execution results into a write-once coverage outcome.

use crate::analyzer::StaticPlan;
use crate::executor::{ExecutionOutcome, TestVerdict};
use serde::{Deserialize, Serialize};

/// Percentage of `covered` against `total`. An empty denominator counts
/// as fully covered.
#[must_use]
pub fn percent(covered: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// Round half-up to one decimal place, for display and export.
#[must_use]
pub fn round1(pct: f64) -> f64 {
    (pct * 10.0 + 0.5).floor() / 10.0
}

/// Qualitative reading of the statement coverage percentage.
///
/// Bucketed on the unrounded value, lower bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    /// 90% and up
    #[serde(rename = "Excellent coverage - well-tested code")]
    Excellent,
    /// 80% up to 90%
    #[serde(rename = "Good coverage")]
    Good,
    /// 50% up to 80%
    #[serde(rename = "Moderate line coverage - some untested code paths")]
    Moderate,
    /// below 50%
    #[serde(rename = "Poor coverage - needs more tests")]
    Poor,
}

impl Interpretation {
    /// Bucket an unrounded statement coverage percentage.
    #[must_use]
    pub fn of(statement_pct: f64) -> Self {
        if statement_pct >= 90.0 {
            Self::Excellent
        } else if statement_pct >= 80.0 {
            Self::Good
        } else if statement_pct >= 50.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    /// The full interpretation sentence.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent coverage - well-tested code",
            Self::Good => "Good coverage",
            Self::Moderate => "Moderate line coverage - some untested code paths",
            Self::Poor => "Poor coverage - needs more tests",
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-test diagnostic entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// 1-based test index
    pub index: usize,
    /// Assertion text
    pub text: String,
    /// `passed`, `failed`, or `errored`
    pub status: TestStatus,
    /// Actual value, repr form (failed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Expected value, repr form (failed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Fault message (errored only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Serialized verdict tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Assertion held
    Passed,
    /// Assertion did not hold
    Failed,
    /// Candidate faulted
    Errored,
}

/// The complete result of a coverage run. Serializable as the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageOutcome {
    /// Problem identifier (directory name of the HTML artifact)
    pub problem_id: String,
    /// Passing test count
    pub passed: usize,
    /// Failing test count, faulting cases included
    pub failed: usize,
    /// Total test count
    pub total: usize,
    /// Statements reached
    pub statements_covered: usize,
    /// Countable statements
    pub statement_total: usize,
    /// Statement coverage percent, rounded half-up to one decimal
    pub statement_coverage: f64,
    /// Branch edges traversed
    pub edges_covered: usize,
    /// Total directional branch edges
    pub edge_total: usize,
    /// Branch coverage percent, rounded half-up to one decimal
    pub branch_coverage: f64,
    /// Qualitative bucket of the unrounded statement coverage
    pub interpretation: Interpretation,
    /// Per-test diagnostics in execution order
    pub tests: Vec<TestReport>,
    /// Path of the written HTML report, when one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_path: Option<String>,
    /// Artifact write failure, surfaced without voiding the summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
}

impl CoverageOutcome {
    /// Build an outcome from execution results and the static plan.
    #[must_use]
    pub fn build(problem_id: &str, execution: &ExecutionOutcome, plan: &StaticPlan) -> Self {
        let statements_covered = execution.record.statements_hit();
        let statement_total = plan.statement_total();
        let edges_covered = execution.record.edges_hit();
        let edge_total = plan.branch_edge_total();
        let statement_pct = percent(statements_covered, statement_total);
        let branch_pct = percent(edges_covered, edge_total);
        let tests = execution
            .results
            .iter()
            .map(|result| {
                let (status, actual, expected, message) = match &result.verdict {
                    TestVerdict::Passed => (TestStatus::Passed, None, None, None),
                    TestVerdict::Failed { actual, expected } => (
                        TestStatus::Failed,
                        Some(actual.clone()),
                        Some(expected.clone()),
                        None,
                    ),
                    TestVerdict::Errored { message } => {
                        (TestStatus::Errored, None, None, Some(message.clone()))
                    }
                };
                TestReport {
                    index: result.index,
                    text: result.text.clone(),
                    status,
                    actual,
                    expected,
                    message,
                }
            })
            .collect();
        Self {
            problem_id: problem_id.to_string(),
            passed: execution.passed(),
            failed: execution.failed(),
            total: execution.results.len(),
            statements_covered,
            statement_total,
            statement_coverage: round1(statement_pct),
            edges_covered,
            edge_total,
            branch_coverage: round1(branch_pct),
            interpretation: Interpretation::of(statement_pct),
            tests,
            html_path: None,
            report_error: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::executor::execute;
    use crate::loader::candidate_from_source;
    use crate::testcase::parse_test_cases;
    use proptest::prelude::*;

    fn outcome_of(source: &str, tests: &str) -> CoverageOutcome {
        let candidate = candidate_from_source(source, "mem").unwrap();
        let cases = parse_test_cases(tests).unwrap();
        let execution = execute(&candidate, &cases);
        CoverageOutcome::build("demo", &execution, &candidate.plan)
    }

    #[test]
    fn test_empty_denominator_is_full_coverage() {
        assert_eq!(percent(0, 0), 100.0);
    }

    #[test]
    fn test_round1_half_up() {
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(66.64), 66.6);
        assert_eq!(round1(89.95), 90.0);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(Interpretation::of(90.0), Interpretation::Excellent);
        assert_eq!(Interpretation::of(89.9), Interpretation::Good);
        assert_eq!(Interpretation::of(80.0), Interpretation::Good);
        assert_eq!(Interpretation::of(79.9), Interpretation::Moderate);
        assert_eq!(Interpretation::of(50.0), Interpretation::Moderate);
        assert_eq!(Interpretation::of(49.9), Interpretation::Poor);
    }

    #[test]
    fn test_interpretation_messages() {
        assert_eq!(
            Interpretation::Excellent.to_string(),
            "Excellent coverage - well-tested code"
        );
        assert_eq!(Interpretation::Good.to_string(), "Good coverage");
    }

    #[test]
    fn test_full_coverage_outcome() {
        let outcome = outcome_of(
            "def double(x):\n    return x * 2\n",
            "assert candidate(1) == 2\n",
        );
        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.statement_coverage, 100.0);
        assert_eq!(outcome.branch_coverage, 100.0);
        assert_eq!(outcome.interpretation, Interpretation::Excellent);
    }

    #[test]
    fn test_single_if_one_sided_is_half_branch_coverage() {
        let source = "def clamp(x):\n    if x < 0:\n        x = 0\n    return x\n";
        let outcome = outcome_of(source, "assert candidate(-3) == 0\n");
        assert_eq!(outcome.edge_total, 2);
        assert_eq!(outcome.edges_covered, 1);
        assert_eq!(outcome.branch_coverage, 50.0);
    }

    #[test]
    fn test_single_if_both_sides_is_full_branch_coverage() {
        let source = "def clamp(x):\n    if x < 0:\n        x = 0\n    return x\n";
        let outcome = outcome_of(source, "assert candidate(-3) == 0\nassert candidate(4) == 4\n");
        assert_eq!(outcome.branch_coverage, 100.0);
    }

    #[test]
    fn test_empty_test_list_zero_coverage() {
        let outcome = outcome_of("def f(x):\n    return x\n", "");
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.statement_coverage, 0.0);
        assert_eq!(outcome.interpretation, Interpretation::Poor);
    }

    #[test]
    fn test_reached_within_totals() {
        let source = "def sign(n):\n    if n >= 0:\n        return 1\n    return -1\n";
        let outcome = outcome_of(source, "assert candidate(1) == 1\n");
        assert!(outcome.statements_covered <= outcome.statement_total);
        assert!(outcome.edges_covered <= outcome.edge_total);
    }

    #[test]
    fn test_json_serializes_interpretation_as_sentence() {
        let outcome = outcome_of("def f(x):\n    return x\n", "assert candidate(1) == 1\n");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("Excellent coverage - well-tested code"));
        let back: CoverageOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.interpretation, Interpretation::Excellent);
    }

    #[test]
    fn test_monotone_in_test_prefix() {
        let source = "def sign(n):\n    if n >= 0:\n        return 1\n    return -1\n";
        let one = outcome_of(source, "assert candidate(1) == 1\n");
        let two = outcome_of(source, "assert candidate(1) == 1\nassert candidate(-1) == -1\n");
        assert!(two.statement_coverage >= one.statement_coverage);
        assert!(two.branch_coverage >= one.branch_coverage);
    }

    proptest! {
        #[test]
        fn prop_round1_stays_close(pct in 0.0f64..=100.0) {
            let rounded = round1(pct);
            prop_assert!((rounded - pct).abs() <= 0.05 + 1e-9);
        }

        #[test]
        fn prop_bucket_total(pct in 0.0f64..=100.0) {
            // every percentage lands in exactly one bucket
            let _ = Interpretation::of(pct);
        }

        #[test]
        fn prop_percent_bounded(covered in 0usize..500, extra in 0usize..500) {
            let total = covered + extra;
            let pct = percent(covered, total);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
