//! Fixed-layout text summary.

use crate::report::{CoverageOutcome, TestStatus};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Text summary generator with the fixed field layout.
#[derive(Debug)]
pub struct TextFormatter<'a> {
    outcome: &'a CoverageOutcome,
}

impl<'a> TextFormatter<'a> {
    /// Create a formatter over a computed outcome.
    #[must_use]
    pub const fn new(outcome: &'a CoverageOutcome) -> Self {
        Self { outcome }
    }

    /// Generate the summary block as a string.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);
        let o = self.outcome;

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "RESULTS");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Problem ID:          {}", o.problem_id);
        let _ = writeln!(out, "Tests Passed:        {}/{}", o.passed, o.total);
        let _ = writeln!(out, "Tests Failed:        {}/{}", o.failed, o.total);
        let _ = writeln!(
            out,
            "Statement Coverage:  {:.1}% ({}/{} statements)",
            o.statement_coverage, o.statements_covered, o.statement_total
        );
        let _ = writeln!(out, "Branch Coverage:     {:.1}%", o.branch_coverage);
        let _ = writeln!(out, "\nInterpretation:      {}", o.interpretation);

        if o.failed > 0 {
            let _ = writeln!(out, "\n{rule}");
            let _ = writeln!(out, "FAILED TESTS - Expected vs Actual");
            let _ = writeln!(out, "{rule}");
            for test in o.tests.iter().filter(|t| t.status != TestStatus::Passed) {
                let _ = writeln!(out, "\n\u{274c} Test Case {} FAILED", test.index);
                let _ = writeln!(out, "   Expression: {}", test.text);
                if let (Some(expected), Some(actual)) = (&test.expected, &test.actual) {
                    let _ = writeln!(out, "   Expected: {expected}");
                    let _ = writeln!(out, "   Actual: {actual}");
                }
                if let Some(message) = &test.message {
                    let _ = writeln!(out, "   Error: {message}");
                }
            }
        }

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "HTML Report: {}",
            o.html_path.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "{rule}");
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::executor::execute;
    use crate::loader::candidate_from_source;
    use crate::report::CoverageOutcome;
    use crate::testcase::parse_test_cases;

    fn outcome_of(source: &str, tests: &str) -> CoverageOutcome {
        let candidate = candidate_from_source(source, "mem").unwrap();
        let cases = parse_test_cases(tests).unwrap();
        let execution = execute(&candidate, &cases);
        CoverageOutcome::build("HumanEval_1", &execution, &candidate.plan)
    }

    #[test]
    fn test_summary_fields_present() {
        let outcome = outcome_of(
            "def double(x):\n    return x * 2\n",
            "assert candidate(2) == 4\n",
        );
        let text = TextFormatter::new(&outcome).generate();
        assert!(text.contains("Problem ID:          HumanEval_1"));
        assert!(text.contains("Tests Passed:        1/1"));
        assert!(text.contains("Tests Failed:        0/1"));
        assert!(text.contains("Statement Coverage:  100.0% (1/1 statements)"));
        assert!(text.contains("Branch Coverage:     100.0%"));
        assert!(text.contains("Interpretation:      Excellent coverage - well-tested code"));
    }

    #[test]
    fn test_no_failure_block_when_all_pass() {
        let outcome = outcome_of(
            "def double(x):\n    return x * 2\n",
            "assert candidate(2) == 4\n",
        );
        let text = TextFormatter::new(&outcome).generate();
        assert!(!text.contains("FAILED TESTS"));
    }

    #[test]
    fn test_failure_block_shows_expected_and_actual() {
        let outcome = outcome_of(
            "def double(x):\n    return x * 2\n",
            "assert candidate(2) == 5\n",
        );
        let text = TextFormatter::new(&outcome).generate();
        assert!(text.contains("FAILED TESTS - Expected vs Actual"));
        assert!(text.contains("Test Case 1 FAILED"));
        assert!(text.contains("Expression: assert candidate(2) == 5"));
        assert!(text.contains("Expected: 5"));
        assert!(text.contains("Actual: 4"));
    }

    #[test]
    fn test_errored_case_shows_message() {
        let outcome = outcome_of(
            "def bad(x):\n    return x // 0\n",
            "assert candidate(2) == 5\n",
        );
        let text = TextFormatter::new(&outcome).generate();
        assert!(text.contains("Error: ZeroDivisionError"));
    }

    #[test]
    fn test_html_path_line() {
        let mut outcome = outcome_of(
            "def double(x):\n    return x * 2\n",
            "assert candidate(2) == 4\n",
        );
        outcome.html_path = Some("coverage_reports/HumanEval_1/index.html".to_string());
        let text = TextFormatter::new(&outcome).generate();
        assert!(text.contains("HTML Report: coverage_reports/HumanEval_1/index.html"));
    }
}
