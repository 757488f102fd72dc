//! Sequential test execution against a loaded candidate.
//!
//! Tests run in list order, each with a fresh fuel budget. A failing or
//! faulting test never stops the run, and coverage recorded before a
//! fault is kept.

use crate::coverage::CoverageRecord;
use crate::interp::{Interpreter, NullSink};
use crate::loader::Candidate;
use crate::testcase::TestCase;
use crate::value::Value;
use tracing::debug;

/// Verdict of a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestVerdict {
    /// Assertion held
    Passed,
    /// Assertion evaluated cleanly but did not hold
    Failed {
        /// Actual value, repr form
        actual: String,
        /// Expected value, repr form
        expected: String,
    },
    /// Candidate raised a runtime fault
    Errored {
        /// Fault description
        message: String,
    },
}

impl TestVerdict {
    /// True only for a passing verdict.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one executed test case.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// 1-based test index
    pub index: usize,
    /// Original assertion text
    pub text: String,
    /// Outcome
    pub verdict: TestVerdict,
}

/// Aggregate of an executed test list.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    /// Per-test results in execution order
    pub results: Vec<TestResult>,
    /// Coverage accumulated across every test
    pub record: CoverageRecord,
}

impl ExecutionOutcome {
    /// Number of passing tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.verdict.passed()).count()
    }

    /// Number of failing or faulting tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}

/// Run every test case against the candidate, in order.
#[must_use]
pub fn execute(candidate: &Candidate, cases: &[TestCase]) -> ExecutionOutcome {
    let mut outcome = ExecutionOutcome::default();
    for case in cases {
        let verdict = run_case(candidate, case, &mut outcome.record);
        debug!(index = case.index, passed = verdict.passed(), "test executed");
        outcome.results.push(TestResult {
            index: case.index,
            text: case.text.clone(),
            verdict,
        });
    }
    outcome
}

fn run_case(candidate: &Candidate, case: &TestCase, record: &mut CoverageRecord) -> TestVerdict {
    // Fresh interpreter per test: full fuel budget, clean call depth.
    let mut interp = Interpreter::new(&candidate.module);
    let actual = match interp.eval(&case.call, record) {
        Ok(v) => v,
        Err(fault) => {
            return TestVerdict::Errored {
                message: fault.to_string(),
            }
        }
    };
    match &case.expected {
        Some(expr) => {
            // Expected values evaluate outside coverage collection.
            match interp.eval(expr, &mut NullSink) {
                Ok(expected) if actual.eq_value(&expected) => TestVerdict::Passed,
                Ok(expected) => TestVerdict::Failed {
                    actual: actual.repr(),
                    expected: expected.repr(),
                },
                Err(fault) => TestVerdict::Errored {
                    message: fault.to_string(),
                },
            }
        }
        None if actual.truthy() => TestVerdict::Passed,
        None => TestVerdict::Failed {
            actual: actual.repr(),
            expected: Value::Bool(true).repr(),
        },
    }
}
