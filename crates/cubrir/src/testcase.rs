//! Assertion-style test cases.
//!
//! Each test case is one line in the form
//! `assert candidate([2, 3, 4]) == 1`. The left side is evaluated against
//! the candidate, the right side (when present) in isolation; a bare
//! `assert <expr>` asserts truthiness.

use crate::lang::{parse_expression, CmpOp, Expr};
use crate::result::{CubrirError, CubrirResult};
use std::fs;
use std::path::Path;

/// One parsed assertion.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// 1-based position in the test list
    pub index: usize,
    /// Original assertion text, as shown in failure output
    pub text: String,
    /// Expression whose evaluation drives the candidate
    pub call: Expr,
    /// Expected value expression; `None` asserts the call is truthy
    pub expected: Option<Expr>,
}

impl TestCase {
    /// Parse a single assertion line.
    pub fn parse(index: usize, line: &str) -> CubrirResult<Self> {
        let text = line.trim();
        let body = text.strip_prefix("assert ").unwrap_or(text).trim();
        if body.is_empty() {
            return Err(CubrirError::parse(1, 1, "empty assertion"));
        }
        let expr = parse_expression(body)?;
        let (call, expected) = match expr {
            Expr::Compare {
                op: CmpOp::Eq,
                left,
                right,
            } => (*left, Some(*right)),
            other => (other, None),
        };
        Ok(Self {
            index,
            text: text.to_string(),
            call,
            expected,
        })
    }
}

/// Parse a block of assertion lines, skipping blanks and `#` comments.
///
/// Test order is preserved; indices are 1-based over the kept lines.
pub fn parse_test_cases(text: &str) -> CubrirResult<Vec<TestCase>> {
    let mut cases = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let case = TestCase::parse(cases.len() + 1, trimmed).map_err(|e| match e {
            CubrirError::Parse {
                column, message, ..
            } => CubrirError::parse(line_no as u32 + 1, column, message),
            other => other,
        })?;
        cases.push(case);
    }
    Ok(cases)
}

/// Load test cases from a file.
pub fn load_test_cases(path: &Path) -> CubrirResult<Vec<TestCase>> {
    let text = fs::read_to_string(path)
        .map_err(|e| CubrirError::load(path.display().to_string(), e.to_string()))?;
    parse_test_cases(&text)
}
