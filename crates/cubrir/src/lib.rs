//! Cubrir: Statement and Branch Coverage for Candidate Functions
//!
//! Cubrir (Spanish: "to cover") analyzes a candidate function written in a
//! small Python-flavored scripting subset: it runs an ordered list of
//! assertion test cases against the candidate, records which statements and
//! branch edges executed, and renders text, JSON, LCOV, and HTML reports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CUBRIR Pipeline                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────┐   ┌──────────┐   ┌─────────────┐   ┌─────────┐  │
//! │  │ loader │──►│ analyzer │──►│ interpreter │──►│ report  │  │
//! │  │ parse +│   │ StmtId / │   │ + TraceSink │   │ text /  │  │
//! │  │ entry  │   │ BranchId │   │ per test    │   │ lcov /  │  │
//! │  └────────┘   └──────────┘   └─────────────┘   │ html    │  │
//! │                                                └─────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cubrir::{parse_test_cases, CoveragePipeline};
//!
//! let pipeline = CoveragePipeline::new("coverage_reports").without_html();
//! let cases = parse_test_cases("assert candidate(2) == 4\n").unwrap();
//! let outcome = pipeline
//!     .analyze_source("def double(x):\n    return x * 2\n", "mem", &cases, "demo")
//!     .unwrap();
//! assert_eq!(outcome.passed, 1);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod analyzer;
pub mod coverage;
pub mod executor;
pub mod interp;
pub mod lang;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod result;
pub mod testcase;
pub mod value;

pub use analyzer::{instrument, DecisionKind, StaticPlan};
pub use coverage::{BranchEdge, BranchId, CoverageRecord, StmtId};
pub use executor::{execute, ExecutionOutcome, TestResult, TestVerdict};
pub use interp::{Interpreter, NullSink, TraceSink, DEFAULT_FUEL};
pub use loader::{candidate_from_source, load_candidate, Candidate};
pub use pipeline::CoveragePipeline;
pub use render::{HtmlFormatter, HtmlReportConfig, LcovFormatter, TextFormatter, Theme};
pub use report::{CoverageOutcome, Interpretation, TestReport, TestStatus};
pub use result::{CubrirError, CubrirResult};
pub use testcase::{load_test_cases, parse_test_cases, TestCase};
pub use value::{FaultKind, RuntimeFault, Value};
