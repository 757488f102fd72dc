//! The library front door: load, execute, aggregate, render.

use crate::executor::execute;
use crate::loader::{candidate_from_source, load_candidate};
use crate::render::{HtmlFormatter, HtmlReportConfig};
use crate::report::CoverageOutcome;
use crate::result::CubrirResult;
use crate::testcase::TestCase;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// End-to-end coverage pipeline.
///
/// Owns the output directory for HTML artifacts; one pipeline can analyze
/// any number of candidates.
#[derive(Debug, Clone)]
pub struct CoveragePipeline {
    output_dir: PathBuf,
    write_html: bool,
    html_config: HtmlReportConfig,
}

impl CoveragePipeline {
    /// New pipeline writing HTML artifacts under `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_html: true,
            html_config: HtmlReportConfig::default(),
        }
    }

    /// Disable the HTML artifact.
    #[must_use]
    pub const fn without_html(mut self) -> Self {
        self.write_html = false;
        self
    }

    /// Set the HTML report configuration.
    #[must_use]
    pub fn with_html_config(mut self, config: HtmlReportConfig) -> Self {
        self.html_config = config;
        self
    }

    /// Analyze a candidate file against an ordered test list.
    ///
    /// Load and parse failures are fatal. An HTML write failure is not:
    /// it lands in `report_error` on an otherwise complete outcome.
    pub fn analyze(
        &self,
        source_path: &Path,
        test_cases: &[TestCase],
        problem_id: &str,
    ) -> CubrirResult<CoverageOutcome> {
        let candidate = load_candidate(source_path)?;
        Ok(self.run(&candidate, test_cases, problem_id))
    }

    /// Analyze in-memory candidate source.
    pub fn analyze_source(
        &self,
        source: &str,
        origin: &str,
        test_cases: &[TestCase],
        problem_id: &str,
    ) -> CubrirResult<CoverageOutcome> {
        let candidate = candidate_from_source(source, origin)?;
        Ok(self.run(&candidate, test_cases, problem_id))
    }

    fn run(
        &self,
        candidate: &crate::loader::Candidate,
        test_cases: &[TestCase],
        problem_id: &str,
    ) -> CoverageOutcome {
        let execution = execute(candidate, test_cases);
        let mut outcome = CoverageOutcome::build(problem_id, &execution, &candidate.plan);
        debug!(
            problem_id,
            passed = outcome.passed,
            failed = outcome.failed,
            statement_coverage = outcome.statement_coverage,
            "analysis complete"
        );

        if self.write_html {
            let formatter = HtmlFormatter::new(
                &outcome,
                &candidate.source,
                &candidate.plan,
                &execution.record,
            )
            .with_config(self.html_config.clone());
            match formatter.save(&self.output_dir) {
                Ok(path) => outcome.html_path = Some(path.display().to_string()),
                Err(e) => {
                    warn!(problem_id, error = %e, "HTML report write failed");
                    outcome.report_error = Some(e.to_string());
                }
            }
        }
        outcome
    }
}
