//! Line-by-line HTML coverage artifact.
//!
//! The document is fully deterministic for identical inputs: no
//! timestamps, no generated ids, stable iteration order throughout.

use crate::analyzer::StaticPlan;
use crate::coverage::{BranchEdge, CoverageRecord};
use crate::report::CoverageOutcome;
use crate::result::{CubrirError, CubrirResult};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

/// Color theme for the HTML report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light background (default)
    #[default]
    Light,
    /// Dark background
    Dark,
}

/// Configuration for HTML report generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlReportConfig {
    /// Color theme
    pub theme: Theme,
}

/// HTML report generator.
#[derive(Debug)]
pub struct HtmlFormatter<'a> {
    outcome: &'a CoverageOutcome,
    source: &'a str,
    plan: &'a StaticPlan,
    record: &'a CoverageRecord,
    config: HtmlReportConfig,
}

impl<'a> HtmlFormatter<'a> {
    /// Create a formatter over a run's outcome, source, plan, and trace.
    #[must_use]
    pub fn new(
        outcome: &'a CoverageOutcome,
        source: &'a str,
        plan: &'a StaticPlan,
        record: &'a CoverageRecord,
    ) -> Self {
        Self {
            outcome,
            source,
            plan,
            record,
            config: HtmlReportConfig::default(),
        }
    }

    /// Set the report configuration.
    #[must_use]
    pub fn with_config(mut self, config: HtmlReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate the full HTML document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut html = String::new();
        let title = format!("Coverage Report - {}", escape(&self.outcome.problem_id));

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        let _ = writeln!(html, "<style>{}</style>", self.stylesheet());
        html.push_str("</head>\n<body>\n");

        let _ = writeln!(html, "<h1>{title}</h1>");
        self.push_summary(&mut html);
        self.push_source_table(&mut html);
        self.push_branch_table(&mut html);

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write the document to `<output_dir>/<problem_id>/index.html`.
    ///
    /// Returns the written path. Failures are `ReportWrite` errors; the
    /// caller's computed summary stays valid either way.
    pub fn save(&self, output_dir: &Path) -> CubrirResult<std::path::PathBuf> {
        let dir = output_dir.join(&self.outcome.problem_id);
        std::fs::create_dir_all(&dir)
            .map_err(|e| CubrirError::report_write(dir.display().to_string(), e.to_string()))?;
        let path = dir.join("index.html");
        std::fs::write(&path, self.generate())
            .map_err(|e| CubrirError::report_write(path.display().to_string(), e.to_string()))?;
        Ok(path)
    }

    fn stylesheet(&self) -> &'static str {
        match self.config.theme {
            Theme::Light => {
                "body{font-family:monospace;background:#fff;color:#222}\
                 table{border-collapse:collapse}td,th{padding:2px 8px}\
                 .covered{background:#d4f7d4}.uncovered{background:#f7d4d4}\
                 .ignored{color:#999}.summary td:first-child{font-weight:bold}"
            }
            Theme::Dark => {
                "body{font-family:monospace;background:#1e1e1e;color:#ddd}\
                 table{border-collapse:collapse}td,th{padding:2px 8px}\
                 .covered{background:#1e4620}.uncovered{background:#5a1e1e}\
                 .ignored{color:#777}.summary td:first-child{font-weight:bold}"
            }
        }
    }

    fn push_summary(&self, html: &mut String) {
        let o = self.outcome;
        html.push_str("<table class=\"summary\">\n");
        let _ = writeln!(
            html,
            "<tr><td>Tests</td><td>{} passed, {} failed of {}</td></tr>",
            o.passed, o.failed, o.total
        );
        let _ = writeln!(
            html,
            "<tr><td>Statement coverage</td><td>{:.1}% ({}/{})</td></tr>",
            o.statement_coverage, o.statements_covered, o.statement_total
        );
        let _ = writeln!(
            html,
            "<tr><td>Branch coverage</td><td>{:.1}% ({}/{})</td></tr>",
            o.branch_coverage, o.edges_covered, o.edge_total
        );
        let _ = writeln!(
            html,
            "<tr><td>Interpretation</td><td>{}</td></tr>",
            escape(o.interpretation.message())
        );
        html.push_str("</table>\n");
    }

    fn push_source_table(&self, html: &mut String) {
        let mut executable: BTreeSet<u32> = BTreeSet::new();
        let mut covered: BTreeSet<u32> = BTreeSet::new();
        for info in self.plan.statements() {
            executable.insert(info.line);
            if self.record.covers_statement(info.id) {
                covered.insert(info.line);
            }
        }

        html.push_str("<h2>Source</h2>\n<table class=\"source\">\n");
        for (idx, line) in self.source.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let class = if covered.contains(&line_no) {
                "covered"
            } else if executable.contains(&line_no) {
                "uncovered"
            } else {
                "ignored"
            };
            let _ = writeln!(
                html,
                "<tr class=\"{class}\"><td>{line_no}</td><td><pre>{}</pre></td></tr>",
                escape(line)
            );
        }
        html.push_str("</table>\n");
    }

    fn push_branch_table(&self, html: &mut String) {
        if self.plan.decisions().is_empty() {
            return;
        }
        html.push_str("<h2>Branches</h2>\n<table class=\"branches\">\n");
        html.push_str("<tr><th>Line</th><th>Kind</th><th>True</th><th>False</th></tr>\n");
        for decision in self.plan.decisions() {
            let mark = |outcome: bool| {
                if self.record.covers_edge(BranchEdge::new(decision.id, outcome)) {
                    ("covered", "taken")
                } else {
                    ("uncovered", "not taken")
                }
            };
            let (true_class, true_text) = mark(true);
            let (false_class, false_text) = mark(false);
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td class=\"{true_class}\">{true_text}</td>\
                 <td class=\"{false_class}\">{false_text}</td></tr>",
                decision.line,
                decision.kind.keyword()
            );
        }
        html.push_str("</table>\n");
    }
}

/// Minimal HTML entity escaping for text content.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
