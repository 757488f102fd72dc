//! LCOV trace generator for CI tooling.
//!
//! Record layout:
//!
//! ```text
//! TN:<test name>
//! SF:<source file>
//! DA:<line>,<execution count>
//! LF:<lines found>
//! LH:<lines hit>
//! BRDA:<line>,<block>,<branch>,<taken count or ->
//! BRF:<branches found>
//! BRH:<branches hit>
//! end_of_record
//! ```

use crate::analyzer::StaticPlan;
use crate::coverage::{BranchEdge, CoverageRecord};
use crate::result::CubrirResult;
use std::collections::BTreeMap;
use std::path::Path;

/// LCOV format report generator.
#[derive(Debug)]
pub struct LcovFormatter<'a> {
    origin: &'a str,
    plan: &'a StaticPlan,
    record: &'a CoverageRecord,
    test_name: Option<String>,
}

impl<'a> LcovFormatter<'a> {
    /// Create a new LCOV formatter from a run's static plan and trace.
    #[must_use]
    pub const fn new(origin: &'a str, plan: &'a StaticPlan, record: &'a CoverageRecord) -> Self {
        Self {
            origin,
            plan,
            record,
            test_name: None,
        }
    }

    /// Set the test name for the TN record.
    #[must_use]
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Generate LCOV format report as a string.
    #[must_use]
    pub fn generate(&self) -> String {
        use std::fmt::Write;

        let mut output = String::new();
        let _ = writeln!(output, "TN:{}", self.test_name.as_deref().unwrap_or(""));
        let _ = writeln!(output, "SF:{}", self.origin);

        // Line data: a line counts as hit when any statement on it ran.
        let mut lines: BTreeMap<u32, u64> = BTreeMap::new();
        for info in self.plan.statements() {
            let hit = u64::from(self.record.covers_statement(info.id));
            *lines.entry(info.line).or_insert(0) |= hit;
        }
        let mut lines_hit = 0;
        for (line, count) in &lines {
            let _ = writeln!(output, "DA:{line},{count}");
            if *count > 0 {
                lines_hit += 1;
            }
        }
        let _ = writeln!(output, "LF:{}", lines.len());
        let _ = writeln!(output, "LH:{lines_hit}");

        // Branch data: two directional entries per decision.
        let mut edges_hit = 0;
        for decision in self.plan.decisions() {
            for (branch, outcome) in [(0u32, true), (1u32, false)] {
                let taken = self
                    .record
                    .covers_edge(BranchEdge::new(decision.id, outcome));
                let field = if taken { "1" } else { "-" };
                let _ = writeln!(output, "BRDA:{},0,{branch},{field}", decision.line);
                if taken {
                    edges_hit += 1;
                }
            }
        }
        let _ = writeln!(output, "BRF:{}", self.plan.branch_edge_total());
        let _ = writeln!(output, "BRH:{edges_hit}");

        output.push_str("end_of_record\n");
        output
    }

    /// Save the LCOV report to a file.
    pub fn save(&self, path: &Path) -> CubrirResult<()> {
        std::fs::write(path, self.generate())?;
        Ok(())
    }
}
