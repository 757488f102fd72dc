//! Accumulated execution trace for a test run.

use crate::coverage::{BranchEdge, StmtId};
use crate::interp::TraceSink;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of statements executed and branch edges traversed.
///
/// Ordered sets keep every downstream rendering deterministic. One record
/// accumulates across all test cases of a run; per-test partial traces
/// merge in even when the test faults mid-execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    /// Statements executed at least once
    statements: BTreeSet<StmtId>,
    /// Directional branch edges traversed at least once
    edges: BTreeSet<BranchEdge>,
}

impl CoverageRecord {
    /// New empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct statements hit.
    #[must_use]
    pub fn statements_hit(&self) -> usize {
        self.statements.len()
    }

    /// Number of distinct branch edges traversed.
    #[must_use]
    pub fn edges_hit(&self) -> usize {
        self.edges.len()
    }

    /// Whether a specific statement was executed.
    #[must_use]
    pub fn covers_statement(&self, id: StmtId) -> bool {
        self.statements.contains(&id)
    }

    /// Whether a specific branch edge was traversed.
    #[must_use]
    pub fn covers_edge(&self, edge: BranchEdge) -> bool {
        self.edges.contains(&edge)
    }

    /// Statements hit, in id order.
    pub fn statements(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.statements.iter().copied()
    }

    /// Edges traversed, in encoding order.
    pub fn edges(&self) -> impl Iterator<Item = BranchEdge> + '_ {
        self.edges.iter().copied()
    }

    /// Union another record into this one.
    pub fn merge(&mut self, other: &Self) {
        self.statements.extend(other.statements.iter().copied());
        self.edges.extend(other.edges.iter().copied());
    }
}

impl TraceSink for CoverageRecord {
    fn statement(&mut self, id: StmtId) {
        self.statements.insert(id);
    }

    fn branch(&mut self, edge: BranchEdge) {
        self.edges.insert(edge);
    }
}
