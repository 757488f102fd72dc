//! Static analysis pass: id assignment and coverage denominators.
//!
//! The analyzer walks the module once in deterministic pre-order, assigns
//! a `StmtId` to every countable statement and a `BranchId` to every
//! decision, and returns the static plan the report divides against.
//! Docstrings are marked and skipped so reached counts can never exceed
//! totals.

use crate::coverage::{BranchId, StmtId};
use crate::lang::{Module, Stmt};

/// Decision point classification, used by report renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// `if`/`elif` test
    If,
    /// `while` test
    While,
    /// `for` iteration (enter vs. exhausted)
    For,
}

impl DecisionKind {
    /// Keyword spelling for report output.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::While => "while",
            Self::For => "for",
        }
    }
}

/// One countable statement in the static plan.
#[derive(Debug, Clone, Copy)]
pub struct StmtInfo {
    /// Statement id (index into the plan)
    pub id: StmtId,
    /// 1-based source line
    pub line: u32,
}

/// One decision point in the static plan.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInfo {
    /// Decision id (index into the plan)
    pub id: BranchId,
    /// 1-based source line of the test
    pub line: u32,
    /// What kind of decision this is
    pub kind: DecisionKind,
}

/// The denominators of a coverage run, fixed before any test executes.
#[derive(Debug, Clone, Default)]
pub struct StaticPlan {
    statements: Vec<StmtInfo>,
    decisions: Vec<DecisionInfo>,
}

impl StaticPlan {
    /// Total countable statements (docstrings excluded).
    #[must_use]
    pub fn statement_total(&self) -> usize {
        self.statements.len()
    }

    /// Total directional branch edges: two per decision.
    #[must_use]
    pub fn branch_edge_total(&self) -> usize {
        self.decisions.len() * 2
    }

    /// Countable statements in id order.
    #[must_use]
    pub fn statements(&self) -> &[StmtInfo] {
        &self.statements
    }

    /// Decision points in id order.
    #[must_use]
    pub fn decisions(&self) -> &[DecisionInfo] {
        &self.decisions
    }

    /// Source line of a statement id, if the id is in the plan.
    #[must_use]
    pub fn statement_line(&self, id: StmtId) -> Option<u32> {
        self.statements.get(id.as_u32() as usize).map(|s| s.line)
    }
}

/// Assign ids to a parsed module and return its static plan.
///
/// Ids are assigned in pre-order over functions in source order, so the
/// same source always yields the same plan.
pub fn instrument(module: &mut Module) -> StaticPlan {
    let mut pass = Instrumenter::default();
    for func in &mut module.functions {
        mark_docstring(&mut func.body);
        pass.visit_block(&mut func.body);
    }
    pass.plan
}

/// Mark a leading bare string literal as a docstring.
fn mark_docstring(body: &mut [Stmt]) {
    if let Some(Stmt::Expr { expr, meta }) = body.first_mut() {
        if expr.is_string_literal() {
            meta.docstring = true;
        }
    }
}

#[derive(Default)]
struct Instrumenter {
    plan: StaticPlan,
}

impl Instrumenter {
    fn next_stmt(&mut self, line: u32) -> StmtId {
        let id = StmtId::new(self.plan.statements.len() as u32);
        self.plan.statements.push(StmtInfo { id, line });
        id
    }

    fn next_decision(&mut self, line: u32, kind: DecisionKind) -> BranchId {
        let id = BranchId::new(self.plan.decisions.len() as u32);
        self.plan.decisions.push(DecisionInfo { id, line, kind });
        id
    }

    fn visit_block(&mut self, body: &mut [Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        if stmt.meta().docstring {
            return;
        }
        let line = stmt.meta().line;
        stmt.meta_mut().id = self.next_stmt(line);
        match stmt {
            Stmt::If {
                decision,
                body,
                orelse,
                ..
            } => {
                *decision = self.next_decision(line, DecisionKind::If);
                self.visit_block(body);
                self.visit_block(orelse);
            }
            Stmt::While { decision, body, .. } => {
                *decision = self.next_decision(line, DecisionKind::While);
                self.visit_block(body);
            }
            Stmt::For { decision, body, .. } => {
                *decision = self.next_decision(line, DecisionKind::For);
                self.visit_block(body);
            }
            _ => {}
        }
    }
}
