//! Abstract syntax tree for the candidate scripting subset.
//!
//! Statement nodes carry a `StmtMeta` with a stable `StmtId` and decision
//! nodes carry a `BranchId`; both are placeholders until the static
//! analyzer's instrumentation pass assigns them in pre-order.

use crate::coverage::{BranchId, StmtId};

/// A parsed module: function definitions plus an optional candidate alias.
///
/// Module-level statements other than `def` and a simple `name = other_name`
/// alias are parsed and discarded; they are never executed or counted.
#[derive(Debug, Clone)]
pub struct Module {
    /// Function definitions in source order
    pub functions: Vec<FunctionDef>,
    /// Right-hand side of a module-level `candidate = <name>` style alias,
    /// keyed as (target, source) pairs in source order
    pub aliases: Vec<(String, String)>,
}

impl Module {
    /// Look up a function definition by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Follow alias chains to a function definition. A function shadows an
    /// alias of the same name, and the latest alias assignment wins.
    /// A dangling alias (or a cycle) resolves to `None`.
    #[must_use]
    pub fn resolve_function(&self, name: &str) -> Option<&FunctionDef> {
        let mut current = name;
        // Alias chains are short; cap to break accidental cycles.
        for _ in 0..8 {
            if let Some(func) = self.function(current) {
                return Some(func);
            }
            match self
                .aliases
                .iter()
                .rev()
                .find(|(target, _)| target == current)
            {
                Some((_, source)) => current = source,
                None => return None,
            }
        }
        None
    }
}

/// A top-level function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Parameter names (type annotations are parsed and dropped)
    pub params: Vec<String>,
    /// Body statements
    pub body: Vec<Stmt>,
    /// 1-based line of the `def` keyword
    pub line: u32,
}

/// Instrumentation metadata attached to every statement node.
#[derive(Debug, Clone)]
pub struct StmtMeta {
    /// Stable statement identifier, assigned by the analyzer
    pub id: StmtId,
    /// 1-based source line
    pub line: u32,
    /// True for a leading string-literal docstring; excluded from totals
    pub docstring: bool,
}

impl StmtMeta {
    /// New metadata for a statement starting at `line`. The id is a
    /// placeholder until the instrumentation pass runs.
    #[must_use]
    pub const fn at(line: u32) -> Self {
        Self {
            id: StmtId::new(0),
            line,
            docstring: false,
        }
    }
}

/// Statements of the candidate language.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Bare expression statement (calls, docstrings)
    Expr {
        /// The expression
        expr: Expr,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `target = value`
    Assign {
        /// Assignment target
        target: Target,
        /// Right-hand side
        value: Expr,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `target <op>= value`
    AugAssign {
        /// Assignment target
        target: Target,
        /// The underlying binary operator
        op: BinOp,
        /// Right-hand side
        value: Expr,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `if test: ... [else: ...]`; `elif` chains nest in `orelse`
    If {
        /// Decision test
        test: Expr,
        /// Branch decision id, assigned by the analyzer
        decision: BranchId,
        /// True-side body
        body: Vec<Stmt>,
        /// False-side body (possibly a nested `If` for `elif`)
        orelse: Vec<Stmt>,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `while test: ...`
    While {
        /// Loop test
        test: Expr,
        /// Branch decision id (enter/skip edges)
        decision: BranchId,
        /// Loop body
        body: Vec<Stmt>,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `for var in iter: ...`
    For {
        /// Loop variable
        var: String,
        /// Iterated expression
        iter: Expr,
        /// Branch decision id (enter/exhausted edges)
        decision: BranchId,
        /// Loop body
        body: Vec<Stmt>,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `return [expr]`
    Return {
        /// Optional return value
        value: Option<Expr>,
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `pass`
    Pass {
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `break`
    Break {
        /// Instrumentation metadata
        meta: StmtMeta,
    },
    /// `continue`
    Continue {
        /// Instrumentation metadata
        meta: StmtMeta,
    },
}

impl Stmt {
    /// Shared access to this statement's metadata.
    #[must_use]
    pub fn meta(&self) -> &StmtMeta {
        match self {
            Self::Expr { meta, .. }
            | Self::Assign { meta, .. }
            | Self::AugAssign { meta, .. }
            | Self::If { meta, .. }
            | Self::While { meta, .. }
            | Self::For { meta, .. }
            | Self::Return { meta, .. }
            | Self::Pass { meta }
            | Self::Break { meta }
            | Self::Continue { meta } => meta,
        }
    }

    /// Mutable access to this statement's metadata.
    pub fn meta_mut(&mut self) -> &mut StmtMeta {
        match self {
            Self::Expr { meta, .. }
            | Self::Assign { meta, .. }
            | Self::AugAssign { meta, .. }
            | Self::If { meta, .. }
            | Self::While { meta, .. }
            | Self::For { meta, .. }
            | Self::Return { meta, .. }
            | Self::Pass { meta }
            | Self::Break { meta }
            | Self::Continue { meta } => meta,
        }
    }
}

/// Assignment targets.
#[derive(Debug, Clone)]
pub enum Target {
    /// Plain variable
    Name(String),
    /// `name[index] = ...`
    Subscript {
        /// Container variable name
        name: String,
        /// Index expression
        index: Expr,
    },
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `in`
    In,
    /// `not in`
    NotIn,
}

/// Short-circuit boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Expressions of the candidate language.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// `None`
    NoneLit,
    /// Variable reference
    Name(String),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// Unary negation `-x`
    Neg(Box<Expr>),
    /// Logical negation `not x`
    Not(Box<Expr>),
    /// Binary arithmetic
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Comparison (single, non-chained)
    Compare {
        /// Operator
        op: CmpOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Short-circuit `and`/`or`; not a branch decision by policy
    Bool2 {
        /// Operator
        op: BoolOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Function call `f(a, b)`
    Call {
        /// Callee name (builtin or module function)
        func: String,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Method call `recv.m(a, b)`
    MethodCall {
        /// Receiver expression
        recv: Box<Expr>,
        /// Method name
        method: String,
        /// Arguments
        args: Vec<Expr>,
    },
    /// Indexing `x[i]`
    Index {
        /// Container expression
        value: Box<Expr>,
        /// Index expression
        index: Box<Expr>,
    },
    /// Slicing `x[a:b]` with optional bounds
    Slice {
        /// Container expression
        value: Box<Expr>,
        /// Lower bound
        lower: Option<Box<Expr>>,
        /// Upper bound
        upper: Option<Box<Expr>>,
    },
}

impl Expr {
    /// True when the expression is a bare string literal (docstring shape).
    #[must_use]
    pub const fn is_string_literal(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}
