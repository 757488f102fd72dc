//! Tree-walking interpreter for candidate modules.
//!
//! Every executed statement and every decision outcome is reported to a
//! [`TraceSink`] as it happens, so coverage collection is a pure observer
//! of execution. The interpreter never panics on candidate misbehavior:
//! type errors, bad indexing, runaway loops, and deep recursion all
//! surface as [`RuntimeFault`] values.

use crate::coverage::{BranchEdge, StmtId};
use crate::lang::{BinOp, BoolOp, Expr, FunctionDef, Module, Stmt, Target};
use crate::value::{FaultKind, RuntimeFault, Value};
use std::collections::HashMap;

/// Default statement fuel per test case. Generous for real candidates,
/// small enough to cut off an infinite loop in well under a second.
pub const DEFAULT_FUEL: u64 = 10_000_000;

/// Maximum interpreter call depth. Keeps recursive candidates from
/// overflowing the host stack.
pub const MAX_CALL_DEPTH: u32 = 200;

/// Observer of statement executions and branch-edge traversals.
///
/// The coverage collector implements this; tests can plug in their own
/// recording sinks.
pub trait TraceSink {
    /// An executable statement ran.
    fn statement(&mut self, id: StmtId);
    /// A decision resolved to one of its two directional edges.
    fn branch(&mut self, edge: BranchEdge);
}

/// Sink that discards every event. Used when evaluating expected-value
/// expressions, which must not pollute candidate coverage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn statement(&mut self, _id: StmtId) {}
    fn branch(&mut self, _edge: BranchEdge) {}
}

/// Non-local control flow out of a statement.
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

type Env = HashMap<String, Value>;

/// Interpreter over a parsed (and usually instrumented) module.
pub struct Interpreter<'m> {
    module: &'m Module,
    fuel: u64,
    depth: u32,
}

impl<'m> Interpreter<'m> {
    /// New interpreter with the default fuel budget.
    #[must_use]
    pub const fn new(module: &'m Module) -> Self {
        Self::with_fuel(module, DEFAULT_FUEL)
    }

    /// New interpreter with an explicit fuel budget.
    #[must_use]
    pub const fn with_fuel(module: &'m Module, fuel: u64) -> Self {
        Self {
            module,
            fuel,
            depth: 0,
        }
    }

    /// Call a module function by name. Alias names resolve transitively.
    pub fn call(
        &mut self,
        name: &str,
        args: Vec<Value>,
        sink: &mut dyn TraceSink,
    ) -> Result<Value, RuntimeFault> {
        let func = self.resolve(name).ok_or_else(|| {
            RuntimeFault::new(FaultKind::Name, format!("name '{name}' is not defined"))
        })?;
        if args.len() != func.params.len() {
            return Err(RuntimeFault::new(
                FaultKind::Type,
                format!(
                    "{}() takes {} arguments ({} given)",
                    func.name,
                    func.params.len(),
                    args.len()
                ),
            ));
        }
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeFault::new(
                FaultKind::RecursionLimit,
                "maximum call depth exceeded",
            ));
        }
        self.depth += 1;
        let mut env: Env = func.params.iter().cloned().zip(args).collect();
        let result = self.exec_block(&func.body, &mut env, sink);
        self.depth -= 1;
        match result? {
            Flow::Return(v) => Ok(v),
            _ => Ok(Value::None),
        }
    }

    /// Evaluate a standalone expression in an empty environment.
    ///
    /// Used for assertion right-hand sides and call argument literals.
    pub fn eval(
        &mut self,
        expr: &Expr,
        sink: &mut dyn TraceSink,
    ) -> Result<Value, RuntimeFault> {
        let mut env = Env::new();
        self.eval_expr(expr, &mut env, sink)
    }

    /// Follow alias chains to a function definition.
    fn resolve(&self, name: &str) -> Option<&'m FunctionDef> {
        self.module.resolve_function(name)
    }

    fn charge(&mut self) -> Result<(), RuntimeFault> {
        if self.fuel == 0 {
            return Err(RuntimeFault::new(
                FaultKind::FuelExhausted,
                "execution budget exhausted (possible infinite loop)",
            ));
        }
        self.fuel -= 1;
        Ok(())
    }

    fn exec_block(
        &mut self,
        body: &[Stmt],
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Flow, RuntimeFault> {
        for stmt in body {
            match self.exec_stmt(stmt, env, sink)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(
        &mut self,
        stmt: &Stmt,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Flow, RuntimeFault> {
        // Docstrings are inert: no execution, no trace event.
        if stmt.meta().docstring {
            return Ok(Flow::Normal);
        }
        self.charge()?;
        sink.statement(stmt.meta().id);

        match stmt {
            Stmt::Expr { expr, .. } => {
                self.eval_expr(expr, env, sink)?;
                Ok(Flow::Normal)
            }
            Stmt::Assign { target, value, .. } => {
                let value = self.eval_expr(value, env, sink)?;
                self.assign(target, value, env, sink)?;
                Ok(Flow::Normal)
            }
            Stmt::AugAssign {
                target, op, value, ..
            } => {
                let current = self.read_target(target, env, sink)?;
                let rhs = self.eval_expr(value, env, sink)?;
                let updated = Value::binary(*op, &current, &rhs)?;
                self.assign(target, updated, env, sink)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                test,
                decision,
                body,
                orelse,
                ..
            } => {
                let taken = self.eval_expr(test, env, sink)?.truthy();
                sink.branch(BranchEdge::new(*decision, taken));
                if taken {
                    self.exec_block(body, env, sink)
                } else {
                    self.exec_block(orelse, env, sink)
                }
            }
            Stmt::While {
                test,
                decision,
                body,
                ..
            } => {
                loop {
                    self.charge()?;
                    let taken = self.eval_expr(test, env, sink)?.truthy();
                    sink.branch(BranchEdge::new(*decision, taken));
                    if !taken {
                        break;
                    }
                    match self.exec_block(body, env, sink)? {
                        Flow::Normal | Flow::Continue => {}
                        // break leaves the loop without a false edge
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                var,
                iter,
                decision,
                body,
                ..
            } => {
                let items = self.iterate(iter, env, sink)?;
                let mut broke = false;
                for item in items {
                    self.charge()?;
                    sink.branch(BranchEdge::new(*decision, true));
                    env.insert(var.clone(), item);
                    match self.exec_block(body, env, sink)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => {
                            broke = true;
                            break;
                        }
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                // The exhausted edge fires only on natural loop exit.
                if !broke {
                    sink.branch(BranchEdge::new(*decision, false));
                }
                Ok(Flow::Normal)
            }
            Stmt::Return { value, .. } => {
                let result = match value {
                    Some(expr) => self.eval_expr(expr, env, sink)?,
                    None => Value::None,
                };
                Ok(Flow::Return(result))
            }
            Stmt::Pass { .. } => Ok(Flow::Normal),
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
        }
    }

    fn assign(
        &mut self,
        target: &Target,
        value: Value,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<(), RuntimeFault> {
        match target {
            Target::Name(name) => {
                env.insert(name.clone(), value);
                Ok(())
            }
            Target::Subscript { name, index } => {
                let index = self.eval_expr(index, env, sink)?;
                let slot = env.get_mut(name).ok_or_else(|| {
                    RuntimeFault::new(FaultKind::Name, format!("name '{name}' is not defined"))
                })?;
                match slot {
                    Value::List(xs) => {
                        let i = list_index(&index, xs.len())?;
                        xs[i] = value;
                        Ok(())
                    }
                    other => Err(RuntimeFault::new(
                        FaultKind::Type,
                        format!(
                            "'{}' object does not support item assignment",
                            other.type_name()
                        ),
                    )),
                }
            }
        }
    }

    fn read_target(
        &mut self,
        target: &Target,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Value, RuntimeFault> {
        match target {
            Target::Name(name) => lookup(env, name),
            Target::Subscript { name, index } => {
                let container = lookup(env, name)?;
                let index = self.eval_expr(index, env, sink)?;
                index_value(&container, &index)
            }
        }
    }

    /// Materialize an iterable expression into a list of items.
    fn iterate(
        &mut self,
        iter: &Expr,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Vec<Value>, RuntimeFault> {
        match self.eval_expr(iter, env, sink)? {
            Value::List(xs) => Ok(xs),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            other => Err(RuntimeFault::new(
                FaultKind::Type,
                format!("'{}' object is not iterable", other.type_name()),
            )),
        }
    }

    fn eval_expr(
        &mut self,
        expr: &Expr,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Value, RuntimeFault> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(v) => Ok(Value::Bool(*v)),
            Expr::NoneLit => Ok(Value::None),
            Expr::Name(name) => lookup(env, name),
            Expr::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_expr(item, env, sink)?);
                }
                Ok(Value::List(out))
            }
            Expr::Neg(inner) => self.eval_expr(inner, env, sink)?.neg(),
            Expr::Not(inner) => Ok(Value::Bool(!self.eval_expr(inner, env, sink)?.truthy())),
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left, env, sink)?;
                let right = self.eval_expr(right, env, sink)?;
                Value::binary(*op, &left, &right)
            }
            Expr::Compare { op, left, right } => {
                let left = self.eval_expr(left, env, sink)?;
                let right = self.eval_expr(right, env, sink)?;
                Value::compare(*op, &left, &right).map(Value::Bool)
            }
            // Short-circuit operators yield the deciding operand, and by
            // policy they are not branch decisions.
            Expr::Bool2 { op, left, right } => {
                let left = self.eval_expr(left, env, sink)?;
                match (op, left.truthy()) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => Ok(left),
                    _ => self.eval_expr(right, env, sink),
                }
            }
            Expr::Call { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg, env, sink)?);
                }
                if self.resolve(func).is_some() {
                    self.call(func, values, sink)
                } else {
                    call_builtin(func, &values)
                }
            }
            Expr::MethodCall { recv, method, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg, env, sink)?);
                }
                self.eval_method(recv, method, values, env, sink)
            }
            Expr::Index { value, index } => {
                let container = self.eval_expr(value, env, sink)?;
                let index = self.eval_expr(index, env, sink)?;
                index_value(&container, &index)
            }
            Expr::Slice {
                value,
                lower,
                upper,
            } => {
                let container = self.eval_expr(value, env, sink)?;
                let lower = match lower {
                    Some(e) => Some(self.eval_expr(e, env, sink)?),
                    None => None,
                };
                let upper = match upper {
                    Some(e) => Some(self.eval_expr(e, env, sink)?),
                    None => None,
                };
                slice_value(&container, lower.as_ref(), upper.as_ref())
            }
        }
    }

    fn eval_method(
        &mut self,
        recv: &Expr,
        method: &str,
        args: Vec<Value>,
        env: &mut Env,
        sink: &mut dyn TraceSink,
    ) -> Result<Value, RuntimeFault> {
        // Mutating list methods need the variable slot, not a copy.
        if matches!(method, "append" | "pop") {
            if let Expr::Name(name) = recv {
                let slot = env.get_mut(name).ok_or_else(|| {
                    RuntimeFault::new(FaultKind::Name, format!("name '{name}' is not defined"))
                })?;
                if let Value::List(xs) = slot {
                    return list_mutate(xs, method, &args);
                }
            }
        }
        let receiver = self.eval_expr(recv, env, sink)?;
        match receiver {
            Value::Str(s) => str_method(&s, method, &args),
            Value::List(mut xs) => {
                if matches!(method, "append" | "pop") {
                    // Mutation of a temporary; result observable, list is not.
                    list_mutate(&mut xs, method, &args)
                } else {
                    Err(unknown_method("list", method))
                }
            }
            other => Err(unknown_method(other.type_name(), method)),
        }
    }
}

fn lookup(env: &Env, name: &str) -> Result<Value, RuntimeFault> {
    env.get(name).cloned().ok_or_else(|| {
        RuntimeFault::new(FaultKind::Name, format!("name '{name}' is not defined"))
    })
}

fn unknown_method(type_name: &str, method: &str) -> RuntimeFault {
    RuntimeFault::new(
        FaultKind::Type,
        format!("'{type_name}' object has no method '{method}'"),
    )
}

fn arity_fault(what: &str, expected: &str, got: usize) -> RuntimeFault {
    RuntimeFault::new(
        FaultKind::Type,
        format!("{what}() takes {expected} arguments ({got} given)"),
    )
}

/// Normalize a (possibly negative) index against a container length.
fn list_index(index: &Value, len: usize) -> Result<usize, RuntimeFault> {
    let raw = match index {
        Value::Int(v) => *v,
        Value::Bool(v) => i64::from(*v),
        other => {
            return Err(RuntimeFault::new(
                FaultKind::Type,
                format!("indices must be integers, not '{}'", other.type_name()),
            ))
        }
    };
    let len_i = len as i64;
    let adjusted = if raw < 0 { raw + len_i } else { raw };
    if adjusted < 0 || adjusted >= len_i {
        return Err(RuntimeFault::new(
            FaultKind::Index,
            format!("index {raw} out of range for length {len}"),
        ));
    }
    Ok(adjusted as usize)
}

fn index_value(container: &Value, index: &Value) -> Result<Value, RuntimeFault> {
    match container {
        Value::List(xs) => {
            let i = list_index(index, xs.len())?;
            Ok(xs[i].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let i = list_index(index, chars.len())?;
            Ok(Value::Str(chars[i].to_string()))
        }
        other => Err(RuntimeFault::new(
            FaultKind::Type,
            format!("'{}' object is not subscriptable", other.type_name()),
        )),
    }
}

/// Clamped slice bound resolution: out-of-range bounds never fault.
fn slice_bounds(
    lower: Option<&Value>,
    upper: Option<&Value>,
    len: usize,
) -> Result<(usize, usize), RuntimeFault> {
    let resolve = |bound: Option<&Value>, default: i64| -> Result<i64, RuntimeFault> {
        match bound {
            None => Ok(default),
            Some(Value::Int(v)) => Ok(*v),
            Some(Value::Bool(v)) => Ok(i64::from(*v)),
            Some(other) => Err(RuntimeFault::new(
                FaultKind::Type,
                format!("slice indices must be integers, not '{}'", other.type_name()),
            )),
        }
    };
    let len_i = len as i64;
    let clamp = |v: i64| -> usize {
        let adjusted = if v < 0 { v + len_i } else { v };
        adjusted.clamp(0, len_i) as usize
    };
    let start = clamp(resolve(lower, 0)?);
    let stop = clamp(resolve(upper, len_i)?);
    Ok((start, stop.max(start)))
}

fn slice_value(
    container: &Value,
    lower: Option<&Value>,
    upper: Option<&Value>,
) -> Result<Value, RuntimeFault> {
    match container {
        Value::List(xs) => {
            let (start, stop) = slice_bounds(lower, upper, xs.len())?;
            Ok(Value::List(xs[start..stop].to_vec()))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (start, stop) = slice_bounds(lower, upper, chars.len())?;
            Ok(Value::Str(chars[start..stop].iter().collect()))
        }
        other => Err(RuntimeFault::new(
            FaultKind::Type,
            format!("'{}' object is not subscriptable", other.type_name()),
        )),
    }
}

fn list_mutate(xs: &mut Vec<Value>, method: &str, args: &[Value]) -> Result<Value, RuntimeFault> {
    match method {
        "append" => match args {
            [item] => {
                xs.push(item.clone());
                Ok(Value::None)
            }
            _ => Err(arity_fault("append", "1", args.len())),
        },
        "pop" => {
            let i = match args {
                [] => {
                    if xs.is_empty() {
                        return Err(RuntimeFault::new(FaultKind::Index, "pop from empty list"));
                    }
                    xs.len() - 1
                }
                [index] => list_index(index, xs.len())?,
                _ => return Err(arity_fault("pop", "at most 1", args.len())),
            };
            Ok(xs.remove(i))
        }
        _ => Err(unknown_method("list", method)),
    }
}

fn str_method(s: &str, method: &str, args: &[Value]) -> Result<Value, RuntimeFault> {
    let expect_str = |v: &Value| -> Result<String, RuntimeFault> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            other => Err(RuntimeFault::new(
                FaultKind::Type,
                format!("expected a str argument, got '{}'", other.type_name()),
            )),
        }
    };
    match (method, args) {
        ("upper", []) => Ok(Value::Str(s.to_uppercase())),
        ("lower", []) => Ok(Value::Str(s.to_lowercase())),
        ("strip", []) => Ok(Value::Str(s.trim().to_string())),
        ("isdigit", []) => Ok(Value::Bool(
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
        )),
        ("replace", [from, to]) => {
            let from = expect_str(from)?;
            let to = expect_str(to)?;
            Ok(Value::Str(s.replace(&from, &to)))
        }
        ("split", []) => Ok(Value::List(
            s.split_whitespace()
                .map(|part| Value::Str(part.to_string()))
                .collect(),
        )),
        ("split", [sep]) => {
            let sep = expect_str(sep)?;
            Ok(Value::List(
                s.split(sep.as_str())
                    .map(|part| Value::Str(part.to_string()))
                    .collect(),
            ))
        }
        ("join", [Value::List(xs)]) => {
            let mut parts = Vec::with_capacity(xs.len());
            for x in xs {
                parts.push(expect_str(x)?);
            }
            Ok(Value::Str(parts.join(s)))
        }
        ("startswith", [prefix]) => Ok(Value::Bool(s.starts_with(expect_str(prefix)?.as_str()))),
        ("endswith", [suffix]) => Ok(Value::Bool(s.ends_with(expect_str(suffix)?.as_str()))),
        _ => Err(unknown_method("str", method)),
    }
}

/// Intrinsic functions available to every candidate.
fn call_builtin(name: &str, args: &[Value]) -> Result<Value, RuntimeFault> {
    match (name, args) {
        ("len", [Value::Str(s)]) => Ok(Value::Int(s.chars().count() as i64)),
        ("len", [Value::List(xs)]) => Ok(Value::Int(xs.len() as i64)),
        ("len", [other]) => Err(RuntimeFault::new(
            FaultKind::Type,
            format!("object of type '{}' has no len()", other.type_name()),
        )),
        ("abs", [Value::Int(v)]) => v
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeFault::new(FaultKind::Overflow, "integer overflow")),
        ("abs", [Value::Float(v)]) => Ok(Value::Float(v.abs())),
        ("min" | "max", args) => min_max(name, args),
        ("sum", [Value::List(xs)]) => {
            let mut total = Value::Int(0);
            for x in xs {
                total = Value::binary(BinOp::Add, &total, x)?;
            }
            Ok(total)
        }
        ("sorted", [Value::List(xs)]) => {
            let mut out = xs.clone();
            let mut fault = None;
            out.sort_by(|a, b| match a.cmp_value(b) {
                Ok(ord) => ord,
                Err(e) => {
                    fault.get_or_insert(e);
                    std::cmp::Ordering::Equal
                }
            });
            match fault {
                Some(e) => Err(e),
                None => Ok(Value::List(out)),
            }
        }
        ("range", args) => builtin_range(args),
        ("int", [v]) => builtin_int(v),
        ("float", [v]) => builtin_float(v),
        ("str", [v]) => Ok(Value::Str(v.display())),
        ("bool", [v]) => Ok(Value::Bool(v.truthy())),
        ("len" | "abs" | "sum" | "sorted" | "int" | "float" | "str" | "bool", args) => {
            Err(arity_fault(name, "1", args.len()))
        }
        _ => Err(RuntimeFault::new(
            FaultKind::Name,
            format!("name '{name}' is not defined"),
        )),
    }
}

fn min_max(name: &str, args: &[Value]) -> Result<Value, RuntimeFault> {
    let items: &[Value] = match args {
        [Value::List(xs)] => xs,
        [] => return Err(arity_fault(name, "at least 1", 0)),
        other => other,
    };
    let mut best = match items.first() {
        Some(v) => v.clone(),
        None => {
            return Err(RuntimeFault::new(
                FaultKind::Conversion,
                format!("{name}() arg is an empty sequence"),
            ))
        }
    };
    for item in &items[1..] {
        let ord = item.cmp_value(&best)?;
        let better = if name == "min" {
            ord == std::cmp::Ordering::Less
        } else {
            ord == std::cmp::Ordering::Greater
        };
        if better {
            best = item.clone();
        }
    }
    Ok(best)
}

/// Largest list `range()` will materialize before faulting.
const MAX_RANGE_LEN: usize = 1_000_000;

fn builtin_range(args: &[Value]) -> Result<Value, RuntimeFault> {
    let as_int = |v: &Value| -> Result<i64, RuntimeFault> {
        match v {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(RuntimeFault::new(
                FaultKind::Type,
                format!("range() argument must be int, not '{}'", other.type_name()),
            )),
        }
    };
    let (start, stop, step) = match args {
        [stop] => (0, as_int(stop)?, 1),
        [start, stop] => (as_int(start)?, as_int(stop)?, 1),
        [start, stop, step] => (as_int(start)?, as_int(stop)?, as_int(step)?),
        _ => return Err(arity_fault("range", "1 to 3", args.len())),
    };
    if step == 0 {
        return Err(RuntimeFault::new(
            FaultKind::Conversion,
            "range() step must not be zero",
        ));
    }
    let mut out = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        if out.len() >= MAX_RANGE_LEN {
            return Err(RuntimeFault::new(
                FaultKind::FuelExhausted,
                "range() result exceeds the execution budget",
            ));
        }
        out.push(Value::Int(current));
        // A step past the i64 limit means the bound is already exceeded.
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(Value::List(out))
}

fn builtin_int(value: &Value) -> Result<Value, RuntimeFault> {
    match value {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Bool(v) => Ok(Value::Int(i64::from(*v))),
        Value::Float(v) => Ok(Value::Int(v.trunc() as i64)),
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeFault::new(
                FaultKind::Conversion,
                format!("invalid literal for int(): '{s}'"),
            )
        }),
        other => Err(RuntimeFault::new(
            FaultKind::Type,
            format!("int() argument must be a number or str, not '{}'", other.type_name()),
        )),
    }
}

fn builtin_float(value: &Value) -> Result<Value, RuntimeFault> {
    match value {
        Value::Int(v) => Ok(Value::Float(*v as f64)),
        Value::Bool(v) => Ok(Value::Float(f64::from(u8::from(*v)))),
        Value::Float(v) => Ok(Value::Float(*v)),
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            RuntimeFault::new(
                FaultKind::Conversion,
                format!("could not convert string to float: '{s}'"),
            )
        }),
        other => Err(RuntimeFault::new(
            FaultKind::Type,
            format!(
                "float() argument must be a number or str, not '{}'",
                other.type_name()
            ),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::lang::parse_module;

    #[derive(Default)]
    struct RecordingSink {
        stmts: Vec<StmtId>,
        edges: Vec<BranchEdge>,
    }

    impl TraceSink for RecordingSink {
        fn statement(&mut self, id: StmtId) {
            self.stmts.push(id);
        }
        fn branch(&mut self, edge: BranchEdge) {
            self.edges.push(edge);
        }
    }

    fn run(source: &str, func: &str, args: Vec<Value>) -> Result<Value, RuntimeFault> {
        let module = parse_module(source).unwrap();
        let mut interp = Interpreter::new(&module);
        interp.call(func, args, &mut NullSink)
    }

    #[test]
    fn test_arithmetic_function() {
        let v = run(
            "def add(a, b):\n    return a + b\n",
            "add",
            vec![Value::Int(2), Value::Int(3)],
        )
        .unwrap();
        assert_eq!(v, Value::Int(5));
    }

    #[test]
    fn test_while_loop_accumulates() {
        let source = "def triangle(n):\n    total = 0\n    i = 1\n    while i <= n:\n        total += i\n        i += 1\n    return total\n";
        let v = run(source, "triangle", vec![Value::Int(4)]).unwrap();
        assert_eq!(v, Value::Int(10));
    }

    #[test]
    fn test_for_loop_over_list() {
        let source = "def total(xs):\n    acc = 0\n    for x in xs:\n        acc += x\n    return acc\n";
        let xs = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(run(source, "total", vec![xs]).unwrap(), Value::Int(6));
    }

    #[test]
    fn test_for_loop_over_string_chars() {
        let source = "def count_a(s):\n    n = 0\n    for c in s:\n        if c == 'a':\n            n += 1\n    return n\n";
        let v = run(source, "count_a", vec![Value::Str("banana".to_string())]).unwrap();
        assert_eq!(v, Value::Int(3));
    }

    #[test]
    fn test_break_and_continue() {
        let source = "def first_even(xs):\n    found = -1\n    for x in xs:\n        if x % 2 != 0:\n            continue\n        found = x\n        break\n    return found\n";
        let xs = Value::List(vec![Value::Int(3), Value::Int(5), Value::Int(8), Value::Int(4)]);
        assert_eq!(run(source, "first_even", vec![xs]).unwrap(), Value::Int(8));
    }

    #[test]
    fn test_recursion() {
        let source = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n";
        assert_eq!(run(source, "fib", vec![Value::Int(10)]).unwrap(), Value::Int(55));
    }

    #[test]
    fn test_recursion_limit() {
        let source = "def down(n):\n    return down(n + 1)\n";
        let err = run(source, "down", vec![Value::Int(0)]).unwrap_err();
        assert_eq!(err.kind, FaultKind::RecursionLimit);
    }

    #[test]
    fn test_fuel_exhaustion_on_infinite_loop() {
        let source = "def spin():\n    while True:\n        pass\n";
        let module = parse_module(source).unwrap();
        let mut interp = Interpreter::with_fuel(&module, 1_000);
        let err = interp.call("spin", vec![], &mut NullSink).unwrap_err();
        assert_eq!(err.kind, FaultKind::FuelExhausted);
    }

    #[test]
    fn test_alias_resolves_to_function() {
        let source = "def double(x):\n    return x * 2\n\ncandidate = double\n";
        assert_eq!(
            run(source, "candidate", vec![Value::Int(21)]).unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn test_latest_alias_assignment_wins() {
        let source = "def a(x):\n    return 1\n\ndef b(x):\n    return 2\n\ncandidate = a\ncandidate = b\n";
        assert_eq!(
            run(source, "candidate", vec![Value::Int(0)]).unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn test_helper_function_call() {
        let source = "def square(x):\n    return x * x\n\ndef sum_squares(a, b):\n    return square(a) + square(b)\n";
        let v = run(source, "sum_squares", vec![Value::Int(3), Value::Int(4)]).unwrap();
        assert_eq!(v, Value::Int(25));
    }

    #[test]
    fn test_undefined_name_faults() {
        let err = run("def f():\n    return missing\n", "f", vec![]).unwrap_err();
        assert_eq!(err.kind, FaultKind::Name);
    }

    #[test]
    fn test_arity_mismatch_faults() {
        let err = run("def f(a):\n    return a\n", "f", vec![]).unwrap_err();
        assert_eq!(err.kind, FaultKind::Type);
    }

    #[test]
    fn test_list_append_mutates_variable() {
        let source = "def evens(xs):\n    out = []\n    for x in xs:\n        if x % 2 == 0:\n            out.append(x)\n    return out\n";
        let xs = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
        let v = run(source, "evens", vec![xs]).unwrap();
        assert_eq!(v, Value::List(vec![Value::Int(2), Value::Int(4)]));
    }

    #[test]
    fn test_subscript_assignment() {
        let source = "def zero_first(xs):\n    xs[0] = 0\n    return xs\n";
        let xs = Value::List(vec![Value::Int(9), Value::Int(8)]);
        let v = run(source, "zero_first", vec![xs]).unwrap();
        assert_eq!(v, Value::List(vec![Value::Int(0), Value::Int(8)]));
    }

    #[test]
    fn test_slicing_and_negative_index() {
        let source = "def tail(xs):\n    return xs[1:]\n\ndef last(xs):\n    return xs[-1]\n";
        let xs = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(
            run(source, "tail", vec![xs.clone()]).unwrap(),
            Value::List(vec![Value::Int(2), Value::Int(3)])
        );
        assert_eq!(run(source, "last", vec![xs]).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_builtin_range_and_sum() {
        let source = "def total(n):\n    return sum(range(n + 1))\n";
        assert_eq!(run(source, "total", vec![Value::Int(4)]).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_range_at_integer_limit_terminates() {
        let source =
            "def f():\n    return range(9223372036854775806, 9223372036854775807, 2)\n";
        let v = run(source, "f", vec![]).unwrap();
        assert_eq!(v, Value::List(vec![Value::Int(9_223_372_036_854_775_806)]));
    }

    #[test]
    fn test_oversized_range_faults_instead_of_allocating() {
        let source = "def f():\n    return range(2000000)\n";
        let err = run(source, "f", vec![]).unwrap_err();
        assert_eq!(err.kind, FaultKind::FuelExhausted);
    }

    #[test]
    fn test_builtin_sorted_min_max() {
        let source = "def spread(xs):\n    return max(xs) - min(xs)\n";
        let xs = Value::List(vec![Value::Int(7), Value::Int(2), Value::Int(5)]);
        assert_eq!(run(source, "spread", vec![xs]).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_string_methods() {
        let source = "def shout(s):\n    return s.strip().upper()\n";
        let v = run(source, "shout", vec![Value::Str("  hi  ".to_string())]).unwrap();
        assert_eq!(v, Value::Str("HI".to_string()));
    }

    #[test]
    fn test_string_split_and_join() {
        let source = "def dashed(s):\n    return '-'.join(s.split())\n";
        let v = run(source, "dashed", vec![Value::Str("a b  c".to_string())]).unwrap();
        assert_eq!(v, Value::Str("a-b-c".to_string()));
    }

    #[test]
    fn test_short_circuit_avoids_fault() {
        let source = "def safe(xs):\n    return len(xs) > 0 and xs[0] == 1\n";
        let v = run(source, "safe", vec![Value::List(vec![])]).unwrap();
        assert_eq!(v, Value::Bool(false));
    }

    #[test]
    fn test_if_records_both_edges_across_calls() {
        let source = "def sign(n):\n    if n >= 0:\n        return 1\n    return -1\n";
        let module = parse_module(source).unwrap();
        let mut sink = RecordingSink::default();
        let mut interp = Interpreter::new(&module);
        interp.call("sign", vec![Value::Int(5)], &mut sink).unwrap();
        interp.call("sign", vec![Value::Int(-5)], &mut sink).unwrap();
        assert!(sink.edges.iter().any(|e| e.outcome()));
        assert!(sink.edges.iter().any(|e| !e.outcome()));
    }

    #[test]
    fn test_for_break_skips_exit_edge() {
        let source = "def find(xs):\n    for x in xs:\n        break\n    return 0\n";
        let module = parse_module(source).unwrap();
        let mut sink = RecordingSink::default();
        let mut interp = Interpreter::new(&module);
        let xs = Value::List(vec![Value::Int(1), Value::Int(2)]);
        interp.call("find", vec![xs], &mut sink).unwrap();
        assert!(sink.edges.iter().any(|e| e.outcome()));
        assert!(!sink.edges.iter().any(|e| !e.outcome()));
    }

    #[test]
    fn test_docstring_not_traced() {
        let source = "def documented():\n    \"\"\"Docs here.\"\"\"\n    return 1\n";
        let module = parse_module(source).unwrap();
        let mut sink = RecordingSink::default();
        let mut interp = Interpreter::new(&module);
        interp.call("documented", vec![], &mut sink).unwrap();
        assert_eq!(sink.stmts.len(), 1);
    }

    #[test]
    fn test_index_out_of_range_faults() {
        let source = "def head(xs):\n    return xs[0]\n";
        let err = run(source, "head", vec![Value::List(vec![])]).unwrap_err();
        assert_eq!(err.kind, FaultKind::Index);
    }

    #[test]
    fn test_conversions() {
        let source = "def parse(s):\n    return int(s) + 1\n";
        let v = run(source, "parse", vec![Value::Str(" 41 ".to_string())]).unwrap();
        assert_eq!(v, Value::Int(42));
        let err = run(source, "parse", vec![Value::Str("abc".to_string())]).unwrap_err();
        assert_eq!(err.kind, FaultKind::Conversion);
    }

    #[test]
    fn test_standalone_expression_eval() {
        let module = parse_module("def f():\n    return 0\n").unwrap();
        let mut interp = Interpreter::new(&module);
        let expr = crate::lang::parse_expression("[1, 2] + [3]").unwrap();
        let v = interp.eval(&expr, &mut NullSink).unwrap();
        assert_eq!(
            v,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}
