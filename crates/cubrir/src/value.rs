//! Runtime values for the candidate interpreter.
//!
//! Semantics follow the source language the candidates are written in:
//! `/` always yields a float, `//` and `%` floor toward negative infinity,
//! booleans compare equal to the integers 0 and 1, and empty containers
//! are falsy.

use crate::lang::{BinOp, CmpOp};
use std::cmp::Ordering;
use std::fmt;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// Double-precision float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Immutable string
    Str(String),
    /// Mutable list
    List(Vec<Value>),
    /// The unit value `None`
    None,
}

/// Classification of a candidate runtime fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Operation applied to incompatible types
    Type,
    /// Unknown variable or function name
    Name,
    /// Index or slice out of range
    Index,
    /// Division or modulo by zero
    ZeroDivision,
    /// Conversion failure (e.g. `int("abc")`)
    Conversion,
    /// Arithmetic overflow of the 64-bit integer range
    Overflow,
    /// Interpreter fuel exhausted (runaway candidate)
    FuelExhausted,
    /// Call stack depth limit exceeded
    RecursionLimit,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Type => "TypeError",
            Self::Name => "NameError",
            Self::Index => "IndexError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::Conversion => "ValueError",
            Self::Overflow => "OverflowError",
            Self::FuelExhausted => "FuelExhausted",
            Self::RecursionLimit => "RecursionError",
        };
        write!(f, "{name}")
    }
}

/// A non-fatal runtime fault raised by candidate execution.
///
/// Faults are counted as test failures; they never abort the run and
/// partial coverage up to the fault point is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFault {
    /// Fault classification
    pub kind: FaultKind,
    /// Human-readable message
    pub message: String,
}

impl RuntimeFault {
    /// Create a new fault.
    #[must_use]
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of a single value operation.
pub type ValueResult = Result<Value, RuntimeFault>;

fn type_fault(message: impl Into<String>) -> RuntimeFault {
    RuntimeFault::new(FaultKind::Type, message)
}

/// Floor division with the result rounded toward negative infinity.
fn floor_div_i64(a: i64, b: i64) -> Result<i64, RuntimeFault> {
    if b == 0 {
        return Err(RuntimeFault::new(
            FaultKind::ZeroDivision,
            "integer division or modulo by zero",
        ));
    }
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Modulo with the sign of the divisor.
fn floor_mod_i64(a: i64, b: i64) -> Result<i64, RuntimeFault> {
    let q = floor_div_i64(a, b)?;
    Ok(a - b.wrapping_mul(q))
}

impl Value {
    /// Value type name as shown in fault messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::None => "None",
        }
    }

    /// Truthiness: zero, empty containers, and `None` are falsy.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Bool(v) => *v,
            Self::Str(s) => !s.is_empty(),
            Self::List(xs) => !xs.is_empty(),
            Self::None => false,
        }
    }

    /// Numeric view, treating booleans as 0/1. `None` for non-numerics.
    fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(v) => Some(Number::Int(*v)),
            Self::Float(v) => Some(Number::Float(*v)),
            Self::Bool(v) => Some(Number::Int(i64::from(*v))),
            _ => None,
        }
    }

    /// Equality with numeric cross-type comparison (`1 == 1.0 == True`).
    #[must_use]
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.eq_number(b),
            _ => match (self, other) {
                (Self::Str(a), Self::Str(b)) => a == b,
                (Self::List(a), Self::List(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_value(y))
                }
                (Self::None, Self::None) => true,
                _ => false,
            },
        }
    }

    /// Ordering for `<`/`<=`/`>`/`>=`; fault on unordered type pairs.
    pub fn cmp_value(&self, other: &Self) -> Result<Ordering, RuntimeFault> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => Ok(a.cmp_number(b)),
            _ => match (self, other) {
                (Self::Str(a), Self::Str(b)) => Ok(a.cmp(b)),
                (Self::List(a), Self::List(b)) => {
                    for (x, y) in a.iter().zip(b.iter()) {
                        let ord = x.cmp_value(y)?;
                        if ord != Ordering::Equal {
                            return Ok(ord);
                        }
                    }
                    Ok(a.len().cmp(&b.len()))
                }
                _ => Err(type_fault(format!(
                    "'<' not supported between instances of '{}' and '{}'",
                    self.type_name(),
                    other.type_name()
                ))),
            },
        }
    }

    /// Apply a binary arithmetic operator.
    pub fn binary(op: BinOp, left: &Self, right: &Self) -> ValueResult {
        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            return Number::binary(op, a, b);
        }
        match (op, left, right) {
            (BinOp::Add, Self::Str(a), Self::Str(b)) => Ok(Self::Str(format!("{a}{b}"))),
            (BinOp::Add, Self::List(a), Self::List(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                Ok(Self::List(out))
            }
            (BinOp::Mul, Self::Str(s), Self::Int(n)) | (BinOp::Mul, Self::Int(n), Self::Str(s)) => {
                let count = usize::try_from((*n).max(0)).unwrap_or(0);
                Ok(Self::Str(s.repeat(count)))
            }
            (BinOp::Mul, Self::List(xs), Self::Int(n))
            | (BinOp::Mul, Self::Int(n), Self::List(xs)) => {
                let count = usize::try_from((*n).max(0)).unwrap_or(0);
                let mut out = Vec::with_capacity(xs.len() * count);
                for _ in 0..count {
                    out.extend(xs.iter().cloned());
                }
                Ok(Self::List(out))
            }
            _ => Err(type_fault(format!(
                "unsupported operand types for `{op:?}`: '{}' and '{}'",
                left.type_name(),
                right.type_name()
            ))),
        }
    }

    /// Apply a comparison operator.
    pub fn compare(op: CmpOp, left: &Self, right: &Self) -> Result<bool, RuntimeFault> {
        match op {
            CmpOp::Eq => Ok(left.eq_value(right)),
            CmpOp::NotEq => Ok(!left.eq_value(right)),
            CmpOp::Lt => Ok(left.cmp_value(right)? == Ordering::Less),
            CmpOp::LtEq => Ok(left.cmp_value(right)? != Ordering::Greater),
            CmpOp::Gt => Ok(left.cmp_value(right)? == Ordering::Greater),
            CmpOp::GtEq => Ok(left.cmp_value(right)? != Ordering::Less),
            CmpOp::In => Self::contains(right, left),
            CmpOp::NotIn => Self::contains(right, left).map(|b| !b),
        }
    }

    /// Membership: element in list, or substring in string.
    fn contains(container: &Self, item: &Self) -> Result<bool, RuntimeFault> {
        match (container, item) {
            (Self::List(xs), _) => Ok(xs.iter().any(|x| x.eq_value(item))),
            (Self::Str(s), Self::Str(needle)) => Ok(s.contains(needle.as_str())),
            _ => Err(type_fault(format!(
                "argument of type '{}' is not iterable",
                container.type_name()
            ))),
        }
    }

    /// Unary negation.
    pub fn neg(&self) -> ValueResult {
        match self.as_number() {
            Some(Number::Int(v)) => v
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeFault::new(FaultKind::Overflow, "integer overflow")),
            Some(Number::Float(v)) => Ok(Self::Float(-v)),
            None => Err(type_fault(format!(
                "bad operand type for unary -: '{}'",
                self.type_name()
            ))),
        }
    }

    /// `str()`-style display form (strings unquoted).
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// `repr()`-style form (strings quoted, recursively in lists).
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => {
                if v.fract() == 0.0 && v.is_finite() && v.abs() < 1e16 {
                    format!("{v:.1}")
                } else {
                    v.to_string()
                }
            }
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Self::List(xs) => {
                let items: Vec<String> = xs.iter().map(Value::repr).collect();
                format!("[{}]", items.join(", "))
            }
            Self::None => "None".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

/// Internal numeric tower: int or float.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    fn eq_number(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    fn cmp_number(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(&b),
            (a, b) => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn binary(op: BinOp, a: Self, b: Self) -> ValueResult {
        if let (Self::Int(x), Self::Int(y)) = (a, b) {
            return Self::int_binary(op, x, y);
        }
        let (x, y) = (a.as_f64(), b.as_f64());
        let out = match op {
            BinOp::Add => x + y,
            BinOp::Sub => x - y,
            BinOp::Mul => x * y,
            BinOp::Div => {
                if y == 0.0 {
                    return Err(RuntimeFault::new(
                        FaultKind::ZeroDivision,
                        "float division by zero",
                    ));
                }
                x / y
            }
            BinOp::FloorDiv => {
                if y == 0.0 {
                    return Err(RuntimeFault::new(
                        FaultKind::ZeroDivision,
                        "float floor division by zero",
                    ));
                }
                (x / y).floor()
            }
            BinOp::Mod => {
                if y == 0.0 {
                    return Err(RuntimeFault::new(FaultKind::ZeroDivision, "float modulo"));
                }
                x - y * (x / y).floor()
            }
            BinOp::Pow => x.powf(y),
        };
        Ok(Value::Float(out))
    }

    fn int_binary(op: BinOp, x: i64, y: i64) -> ValueResult {
        let overflow = || RuntimeFault::new(FaultKind::Overflow, "integer overflow");
        match op {
            BinOp::Add => x.checked_add(y).map(Value::Int).ok_or_else(overflow),
            BinOp::Sub => x.checked_sub(y).map(Value::Int).ok_or_else(overflow),
            BinOp::Mul => x.checked_mul(y).map(Value::Int).ok_or_else(overflow),
            // True division always yields a float.
            BinOp::Div => {
                if y == 0 {
                    Err(RuntimeFault::new(
                        FaultKind::ZeroDivision,
                        "division by zero",
                    ))
                } else {
                    Ok(Value::Float(x as f64 / y as f64))
                }
            }
            BinOp::FloorDiv => floor_div_i64(x, y).map(Value::Int),
            BinOp::Mod => floor_mod_i64(x, y).map(Value::Int),
            BinOp::Pow => {
                if y < 0 {
                    Ok(Value::Float((x as f64).powf(y as f64)))
                } else {
                    let exp = u32::try_from(y).map_err(|_| overflow())?;
                    x.checked_pow(exp).map(Value::Int).ok_or_else(overflow)
                }
            }
        }
    }
}
