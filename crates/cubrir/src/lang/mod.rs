//! Candidate language frontend: lexer, AST, and parser.
//!
//! The candidate subset is a small Python-flavored scripting language:
//! indentation-delimited blocks, `def`/`if`/`elif`/`else`/`while`/`for`,
//! integers, floats, strings, booleans, `None`, and lists. Test-case
//! assertions reuse the same expression grammar.

mod ast;
mod parser;
mod token;

pub use ast::{
    BinOp, BoolOp, CmpOp, Expr, FunctionDef, Module, Stmt, StmtMeta, Target,
};
pub use parser::{parse_expression, parse_module};
pub use token::{tokenize, Token, TokenKind};
