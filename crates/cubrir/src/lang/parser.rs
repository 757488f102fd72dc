//! Recursive-descent parser for the candidate scripting subset.
//!
//! Grammar follows Python's surface syntax for the constructs the subset
//! supports. Type annotations on parameters and return types are consumed
//! and dropped. Module-level statements other than `def` and simple
//! `name = other_name` aliases are parsed for well-formedness and
//! discarded.

use super::ast::{BinOp, BoolOp, CmpOp, Expr, FunctionDef, Module, Stmt, StmtMeta, Target};
use super::token::{tokenize, Token, TokenKind};
use crate::result::{CubrirError, CubrirResult};

/// Parse a complete module from source text.
///
/// # Errors
///
/// Returns `CubrirError::Parse` with line/column on any syntax error.
pub fn parse_module(source: &str) -> CubrirResult<Module> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).module()
}

/// Parse a single expression, as used for test-case assertions.
///
/// Trailing newline tokens are permitted; anything else after the
/// expression is an error.
///
/// # Errors
///
/// Returns `CubrirError::Parse` on any syntax error or trailing input.
pub fn parse_expression(source: &str) -> CubrirResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.expression()?;
    parser.skip_newlines();
    parser.expect(&TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn position(&self) -> (u32, u32) {
        self.tokens
            .get(self.pos)
            .map_or((0, 0), |t| (t.line, t.column))
    }

    fn line(&self) -> u32 {
        self.position().0
    }

    fn bump(&mut self) -> Token {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                line: 0,
                column: 0,
            });
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> CubrirResult<Token> {
        if self.peek() == kind {
            Ok(self.bump())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().describe()
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> CubrirError {
        let (line, column) = self.position();
        CubrirError::parse(line, column, message)
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), TokenKind::Newline) {
            self.bump();
        }
    }

    // =========================================================================
    // Module level
    // =========================================================================

    fn module(&mut self) -> CubrirResult<Module> {
        let mut functions = Vec::new();
        let mut aliases = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Def => functions.push(self.function_def()?),
                TokenKind::Ident(_) if self.is_alias_line() => {
                    let TokenKind::Ident(target) = self.bump().kind else {
                        unreachable!("guarded by is_alias_line");
                    };
                    self.expect(&TokenKind::Assign)?;
                    let TokenKind::Ident(source) = self.bump().kind else {
                        unreachable!("guarded by is_alias_line");
                    };
                    self.eat(&TokenKind::Newline);
                    aliases.push((target, source));
                }
                // Imports are not modeled; consume the line.
                TokenKind::Ident(_) if self.is_import_line() => {
                    while !matches!(self.peek(), TokenKind::Newline | TokenKind::Eof) {
                        self.bump();
                    }
                    self.eat(&TokenKind::Newline);
                }
                // Self-check asserts (`assert expr[, message]`) are
                // validated and discarded like other module-level code.
                TokenKind::Assert => {
                    self.bump();
                    let _ = self.expression()?;
                    if self.eat(&TokenKind::Comma) {
                        let _ = self.expression()?;
                    }
                    self.end_of_statement()?;
                }
                // Other module-level statements (prints, demo calls) are
                // parsed for well-formedness and discarded.
                _ => {
                    let _ = self.statement()?;
                }
            }
        }
        Ok(Module { functions, aliases })
    }

    fn is_import_line(&self) -> bool {
        matches!(self.peek(), TokenKind::Ident(w) if w == "import" || w == "from")
    }

    /// `name = other_name` followed by end of line.
    fn is_alias_line(&self) -> bool {
        matches!(self.peek(), TokenKind::Ident(_))
            && matches!(self.peek_at(1), TokenKind::Assign)
            && matches!(self.peek_at(2), TokenKind::Ident(_))
            && matches!(self.peek_at(3), TokenKind::Newline | TokenKind::Eof)
    }

    fn function_def(&mut self) -> CubrirResult<FunctionDef> {
        let line = self.line();
        self.expect(&TokenKind::Def)?;
        let name = self.ident()?;
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !matches!(self.peek(), TokenKind::RParen) {
            params.push(self.ident()?);
            if self.eat(&TokenKind::Colon) {
                self.skip_annotation()?;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        if self.eat(&TokenKind::Arrow) {
            self.skip_annotation()?;
        }
        let mut body = self.block()?;
        if let Some(Stmt::Expr { expr, meta }) = body.first_mut() {
            if expr.is_string_literal() {
                meta.docstring = true;
            }
        }
        Ok(FunctionDef {
            name,
            params,
            body,
            line,
        })
    }

    /// Consume a type annotation without interpreting it: identifiers,
    /// dots, and balanced brackets (e.g. `List[int]`, `typing.Optional[str]`).
    fn skip_annotation(&mut self) -> CubrirResult<()> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::LBracket => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBracket if depth > 0 => {
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Ident(_) | TokenKind::Dot | TokenKind::None | TokenKind::Str(_) => {
                    self.bump();
                }
                TokenKind::Comma if depth > 0 => {
                    self.bump();
                }
                _ if depth == 0 => return Ok(()),
                _ => return Err(self.error("malformed type annotation")),
            }
        }
    }

    fn ident(&mut self) -> CubrirResult<String> {
        match self.peek() {
            TokenKind::Ident(_) => {
                let TokenKind::Ident(name) = self.bump().kind else {
                    unreachable!("just matched");
                };
                Ok(name)
            }
            other => Err(self.error(format!("expected identifier, found {}", other.describe()))),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `: NEWLINE INDENT stmt+ DEDENT`
    fn block(&mut self) -> CubrirResult<Vec<Stmt>> {
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::Newline)?;
        self.skip_newlines();
        self.expect(&TokenKind::Indent)?;
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::Dedent | TokenKind::Eof) {
                break;
            }
            body.push(self.statement()?);
        }
        self.expect(&TokenKind::Dedent)?;
        if body.is_empty() {
            return Err(self.error("empty block"));
        }
        Ok(body)
    }

    fn statement(&mut self) -> CubrirResult<Stmt> {
        match self.peek() {
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Pass => {
                let meta = StmtMeta::at(self.line());
                self.bump();
                self.end_of_statement()?;
                Ok(Stmt::Pass { meta })
            }
            TokenKind::Break => {
                let meta = StmtMeta::at(self.line());
                self.bump();
                self.end_of_statement()?;
                Ok(Stmt::Break { meta })
            }
            TokenKind::Continue => {
                let meta = StmtMeta::at(self.line());
                self.bump();
                self.end_of_statement()?;
                Ok(Stmt::Continue { meta })
            }
            _ => self.simple_statement(),
        }
    }

    fn end_of_statement(&mut self) -> CubrirResult<()> {
        match self.peek() {
            TokenKind::Newline => {
                self.bump();
                Ok(())
            }
            TokenKind::Eof | TokenKind::Dedent => Ok(()),
            other => Err(self.error(format!(
                "expected end of line, found {}",
                other.describe()
            ))),
        }
    }

    fn if_statement(&mut self) -> CubrirResult<Stmt> {
        let meta = StmtMeta::at(self.line());
        self.bump(); // `if` or `elif`
        let test = self.expression()?;
        let body = self.block()?;
        self.skip_newlines();
        let orelse = match self.peek() {
            TokenKind::Elif => vec![self.if_statement()?],
            TokenKind::Else => {
                self.bump();
                self.block()?
            }
            _ => Vec::new(),
        };
        Ok(Stmt::If {
            test,
            decision: crate::coverage::BranchId::new(0),
            body,
            orelse,
            meta,
        })
    }

    fn while_statement(&mut self) -> CubrirResult<Stmt> {
        let meta = StmtMeta::at(self.line());
        self.expect(&TokenKind::While)?;
        let test = self.expression()?;
        let body = self.block()?;
        Ok(Stmt::While {
            test,
            decision: crate::coverage::BranchId::new(0),
            body,
            meta,
        })
    }

    fn for_statement(&mut self) -> CubrirResult<Stmt> {
        let meta = StmtMeta::at(self.line());
        self.expect(&TokenKind::For)?;
        let var = self.ident()?;
        self.expect(&TokenKind::In)?;
        let iter = self.expression()?;
        let body = self.block()?;
        Ok(Stmt::For {
            var,
            iter,
            decision: crate::coverage::BranchId::new(0),
            body,
            meta,
        })
    }

    fn return_statement(&mut self) -> CubrirResult<Stmt> {
        let meta = StmtMeta::at(self.line());
        self.expect(&TokenKind::Return)?;
        let value = if matches!(
            self.peek(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
        ) {
            None
        } else {
            Some(self.expression()?)
        };
        self.end_of_statement()?;
        Ok(Stmt::Return { value, meta })
    }

    /// Expression statement, assignment, or augmented assignment.
    fn simple_statement(&mut self) -> CubrirResult<Stmt> {
        let meta = StmtMeta::at(self.line());
        let expr = self.expression()?;
        let stmt = match self.peek() {
            TokenKind::Assign => {
                self.bump();
                let target = self.as_target(expr)?;
                let value = self.expression()?;
                Stmt::Assign {
                    target,
                    value,
                    meta,
                }
            }
            TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashSlashAssign
            | TokenKind::PercentAssign => {
                let op = match self.bump().kind {
                    TokenKind::PlusAssign => BinOp::Add,
                    TokenKind::MinusAssign => BinOp::Sub,
                    TokenKind::StarAssign => BinOp::Mul,
                    TokenKind::SlashSlashAssign => BinOp::FloorDiv,
                    _ => BinOp::Mod,
                };
                let target = self.as_target(expr)?;
                let value = self.expression()?;
                Stmt::AugAssign {
                    target,
                    op,
                    value,
                    meta,
                }
            }
            _ => Stmt::Expr { expr, meta },
        };
        self.end_of_statement()?;
        Ok(stmt)
    }

    fn as_target(&self, expr: Expr) -> CubrirResult<Target> {
        match expr {
            Expr::Name(name) => Ok(Target::Name(name)),
            Expr::Index { value, index } => match *value {
                Expr::Name(name) => Ok(Target::Subscript {
                    name,
                    index: *index,
                }),
                _ => Err(self.error("invalid assignment target")),
            },
            _ => Err(self.error("invalid assignment target")),
        }
    }

    // =========================================================================
    // Expressions (precedence climbing)
    // =========================================================================

    fn expression(&mut self) -> CubrirResult<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> CubrirResult<Expr> {
        let mut left = self.and_expr()?;
        while self.eat(&TokenKind::Or) {
            let right = self.and_expr()?;
            left = Expr::Bool2 {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> CubrirResult<Expr> {
        let mut left = self.not_expr()?;
        while self.eat(&TokenKind::And) {
            let right = self.not_expr()?;
            left = Expr::Bool2 {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> CubrirResult<Expr> {
        if self.eat(&TokenKind::Not) {
            let operand = self.not_expr()?;
            Ok(Expr::Not(Box::new(operand)))
        } else {
            self.comparison()
        }
    }

    fn comparison(&mut self) -> CubrirResult<Expr> {
        let left = self.arith()?;
        let op = match self.peek() {
            TokenKind::Eq => CmpOp::Eq,
            TokenKind::NotEq => CmpOp::NotEq,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::LtEq => CmpOp::LtEq,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::GtEq => CmpOp::GtEq,
            TokenKind::In => CmpOp::In,
            TokenKind::Not if matches!(self.peek_at(1), TokenKind::In) => CmpOp::NotIn,
            _ => return Ok(left),
        };
        if op == CmpOp::NotIn {
            self.bump();
        }
        self.bump();
        let right = self.arith()?;
        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn arith(&mut self) -> CubrirResult<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> CubrirResult<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::SlashSlash => BinOp::FloorDiv,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> CubrirResult<Expr> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.unary()?;
            // Fold literal negation so `-9999999999999999` stays one literal.
            return Ok(match operand {
                Expr::Int(v) => Expr::Int(-v),
                Expr::Float(v) => Expr::Float(-v),
                other => Expr::Neg(Box::new(other)),
            });
        }
        if self.eat(&TokenKind::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> CubrirResult<Expr> {
        let base = self.postfix()?;
        if self.eat(&TokenKind::StarStar) {
            // Right-associative.
            let exp = self.unary()?;
            return Ok(Expr::Binary {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exp),
            });
        }
        Ok(base)
    }

    fn postfix(&mut self) -> CubrirResult<Expr> {
        let mut expr = self.atom()?;
        loop {
            match self.peek() {
                TokenKind::LParen => {
                    self.bump();
                    let args = self.call_args()?;
                    expr = match expr {
                        Expr::Name(func) => Expr::Call { func, args },
                        Expr::MethodCall { .. } | Expr::Index { .. } | Expr::Call { .. } => {
                            return Err(self.error("only named functions are callable"))
                        }
                        _ => return Err(self.error("expression is not callable")),
                    };
                }
                TokenKind::Dot => {
                    self.bump();
                    let method = self.ident()?;
                    self.expect(&TokenKind::LParen)?;
                    let args = self.call_args()?;
                    expr = Expr::MethodCall {
                        recv: Box::new(expr),
                        method,
                        args,
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    expr = self.subscript(expr)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn call_args(&mut self) -> CubrirResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !matches!(self.peek(), TokenKind::RParen) {
            args.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// Index or slice, after the opening `[` has been consumed.
    fn subscript(&mut self, value: Expr) -> CubrirResult<Expr> {
        let lower = if matches!(self.peek(), TokenKind::Colon) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        if self.eat(&TokenKind::Colon) {
            let upper = if matches!(self.peek(), TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.expression()?))
            };
            self.expect(&TokenKind::RBracket)?;
            return Ok(Expr::Slice {
                value: Box::new(value),
                lower,
                upper,
            });
        }
        self.expect(&TokenKind::RBracket)?;
        let index = lower.ok_or_else(|| self.error("empty subscript"))?;
        Ok(Expr::Index {
            value: Box::new(value),
            index,
        })
    }

    fn atom(&mut self) -> CubrirResult<Expr> {
        match self.peek().clone() {
            TokenKind::Int(v) => {
                self.bump();
                Ok(Expr::Int(v))
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(Expr::Float(v))
            }
            TokenKind::Str(s) => {
                self.bump();
                Ok(Expr::Str(s))
            }
            TokenKind::True => {
                self.bump();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.bump();
                Ok(Expr::Bool(false))
            }
            TokenKind::None => {
                self.bump();
                Ok(Expr::NoneLit)
            }
            TokenKind::Ident(name) => {
                self.bump();
                Ok(Expr::Name(name))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.bump();
                let mut items = Vec::new();
                while !matches!(self.peek(), TokenKind::RBracket) {
                    items.push(self.expression()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                Ok(Expr::List(items))
            }
            other => Err(self.error(format!("unexpected {}", other.describe()))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Module {
        parse_module(source).unwrap()
    }

    #[test]
    fn test_minimal_function() {
        let module = parse_ok("def f(x):\n    return x\n");
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "f");
        assert_eq!(module.functions[0].params, vec!["x"]);
    }

    #[test]
    fn test_annotations_dropped() {
        let module = parse_ok("def f(xs: List[int], n: int) -> List[int]:\n    return xs\n");
        assert_eq!(module.functions[0].params, vec!["xs", "n"]);
    }

    #[test]
    fn test_docstring_marked() {
        let module = parse_ok("def f(x):\n    \"doc\"\n    return x\n");
        let body = &module.functions[0].body;
        assert!(body[0].meta().docstring);
        assert!(!body[1].meta().docstring);
    }

    #[test]
    fn test_elif_nests_in_orelse() {
        let source = "def f(x):\n    if x > 0:\n        return 1\n    elif x < 0:\n        return -1\n    else:\n        return 0\n";
        let module = parse_ok(source);
        let Stmt::If { orelse, .. } = &module.functions[0].body[0] else {
            panic!("expected if");
        };
        assert_eq!(orelse.len(), 1);
        assert!(matches!(orelse[0], Stmt::If { .. }));
    }

    #[test]
    fn test_while_loop() {
        let source = "def f(n):\n    i = 0\n    while i < n:\n        i += 1\n    return i\n";
        let module = parse_ok(source);
        assert!(matches!(module.functions[0].body[1], Stmt::While { .. }));
    }

    #[test]
    fn test_for_loop() {
        let source = "def f(xs):\n    total = 0\n    for x in xs:\n        total += x\n    return total\n";
        let module = parse_ok(source);
        assert!(matches!(module.functions[0].body[1], Stmt::For { .. }));
    }

    #[test]
    fn test_candidate_alias_captured() {
        let source = "def solve(n):\n    return n\n\nprint(solve(3))\n\ncandidate = solve\n";
        let module = parse_ok(source);
        assert_eq!(
            module.aliases,
            vec![("candidate".to_string(), "solve".to_string())]
        );
    }

    #[test]
    fn test_module_level_statements_discarded() {
        let source = "print(1)\n\ndef f(x):\n    return x\n\nprint(f(2))\n";
        let module = parse_ok(source);
        assert_eq!(module.functions.len(), 1);
        assert!(module.aliases.is_empty());
    }

    #[test]
    fn test_module_level_assert_discarded() {
        let source = "def f(x):\n    return x\n\nassert f(1) == 1\nassert f(2) == 2, 'self-check'\n";
        let module = parse_ok(source);
        assert_eq!(module.functions.len(), 1);
        assert!(module.aliases.is_empty());
    }

    #[test]
    fn test_subscript_assignment_target() {
        let source = "def f(xs):\n    xs[0] = 1\n    return xs\n";
        let module = parse_ok(source);
        let Stmt::Assign { target, .. } = &module.functions[0].body[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(target, Target::Subscript { .. }));
    }

    #[test]
    fn test_slice_expression() {
        let expr = parse_expression("xs[1:3]").unwrap();
        assert!(matches!(expr, Expr::Slice { .. }));
        let open = parse_expression("xs[:4]").unwrap();
        let Expr::Slice { lower, upper, .. } = open else {
            panic!("expected slice");
        };
        assert!(lower.is_none());
        assert!(upper.is_some());
    }

    #[test]
    fn test_not_in_comparison() {
        let expr = parse_expression("x not in xs").unwrap();
        let Expr::Compare { op, .. } = expr else {
            panic!("expected comparison");
        };
        assert_eq!(op, CmpOp::NotIn);
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_power_right_associative() {
        let expr = parse_expression("2 ** 3 ** 2").unwrap();
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Pow);
        assert!(matches!(*right, Expr::Binary { op: BinOp::Pow, .. }));
    }

    #[test]
    fn test_short_circuit_parse() {
        let expr = parse_expression("x > 0 and y > 0 or z").unwrap();
        let Expr::Bool2 { op, .. } = expr else {
            panic!("expected bool op");
        };
        assert_eq!(op, BoolOp::Or);
    }

    #[test]
    fn test_method_call_chain() {
        let expr = parse_expression("s.strip().split()").unwrap();
        let Expr::MethodCall { method, recv, .. } = expr else {
            panic!("expected method call");
        };
        assert_eq!(method, "split");
        assert!(matches!(*recv, Expr::MethodCall { .. }));
    }

    #[test]
    fn test_negative_literal_folded() {
        let expr = parse_expression("-9999999999999999").unwrap();
        assert!(matches!(expr, Expr::Int(-9_999_999_999_999_999)));
    }

    #[test]
    fn test_assert_style_input_rejected_by_expression_parser() {
        // `assert` is statement syntax; the test-case layer strips it first.
        assert!(parse_expression("assert f(1) == 2").is_err());
    }

    #[test]
    fn test_parse_error_carries_position() {
        let err = parse_module("def f(:\n    return 1\n").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("line 1"), "got: {text}");
    }

    #[test]
    fn test_empty_block_rejected() {
        assert!(parse_module("def f(x):\nreturn x\n").is_err());
    }

    #[test]
    fn test_trailing_expression_call_parses() {
        let module = parse_ok("def f(x):\n    print(x)\n    return x\n");
        assert!(matches!(module.functions[0].body[0], Stmt::Expr { .. }));
    }
}
