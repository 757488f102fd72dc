//! Lexer for the candidate scripting subset.
//!
//! Produces a flat token stream with explicit `Newline`, `Indent`, and
//! `Dedent` tokens, Python-style. Blank and comment-only lines emit
//! nothing, and newlines inside brackets are joined implicitly.

use crate::result::{CubrirError, CubrirResult};

/// A single token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind and payload
    pub kind: TokenKind,
    /// 1-based source line
    pub line: u32,
    /// 1-based source column
    pub column: u32,
}

/// Token kinds for the candidate language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (not a keyword)
    Ident(String),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (unescaped)
    Str(String),

    // Keywords
    /// `def`
    Def,
    /// `return`
    Return,
    /// `if`
    If,
    /// `elif`
    Elif,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `in`
    In,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,
    /// `pass`
    Pass,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `True`
    True,
    /// `False`
    False,
    /// `None`
    None,
    /// `assert`
    Assert,

    // Operators and punctuation
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `//`
    SlashSlash,
    /// `%`
    Percent,
    /// `=`
    Assign,
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
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `//=`
    SlashSlashAssign,
    /// `%=`
    PercentAssign,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `->`
    Arrow,

    // Layout
    /// Logical end of line
    Newline,
    /// Indentation increased
    Indent,
    /// Indentation decreased
    Dedent,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Short display name used in parse error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::Int(v) => format!("integer `{v}`"),
            Self::Float(v) => format!("float `{v}`"),
            Self::Str(_) => "string literal".to_string(),
            Self::Newline => "end of line".to_string(),
            Self::Indent => "indent".to_string(),
            Self::Dedent => "dedent".to_string(),
            Self::Eof => "end of input".to_string(),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Def => "def",
            Self::Return => "return",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Pass => "pass",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::True => "True",
            Self::False => "False",
            Self::None => "None",
            Self::Assert => "assert",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::SlashSlash => "//",
            Self::Percent => "%",
            Self::Assign => "=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashSlashAssign => "//=",
            Self::PercentAssign => "%=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Arrow => "->",
            _ => "?",
        }
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "def" => TokenKind::Def,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "not" => TokenKind::Not,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "pass" => TokenKind::Pass,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "True" => TokenKind::True,
        "False" => TokenKind::False,
        "None" => TokenKind::None,
        "assert" => TokenKind::Assert,
        _ => return Option::None,
    })
}

/// Tokenize candidate source text.
///
/// # Errors
///
/// Returns `CubrirError::Parse` on unknown characters, unterminated
/// strings, malformed numbers, or inconsistent indentation.
pub fn tokenize(source: &str) -> CubrirResult<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    bracket_depth: usize,
    indents: Vec<usize>,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            bracket_depth: 0,
            indents: vec![0],
            tokens: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> CubrirError {
        CubrirError::parse(self.line, self.column, message)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: u32, column: u32) {
        self.tokens.push(Token { kind, line, column });
    }

    fn run(mut self) -> CubrirResult<Vec<Token>> {
        while self.pos < self.chars.len() {
            if self.at_line_start() {
                self.handle_indentation()?;
                if self.pos >= self.chars.len() {
                    break;
                }
            }
            self.lex_line()?;
        }
        // Close any open logical line and outstanding indentation.
        if matches!(
            self.tokens.last().map(|t| &t.kind),
            Some(TokenKind::Newline) | None
        ) {
            // Nothing pending.
        } else {
            let (line, column) = (self.line, self.column);
            self.push(TokenKind::Newline, line, column);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            let (line, column) = (self.line, self.column);
            self.push(TokenKind::Dedent, line, column);
        }
        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, line, column);
        Ok(self.tokens)
    }

    fn at_line_start(&self) -> bool {
        self.column == 1 && self.bracket_depth == 0
    }

    /// Measure leading whitespace, skipping blank and comment-only lines,
    /// and emit Indent/Dedent tokens against the indentation stack.
    fn handle_indentation(&mut self) -> CubrirResult<()> {
        loop {
            let mut width = 0usize;
            while let Some(c) = self.peek() {
                match c {
                    ' ' => {
                        width += 1;
                        self.bump();
                    }
                    // Tabs advance to the next multiple of 8, as CPython does.
                    '\t' => {
                        width = (width / 8 + 1) * 8;
                        self.bump();
                    }
                    _ => break,
                }
            }
            match self.peek() {
                Some('\n') => {
                    self.bump();
                    continue; // blank line
                }
                Some('\r') => {
                    self.bump();
                    continue;
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
                None => return Ok(()),
                _ => {}
            }

            let current = *self.indents.last().unwrap_or(&0);
            if width > current {
                self.indents.push(width);
                let (line, column) = (self.line, self.column);
                self.push(TokenKind::Indent, line, column);
            } else if width < current {
                while *self.indents.last().unwrap_or(&0) > width {
                    self.indents.pop();
                    let (line, column) = (self.line, self.column);
                    self.push(TokenKind::Dedent, line, column);
                }
                if *self.indents.last().unwrap_or(&0) != width {
                    return Err(self.error("inconsistent indentation"));
                }
            }
            return Ok(());
        }
    }

    /// Lex tokens until a logical end of line.
    fn lex_line(&mut self) -> CubrirResult<()> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.bump();
                    if self.bracket_depth == 0 {
                        let (line, column) = (self.line, self.column);
                        self.push(TokenKind::Newline, line.saturating_sub(1), column);
                        return Ok(());
                    }
                }
                '\r' | ' ' | '\t' => {
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    // Explicit line continuation.
                    self.bump();
                    self.bump();
                }
                '\'' | '"' => self.lex_string()?,
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_alphabetic() || c == '_' => self.lex_word(),
                _ => self.lex_operator()?,
            }
        }
        Ok(())
    }

    fn lex_string(&mut self) -> CubrirResult<()> {
        let (line, column) = (self.line, self.column);
        let quote = self.bump().unwrap_or('"');
        // Triple-quoted strings (the docstring form) may span lines.
        if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
            self.bump();
            self.bump();
            let mut value = String::new();
            loop {
                if self.peek() == Some(quote)
                    && self.peek_at(1) == Some(quote)
                    && self.peek_at(2) == Some(quote)
                {
                    self.bump();
                    self.bump();
                    self.bump();
                    break;
                }
                match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string literal")),
                }
            }
            self.push(TokenKind::Str(value), line, column);
            return Ok(());
        }
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(self.error("unterminated string literal")),
                },
                Some('\n') | None => return Err(self.error("unterminated string literal")),
                Some(c) => value.push(c),
            }
        }
        self.push(TokenKind::Str(value), line, column);
        Ok(())
    }

    fn lex_number(&mut self) -> CubrirResult<()> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    text.push(c);
                }
                self.bump();
            } else if c == '.' && !is_float && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())
            {
                is_float = true;
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = if is_float {
            let v: f64 = text
                .parse()
                .map_err(|_| self.error(format!("malformed float literal `{text}`")))?;
            TokenKind::Float(v)
        } else {
            let v: i64 = text
                .parse()
                .map_err(|_| self.error(format!("integer literal out of range `{text}`")))?;
            TokenKind::Int(v)
        };
        self.push(kind, line, column);
        Ok(())
    }

    fn lex_word(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = keyword(&word).unwrap_or(TokenKind::Ident(word));
        self.push(kind, line, column);
    }

    fn lex_operator(&mut self) -> CubrirResult<()> {
        let (line, column) = (self.line, self.column);
        let c = self.bump().ok_or_else(|| self.error("unexpected end of input"))?;
        let next = self.peek();
        let kind = match (c, next) {
            ('*', Some('*')) => {
                self.bump();
                TokenKind::StarStar
            }
            ('*', Some('=')) => {
                self.bump();
                TokenKind::StarAssign
            }
            ('*', _) => TokenKind::Star,
            ('/', Some('/')) => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::SlashSlashAssign
                } else {
                    TokenKind::SlashSlash
                }
            }
            ('/', _) => TokenKind::Slash,
            ('+', Some('=')) => {
                self.bump();
                TokenKind::PlusAssign
            }
            ('+', _) => TokenKind::Plus,
            ('-', Some('=')) => {
                self.bump();
                TokenKind::MinusAssign
            }
            ('-', Some('>')) => {
                self.bump();
                TokenKind::Arrow
            }
            ('-', _) => TokenKind::Minus,
            ('%', Some('=')) => {
                self.bump();
                TokenKind::PercentAssign
            }
            ('%', _) => TokenKind::Percent,
            ('=', Some('=')) => {
                self.bump();
                TokenKind::Eq
            }
            ('=', _) => TokenKind::Assign,
            ('!', Some('=')) => {
                self.bump();
                TokenKind::NotEq
            }
            ('<', Some('=')) => {
                self.bump();
                TokenKind::LtEq
            }
            ('<', _) => TokenKind::Lt,
            ('>', Some('=')) => {
                self.bump();
                TokenKind::GtEq
            }
            ('>', _) => TokenKind::Gt,
            ('(', _) => {
                self.bracket_depth += 1;
                TokenKind::LParen
            }
            (')', _) => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                TokenKind::RParen
            }
            ('[', _) => {
                self.bracket_depth += 1;
                TokenKind::LBracket
            }
            (']', _) => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                TokenKind::RBracket
            }
            (',', _) => TokenKind::Comma,
            (':', _) => TokenKind::Colon,
            ('.', _) => TokenKind::Dot,
            (c, _) => return Err(self.error(format!("unexpected character `{c}`"))),
        };
        self.push(kind, line, column);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_assignment() {
        let k = kinds("x = 1\n");
        assert_eq!(
            k,
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_recognized() {
        let k = kinds("def if elif else while for in not and or\n");
        assert!(k.contains(&TokenKind::Def));
        assert!(k.contains(&TokenKind::Elif));
        assert!(k.contains(&TokenKind::Or));
    }

    #[test]
    fn test_indent_dedent_pairing() {
        let source = "def f():\n    x = 1\n    return x\n";
        let k = kinds(source);
        let indents = k.iter().filter(|t| **t == TokenKind::Indent).count();
        let dedents = k.iter().filter(|t| **t == TokenKind::Dedent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_nested_blocks_dedent_all() {
        let source = "def f(x):\n    if x:\n        return 1\n    return 0\n";
        let k = kinds(source);
        let indents = k.iter().filter(|t| **t == TokenKind::Indent).count();
        let dedents = k.iter().filter(|t| **t == TokenKind::Dedent).count();
        assert_eq!(indents, dedents);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let source = "x = 1\n\n\ny = 2\n";
        let k = kinds(source);
        assert!(!k.contains(&TokenKind::Indent));
        let newlines = k.iter().filter(|t| **t == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_comment_only_line_ignored() {
        let source = "x = 1\n# just a comment\ny = 2\n";
        let k = kinds(source);
        assert!(!k.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let k = kinds("x = 1  # meaning of life minus 41\n");
        assert_eq!(k[2], TokenKind::Int(1));
        assert_eq!(k[3], TokenKind::Newline);
    }

    #[test]
    fn test_string_escapes() {
        let k = kinds("s = 'a\\nb'\n");
        assert_eq!(k[2], TokenKind::Str("a\nb".to_string()));
    }

    #[test]
    fn test_double_quoted_string() {
        let k = kinds("s = \"hi\"\n");
        assert_eq!(k[2], TokenKind::Str("hi".to_string()));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(tokenize("s = 'oops\n").is_err());
    }

    #[test]
    fn test_triple_quoted_string_is_one_token() {
        let k = kinds("s = \"\"\"multi\nline\"\"\"\n");
        assert_eq!(k[2], TokenKind::Str("multi\nline".to_string()));
    }

    #[test]
    fn test_triple_quoted_string_tolerates_inner_quotes() {
        let k = kinds("s = '''it's \"fine\"'''\n");
        assert_eq!(k[2], TokenKind::Str("it's \"fine\"".to_string()));
    }

    #[test]
    fn test_empty_string_is_not_mistaken_for_triple() {
        let k = kinds("s = ''\n");
        assert_eq!(k[2], TokenKind::Str(String::new()));
    }

    #[test]
    fn test_unterminated_triple_quote_is_error() {
        assert!(tokenize("s = \"\"\"never closed\n").is_err());
    }

    #[test]
    fn test_float_literal() {
        let k = kinds("x = 3.25\n");
        assert_eq!(k[2], TokenKind::Float(3.25));
    }

    #[test]
    fn test_negative_number_is_minus_then_int() {
        let k = kinds("x = -5\n");
        assert_eq!(k[2], TokenKind::Minus);
        assert_eq!(k[3], TokenKind::Int(5));
    }

    #[test]
    fn test_compound_operators() {
        let k = kinds("x += 1\ny //= 2\nz **  3\n");
        assert!(k.contains(&TokenKind::PlusAssign));
        assert!(k.contains(&TokenKind::SlashSlashAssign));
        assert!(k.contains(&TokenKind::StarStar));
    }

    #[test]
    fn test_bracket_continuation_joins_lines() {
        let source = "xs = [1,\n      2,\n      3]\n";
        let k = kinds(source);
        let newlines = k.iter().filter(|t| **t == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
        assert!(!k.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_unknown_character_is_error() {
        let err = tokenize("x = 1 @ 2\n").unwrap_err();
        assert!(err.to_string().contains('@'));
    }

    #[test]
    fn test_missing_trailing_newline_still_closes() {
        let k = kinds("x = 1");
        assert_eq!(k.last(), Some(&TokenKind::Eof));
        assert!(k.contains(&TokenKind::Newline));
    }

    #[test]
    fn test_tabs_expand_consistently() {
        let source = "def f():\n\treturn 1\n";
        let k = kinds(source);
        assert!(k.contains(&TokenKind::Indent));
        assert!(k.contains(&TokenKind::Dedent));
    }
}
