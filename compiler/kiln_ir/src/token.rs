//! Token types produced by the lexer.
//!
//! Operator punctuation never reaches the parser as punctuation: `+`, `<=`,
//! `..` and friends are lexed as [`TokenKind::Ident`] carrying the method
//! name they stand for (`plus`, `lessThanOrEqual`, `rangeExclusive`), so the
//! parser sees a single operator namespace.

use super::Span;
use std::fmt;

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Create a dummy token for testing/generated code.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds.
///
/// Number literals store their bits as `u64` so the kind stays `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Unsigned decimal literal: `42`, `3.5`
    Number(u64),
    /// String literal with escapes already resolved
    Str(String),
    /// Identifier, word operator, or operator punctuation renamed to its method
    Ident(String),

    // Keywords
    Let,
    If,
    Else,
    True,
    False,
    Null,
    For,
    In,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    /// `=`
    Eq,
    /// `=>`
    Arrow,
    /// `.`
    Dot,

    Newline,
    Eof,
}

impl TokenKind {
    /// Build a number token from its value.
    #[inline]
    pub fn number(value: f64) -> Self {
        TokenKind::Number(value.to_bits())
    }

    /// Numeric value of a [`TokenKind::Number`].
    #[inline]
    pub fn number_value(&self) -> Option<f64> {
        match self {
            TokenKind::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Identifier text, if this is an identifier token.
    #[inline]
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this token names one of the infix operators.
    pub fn is_operator(&self) -> bool {
        self.ident().is_some_and(is_known_operator)
    }

    /// Human-readable name used in syntax errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Let => "let",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Eq => "=",
            TokenKind::Arrow => "=>",
            TokenKind::Dot => ".",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(bits) => write!(f, "Number({})", f64::from_bits(*bits)),
            TokenKind::Str(s) => write!(f, "Str({s:?})"),
            TokenKind::Ident(name) => write!(f, "Ident({name})"),
            _ => write!(f, "{}", self.display_name()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Number(bits) => write!(f, "number {}", f64::from_bits(*bits)),
            TokenKind::Str(_) => f.write_str("string literal"),
            TokenKind::Newline | TokenKind::Eof => f.write_str(self.display_name()),
            _ => write!(f, "'{}'", self.display_name()),
        }
    }
}

/// Method names the parser accepts in infix position.
///
/// All of them share one precedence tier and associate to the left.
pub const KNOWN_OPERATORS: &[&str] = &[
    "plus",
    "minus",
    "times",
    "dividedBy",
    "equals",
    "lessThan",
    "lessThanOrEqual",
    "greaterThan",
    "greaterThanOrEqual",
    "and",
    "or",
    "rangeExclusive",
    "rangeInclusive",
];

#[inline]
pub fn is_known_operator(name: &str) -> bool {
    KNOWN_OPERATORS.contains(&name)
}

/// Lexer output: a token sequence that always ends in [`TokenKind::Eof`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Token kinds only, mostly useful in tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tokens).finish()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
