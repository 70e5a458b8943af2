//! Lexer for Kiln using logos.
//!
//! Produces a flat [`TokenList`] ending in `Eof`. Newlines are kept as
//! tokens because they separate statements; horizontal whitespace and
//! `//` comments are dropped. Operator punctuation is renamed to the method
//! it dispatches to, so `a + b` and `a plus b` lex identically.

use kiln_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;
use thiserror::Error;

/// Raw token from logos, before conversion to [`TokenKind`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[token("\n")]
    Newline,

    // === Keywords ===
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("for")]
    For,
    #[token("in")]
    In,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("=>")]
    Arrow,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,

    // === Operators (emitted as identifiers) ===
    #[token("+", op_plus)]
    #[token("-", op_minus)]
    #[token("*", op_times)]
    #[token("/", op_divided_by)]
    #[token("<", op_less_than)]
    #[token("<=", op_less_than_or_equal)]
    #[token(">", op_greater_than)]
    #[token(">=", op_greater_than_or_equal)]
    #[token("==", op_equals)]
    #[token("..", op_range_exclusive)]
    #[token("...", op_range_inclusive)]
    Operator(&'static str),

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    Str,

    #[regex(r#""([^"\\]|\\(.|\n))*\\?"#)]
    UnterminatedStr,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Callbacks naming the method each operator token dispatches to.
macro_rules! operator_callbacks {
    ($($callback:ident => $method:literal),* $(,)?) => {
        $(
            fn $callback(_: &mut logos::Lexer<'_, RawToken>) -> &'static str {
                $method
            }
        )*
    };
}

operator_callbacks! {
    op_plus => "plus",
    op_minus => "minus",
    op_times => "times",
    op_divided_by => "dividedBy",
    op_less_than => "lessThan",
    op_less_than_or_equal => "lessThanOrEqual",
    op_greater_than => "greaterThan",
    op_greater_than_or_equal => "greaterThanOrEqual",
    op_equals => "equals",
    op_range_exclusive => "rangeExclusive",
    op_range_inclusive => "rangeInclusive",
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnrecognizedCharacter(char),
}

/// Tokenization failure with the span of the offending text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} at {span}", self.message())]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    /// Message without the position suffix.
    pub fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnrecognizedCharacter(c) => format!("unrecognized character {c:?}"),
        }
    }
}

/// Lexer over a single source text.
pub struct Lexer<'src> {
    source: &'src str,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer { source }
    }

    /// Lex all tokens from the source, stopping at the first error.
    pub fn lex_all(&self) -> Result<TokenList, LexError> {
        let mut result = TokenList::new();
        let mut logos = RawToken::lexer(self.source);

        while let Some(token_result) = logos.next() {
            let span = Span::from_range(logos.span());
            let slice = logos.slice();

            let converted = match token_result {
                Ok(raw) => convert_token(raw, slice),
                Err(()) => Err(LexErrorKind::UnrecognizedCharacter(
                    slice.chars().next().unwrap_or('\0'),
                )),
            };
            match converted {
                Ok(kind) => result.push(Token::new(kind, span)),
                Err(kind) => return Err(LexError { kind, span }),
            }
        }

        let eof = Span::point(u32::try_from(self.source.len()).unwrap_or(u32::MAX));
        result.push(Token::new(TokenKind::Eof, eof));

        tracing::debug!(tokens = result.len(), "lexed source");
        Ok(result)
    }
}

/// Lex `source` into tokens.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    Lexer::new(source).lex_all()
}

fn convert_token(raw: RawToken, slice: &str) -> Result<TokenKind, LexErrorKind> {
    let kind = match raw {
        RawToken::Newline => TokenKind::Newline,
        RawToken::Let => TokenKind::Let,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Operator(name) => TokenKind::Ident(name.to_string()),
        RawToken::Number(n) => TokenKind::number(n),
        // Strip the surrounding quotes before resolving escapes.
        RawToken::Str => TokenKind::Str(unescape_string(&slice[1..slice.len() - 1])),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
        RawToken::UnterminatedStr => return Err(LexErrorKind::UnterminatedString),
    };
    Ok(kind)
}

/// Resolve `\n` and `\t`; any other escaped character stands for itself.
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some(other) => result.push(other),
                None => {}
            }
        } else {
            result.push(c);
        }
    }

    result
}
