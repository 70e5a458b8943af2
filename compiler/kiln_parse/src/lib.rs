//! Recursive descent parser for Kiln.
//!
//! Grammar, loosest first:
//!
//! ```text
//! program   = { stmt }
//! stmt      = "let" IDENT "=" expr
//!           | IDENT "=" expr
//!           | "for" IDENT "in" expr block
//!           | expr
//! expr      = call { OPERATOR call }
//! call      = primary { "(" args ")" | "." IDENT "(" args ")" } [ block ]
//! primary   = NUMBER | STRING | "true" | "false" | "null" | IDENT
//!           | lambda | "(" expr ")" | block | if
//! lambda    = "(" [ IDENT { "," IDENT } ] ")" "=>" ( block | expr )
//! if        = "if" expr branch [ "else" ( if | branch ) ]
//! ```
//!
//! Every operator shares one precedence tier, so `1 + 2 * 3` is `(1 + 2) * 3`.

mod context;
mod cursor;
mod grammar;

use kiln_ir::{Program, Span, TokenList};
use kiln_lexer::LexError;
use thiserror::Error;

pub use context::ParseContext;
pub use cursor::Cursor;

/// Malformed source: either a bad token or a token in the wrong place.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
}

impl SyntaxError {
    /// Source position of the offending token.
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(err) => err.span,
            SyntaxError::UnexpectedToken { span, .. } => *span,
        }
    }

    /// Message without the position suffix.
    pub fn message(&self) -> String {
        match self {
            SyntaxError::Lex(err) => err.message(),
            SyntaxError::UnexpectedToken {
                expected, found, ..
            } => format!("expected {expected}, found {found}"),
        }
    }
}

/// Parser state: a cursor plus the active [`ParseContext`].
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    context: ParseContext,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            context: ParseContext::NONE,
        }
    }

    #[inline]
    fn skip_newlines(&mut self) {
        self.cursor.skip_newlines();
    }

    /// Run `f` with `flag` added to the context, restoring it afterwards.
    fn with_context<T>(&mut self, flag: ParseContext, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context;
        self.context = saved.with(flag);
        let result = f(self);
        self.context = saved;
        result
    }

    /// Run `f` with every context flag cleared (inside delimiters).
    fn with_fresh_context<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context;
        self.context = ParseContext::NONE;
        let result = f(self);
        self.context = saved;
        result
    }
}

/// Lex and parse `source`.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = kiln_lexer::lex(source)?;
    parse_tokens(&tokens)
}

/// Parse an already-lexed token stream.
pub fn parse_tokens(tokens: &TokenList) -> Result<Program, SyntaxError> {
    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}
