//! Token cursor for navigating the token stream.
//!
//! Provides token access, lookahead without consumption, and rewind via
//! [`Cursor::position`] / [`Cursor::set_position`].

use kiln_ir::{Span, Token, TokenKind, TokenList};
use tracing::trace;

use crate::SyntaxError;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

/// Cursor over a lexed token stream.
///
/// The stream always ends in `Eof`, and the cursor never moves past it.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            pos: 0,
        }
    }

    /// Current position, for a later [`Cursor::set_position`].
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind (or fast-forward) to a position taken from [`Cursor::position`].
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos <= self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check if the current token has the same kind as `kind`, ignoring
    /// any payload (identifier text, literal value).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// The operator name under the cursor, if the current token is one.
    #[inline]
    pub fn current_operator(&self) -> Option<&'a str> {
        let kind = self.current_kind();
        if kind.is_operator() {
            kind.ident()
        } else {
            None
        }
    }

    /// Peek at the token kind at offset `n` from current position.
    ///
    /// `peek_kind_at(0)` is the current token. Returns `Eof` past the end.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        self.tokens.get(self.pos + n).map_or(&EOF.kind, |t| &t.kind)
    }

    /// Advance to the next token, returning the one just consumed.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        trace!(
            pos = self.pos,
            kind = %token.kind.display_name(),
            span_start = token.span.start,
            span_end = token.span.end,
            "advance"
        );
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub fn skip_newlines(&mut self) {
        while matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    /// Expect the current token to be of the given kind, advance and return it.
    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.display_name()))
        }
    }

    /// Expect and consume an identifier, returning its text.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name.clone())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Build an "expected X, found Y" error at the current token.
    #[cold]
    #[inline(never)]
    pub fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_kind().to_string(),
            span: self.current_span(),
        }
    }

    /// Scan forward from a `(` for `ident, ident, ... ) =>`.
    ///
    /// Never consumes. Any token other than identifiers and commas before
    /// the `)`, including a nested `(`, rejects the signature.
    pub fn is_lambda_signature(&self) -> bool {
        let mut offset = 1;
        if !matches!(self.peek_kind_at(offset), TokenKind::RParen) {
            loop {
                if !matches!(self.peek_kind_at(offset), TokenKind::Ident(_)) {
                    return false;
                }
                offset += 1;
                match self.peek_kind_at(offset) {
                    TokenKind::Comma => offset += 1,
                    TokenKind::RParen => break,
                    _ => return false,
                }
            }
        }
        matches!(self.peek_kind_at(offset + 1), TokenKind::Arrow)
    }
}
