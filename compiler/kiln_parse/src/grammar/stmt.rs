//! Program, statement, and block parsing.

use kiln_ir::{Block, Program, Stmt, StmtKind, TokenKind};
use kiln_stack::ensure_sufficient_stack;

use crate::{ParseContext, Parser, SyntaxError};

impl Parser<'_> {
    /// Parse the whole token stream as a program.
    pub fn parse_program(mut self) -> Result<Program, SyntaxError> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.cursor.is_at_end() {
            statements.push(self.parse_stmt()?);
            self.skip_newlines();
        }
        Ok(Program { statements })
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        ensure_sufficient_stack(|| match self.cursor.current_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::For => self.parse_for(),
            TokenKind::Ident(_) if matches!(self.cursor.peek_kind_at(1), TokenKind::Eq) => {
                self.parse_assign()
            }
            _ => {
                let expr = self.parse_expr()?;
                let span = expr.span;
                Ok(Stmt::new(StmtKind::Expr(expr), span))
            }
        })
    }

    /// `let name = value`
    fn parse_let(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::Let)?.span;
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span);
        Ok(Stmt::new(StmtKind::Let { name, value }, span))
    }

    /// `name = value`
    fn parse_assign(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.cursor.current_span();
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span);
        Ok(Stmt::new(StmtKind::Assign { name, value }, span))
    }

    /// `for binding in iterable { body }`
    fn parse_for(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::For)?.span;
        let binding = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::In)?;
        let iterable = self.with_context(ParseContext::NO_TRAILING_BLOCK, Self::parse_expr)?;
        let body = self.parse_block(false)?;
        let span = start.merge(body.span);
        Ok(Stmt::new(
            StmtKind::For {
                binding,
                iterable,
                body,
            },
            span,
        ))
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self, is_function_body: bool) -> Result<Block, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?.span;
        self.with_fresh_context(|p| {
            let mut statements = Vec::new();
            p.skip_newlines();
            while !p.cursor.check(&TokenKind::RBrace) && !p.cursor.is_at_end() {
                statements.push(p.parse_stmt()?);
                p.skip_newlines();
            }
            let end = p.cursor.expect(&TokenKind::RBrace)?.span;
            Ok(Block {
                statements,
                is_function_body,
                span: start.merge(end),
            })
        })
    }
}
