//! Expression parsing: the operator tier, call suffixes, and primaries.

use std::rc::Rc;

use kiln_ir::{Block, Expr, ExprKind, Span, TokenKind};
use kiln_stack::ensure_sufficient_stack;

use crate::{ParseContext, Parser, SyntaxError};

impl Parser<'_> {
    /// `call { OPERATOR call }`, left-associative with a single tier.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        ensure_sufficient_stack(|| {
            let mut left = self.parse_call()?;
            while let Some(op) = self.cursor.current_operator() {
                self.cursor.advance();
                let right = self.parse_call()?;
                let span = left.span.merge(right.span);
                left = Expr::new(
                    ExprKind::Infix {
                        op: op.to_string(),
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                );
            }
            Ok(left)
        })
    }

    /// A primary followed by call and method-call suffixes, then an
    /// optional trailing block that becomes the call's last argument.
    fn parse_call(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::LParen => {
                    let (args, end) = self.parse_args()?;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let method = self.cursor.expect_ident()?;
                    let (args, end) = self.parse_args()?;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            receiver: Box::new(expr),
                            method,
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBrace
                    if expr.kind.is_call()
                        && !self.context.has(ParseContext::NO_TRAILING_BLOCK) =>
                {
                    let block = self.parse_block(true)?;
                    return Ok(attach_trailing_block(expr, block));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `( expr, ... )`, returning the arguments and the closing paren's span.
    fn parse_args(&mut self) -> Result<(Vec<Expr>, Span), SyntaxError> {
        self.cursor.expect(&TokenKind::LParen)?;
        self.with_fresh_context(|p| {
            let mut args = Vec::new();
            p.skip_newlines();
            while !p.cursor.check(&TokenKind::RParen) {
                args.push(p.parse_expr()?);
                p.skip_newlines();
                if p.cursor.check(&TokenKind::Comma) {
                    p.cursor.advance();
                    p.skip_newlines();
                } else {
                    break;
                }
            }
            let end = p.cursor.expect(&TokenKind::RParen)?.span;
            Ok((args, end))
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.cursor.current();
        let span = token.span;
        let kind = match &token.kind {
            TokenKind::Number(bits) => ExprKind::Number(f64::from_bits(*bits)),
            TokenKind::Str(s) => ExprKind::Str(s.clone()),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Ident(name) => ExprKind::Ident(name.clone()),
            TokenKind::If => return self.parse_if(),
            TokenKind::LBrace => {
                let block = self.parse_block(false)?;
                let span = block.span;
                return Ok(Expr::new(ExprKind::Block(block), span));
            }
            TokenKind::LParen if self.cursor.is_lambda_signature() => return self.parse_lambda(),
            TokenKind::LParen => return self.parse_parenthesized(),
            _ => return Err(self.cursor.unexpected("expression")),
        };
        self.cursor.advance();
        Ok(Expr::new(kind, span))
    }

    /// `( expr )`. The span grows to cover the parens so slicing the
    /// source by span reproduces a parseable expression.
    fn parse_parenthesized(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::LParen)?.span;
        let mut inner = self.with_fresh_context(|p| {
            p.skip_newlines();
            let inner = p.parse_expr()?;
            p.skip_newlines();
            Ok::<_, SyntaxError>(inner)
        })?;
        let end = self.cursor.expect(&TokenKind::RParen)?.span;
        inner.span = start.merge(end);
        Ok(inner)
    }

    /// `(a, b) => body`, only entered after the signature lookahead matched.
    fn parse_lambda(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::LParen)?.span;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            params.push(self.cursor.expect_ident()?);
            if self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::Arrow)?;
        self.skip_newlines();

        let body = if self.cursor.check(&TokenKind::LBrace) {
            self.parse_block(true)?
        } else {
            Block::from_expr(self.parse_expr()?, true)
        };
        let span = start.merge(body.span);
        Ok(Expr::new(
            ExprKind::Function {
                params: params.into(),
                body: Rc::new(body),
            },
            span,
        ))
    }

    /// `if cond branch [else (if ... | branch)]`
    fn parse_if(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.cursor.expect(&TokenKind::If)?.span;
        let condition = self.with_context(ParseContext::NO_TRAILING_BLOCK, Self::parse_expr)?;
        let then_branch = self.parse_branch()?;

        let else_branch = if self.eat_else() {
            if self.cursor.check(&TokenKind::If) {
                Some(Block::from_expr(self.parse_if()?, false))
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };

        let end = else_branch.as_ref().map_or(then_branch.span, |b| b.span);
        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    /// A brace block, or a bare expression wrapped as a one-statement block.
    /// The branch may start on a later line.
    fn parse_branch(&mut self) -> Result<Block, SyntaxError> {
        self.skip_newlines();
        if self.cursor.check(&TokenKind::LBrace) {
            self.parse_block(false)
        } else {
            Ok(Block::from_expr(self.parse_expr()?, false))
        }
    }

    /// Consume `else`, looking past newlines. Rewinds if there is none.
    fn eat_else(&mut self) -> bool {
        let saved = self.cursor.position();
        self.skip_newlines();
        if self.cursor.check(&TokenKind::Else) {
            self.cursor.advance();
            true
        } else {
            self.cursor.set_position(saved);
            false
        }
    }
}

/// Desugar `call(args) { block }` into `call(args, () => { block })`.
fn attach_trailing_block(mut call: Expr, block: Block) -> Expr {
    let block_span = block.span;
    let arg = Expr::new(ExprKind::BlockAsFunction(Rc::new(block)), block_span);
    if let ExprKind::Call { args, .. } | ExprKind::MethodCall { args, .. } = &mut call.kind {
        args.push(arg);
    }
    call.span = call.span.merge(block_span);
    call
}
