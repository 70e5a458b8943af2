//! Syntax tree produced by the parser.
//!
//! Nodes are immutable once built. Function bodies sit behind `Rc` so a
//! closure value can hold on to its body without cloning the tree.

use std::rc::Rc;

use crate::Span;

/// A parsed source file.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `let name = value`
    Let { name: String, value: Expr },
    /// `name = value`, only valid for an existing binding
    Assign { name: String, value: Expr },
    /// `for binding in iterable { body }`
    For {
        binding: String,
        iterable: Expr,
        body: Block,
    },
    Expr(Expr),
}

/// A brace-delimited statement list.
///
/// `is_function_body` marks blocks that are evaluated directly in a call
/// frame's environment instead of pushing their own scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub is_function_body: bool,
    pub span: Span,
}

impl Block {
    /// Wrap a single expression as a one-statement block.
    pub fn from_expr(expr: Expr, is_function_body: bool) -> Self {
        let span = expr.span;
        Block {
            statements: vec![Stmt::new(StmtKind::Expr(expr), span)],
            is_function_body,
            span,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Ident(String),
    /// `(a, b) => body`
    Function {
        params: Rc<[String]>,
        body: Rc<Block>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `receiver.method(args)`
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Block(Block),
    /// Trailing `{ ... }` after a call, passed as a zero-parameter function.
    BlockAsFunction(Rc<Block>),
    If {
        condition: Box<Expr>,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    /// `left op right`, dispatched as `op` on the left operand's kind.
    Infix {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl ExprKind {
    /// Whether a trailing block may attach to this expression.
    pub fn is_call(&self) -> bool {
        matches!(self, ExprKind::Call { .. } | ExprKind::MethodCall { .. })
    }
}
