//! Kiln IR - shared front-end types.
//!
//! - Spans for source locations
//! - Tokens and `TokenList` for lexer output
//! - The syntax tree (`Program`, `Stmt`, `Expr`, `Block`)
//! - The fixed set of infix operator names

pub mod ast;
mod span;
mod token;

pub use ast::{Block, Expr, ExprKind, Program, Stmt, StmtKind};
pub use span::Span;
pub use token::{is_known_operator, Token, TokenKind, TokenList, KNOWN_OPERATORS};
