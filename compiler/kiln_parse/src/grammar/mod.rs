//! Grammar productions, split into statements and expressions.

mod expr;
mod stmt;
