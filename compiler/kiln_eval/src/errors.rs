//! Runtime errors.
//!
//! Every failure aborts the current run. Errors are built through the
//! `#[cold]` factory functions below and pick up the span of the innermost
//! expression that failed as they propagate.

use kiln_ir::Span;
use thiserror::Error;

use crate::{Value, ValueKind};

pub type EvalResult = Result<Value, EvalError>;

/// Category of a runtime failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalErrorKind {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("{kind} is not callable")]
    NotCallable { kind: ValueKind },

    /// Also raised for `.method(...)` calls with no registered method.
    #[error("no operator '{name}' for {kind}")]
    UnknownOperator { name: String, kind: ValueKind },

    #[error("{function} expects argument {position} to be {expected}, found {found}")]
    NativeArgumentType {
        function: String,
        position: usize,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("canvas dimensions must be finite positive numbers, got {width} x {height}")]
    CanvasDimension { width: String, height: String },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },

    #[error("for loop requires an iterator, found {kind}")]
    ForRequiresIterator { kind: ValueKind },

    #[error("unknown value kind '{name}'")]
    UnknownValueKind { name: String },

    #[error("maximum call depth exceeded (limit: {limit})")]
    StackOverflow { limit: usize },
}

/// A runtime failure with the span of the expression that raised it.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more precise one is already present.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_callable(kind: ValueKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { kind })
}

#[cold]
pub fn unknown_operator(name: &str, kind: ValueKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownOperator {
        name: name.to_string(),
        kind,
    })
}

/// `position` is 1-based.
#[cold]
pub fn native_argument_type(
    function: &str,
    position: usize,
    expected: &'static str,
    found: ValueKind,
) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NativeArgumentType {
        function: function.to_string(),
        position,
        expected,
        found,
    })
}

#[cold]
pub fn canvas_dimension(width: &str, height: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CanvasDimension {
        width: width.to_string(),
        height: height.to_string(),
    })
}

#[cold]
pub fn out_of_bounds(x: f64, y: f64, width: usize, height: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OutOfBounds {
        x,
        y,
        width,
        height,
    })
}

#[cold]
pub fn for_requires_iterator(kind: ValueKind) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ForRequiresIterator { kind })
}

#[cold]
pub fn unknown_value_kind(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownValueKind {
        name: name.to_string(),
    })
}

#[cold]
pub fn stack_overflow(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { limit })
}
