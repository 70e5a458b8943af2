//! Kiln: a small expression language with closures, ranges, and pixel
//! buffers.
//!
//! This crate ties the pipeline together. Most callers only need [`run`]:
//!
//! ```text
//! source ──lex──▶ tokens ──parse──▶ Program ──evaluate──▶ Value
//! ```
//!
//! [`parse`], [`create_fresh_runtime_environment`], and [`evaluate`] are
//! exposed for hosts that keep an environment alive across several runs.

pub mod reporting;

use std::sync::Once;

use kiln_ir::Span;
use thiserror::Error;

pub use kiln_eval::{
    buffer_handler, create_fresh_runtime_environment, evaluate, silent_handler, stdout_handler,
    Environment, EvalConfig, EvalError, EvalErrorKind, PixelBuffer, RuntimeBuilder,
    SharedPrintHandler, Value, ValueKind,
};
pub use kiln_ir::Program;
pub use kiln_parse::{parse, SyntaxError};

/// Anything that can stop a [`run`].
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("runtime error: {0}")]
    Runtime(#[from] EvalError),
}

impl KilnError {
    /// Where in the source the failure was detected, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            KilnError::Syntax(err) => Some(err.span()),
            KilnError::Runtime(err) => err.span,
        }
    }

    /// The failure description without position information.
    pub fn message(&self) -> String {
        match self {
            KilnError::Syntax(err) => err.message(),
            KilnError::Runtime(err) => err.kind.to_string(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, KilnError::Syntax(_))
    }
}

/// Parse and evaluate `source`.
///
/// Without an environment, a fresh runtime printing to stdout is used.
/// Passing one lets bindings and registered methods carry over between
/// runs.
pub fn run(source: &str, env: Option<&Environment>) -> Result<Value, KilnError> {
    let program = parse(source)?;
    let value = match env {
        Some(env) => evaluate(&program, env)?,
        None => evaluate(&program, &create_fresh_runtime_environment())?,
    };
    Ok(value)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn run_uses_fresh_environment_by_default() {
        assert_eq!(run("1 + 2", None).unwrap(), Value::Number(3.0));
        assert!(matches!(
            run("undefinedName", None),
            Err(KilnError::Runtime(_))
        ));
    }

    #[test]
    fn run_reuses_supplied_environment() {
        let env = RuntimeBuilder::new().print_handler(silent_handler()).build();
        run("let seed = 4", Some(&env)).unwrap();
        assert_eq!(run("seed times 2", Some(&env)).unwrap(), Value::Number(8.0));
    }

    #[test]
    fn syntax_errors_carry_position() {
        let err = run("let = 1", None).unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.span(), Some(Span::new(4, 5)));
        assert_eq!(err.message(), "expected identifier, found '='");
    }

    #[test]
    fn runtime_errors_carry_position() {
        let err = run("1 + nope", None).unwrap_err();
        assert!(!err.is_syntax());
        assert_eq!(err.span(), Some(Span::new(4, 8)));
        assert_eq!(err.message(), "undefined variable: nope");
    }
}
