//! Kiln evaluator.
//!
//! A tree-walking interpreter over [`kiln_ir::Program`]. Operators are not
//! built in: `a + b` looks up `plus` in the method table for the kind of
//! `a` and calls it with `a` as receiver. Tables are populated when a fresh
//! runtime is built and can be extended from scripts with `registerMethod`.
//!
//! Entry points:
//! - [`create_fresh_runtime_environment`] / [`RuntimeBuilder`] build a
//!   global [`Environment`] with every native bound.
//! - [`evaluate`] runs a parsed program against an environment.

mod environment;
mod errors;
mod interpreter;
mod methods;
mod natives;
mod print_handler;
mod registry;
mod runtime;
mod value;

pub use environment::{AssignError, Environment, LocalScope, Scope};
pub use errors::{
    canvas_dimension, for_requires_iterator, native_argument_type, not_callable, out_of_bounds,
    stack_overflow, undefined_variable, unknown_operator, unknown_value_kind, EvalError,
    EvalErrorKind, EvalResult,
};
pub use interpreter::{evaluate, Interpreter};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use registry::MethodRegistry;
pub use runtime::{create_fresh_runtime_environment, EvalConfig, Runtime, RuntimeBuilder};
pub use value::{
    clamp_channel, Closure, FunctionValue, NativeFn, NativeFunction, PixelBuffer, RangeIter,
    Step, Value, ValueIterator, ValueKind,
};
