//! Runtime construction.
//!
//! A [`Runtime`] owns what every environment of one run shares: the method
//! tables, the print handler, and the configuration. Each fresh runtime gets
//! its own tables, so `registerMethod` in one run never leaks into another.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    methods, natives, stdout_handler, Environment, MethodRegistry, SharedPrintHandler, Value,
    ValueKind,
};

/// Interpreter limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// User function calls nested deeper than this fail with a
    /// stack-overflow error.
    pub max_call_depth: usize,
    /// Largest side `canvas` accepts. `None` accepts any positive size
    /// whose buffer can be addressed.
    pub max_canvas_side: Option<usize>,
}

impl EvalConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            max_canvas_side: None,
        }
    }
}

pub struct Runtime {
    methods: RefCell<MethodRegistry>,
    print_handler: SharedPrintHandler,
    config: EvalConfig,
}

impl Runtime {
    /// A runtime with empty method tables.
    pub fn new(print_handler: SharedPrintHandler, config: EvalConfig) -> Self {
        Runtime {
            methods: RefCell::new(MethodRegistry::new()),
            print_handler,
            config,
        }
    }

    pub fn lookup_method(&self, kind: ValueKind, name: &str) -> Option<Value> {
        self.methods.borrow().lookup(kind, name)
    }

    pub fn register_method(&self, kind: ValueKind, name: impl Into<String>, callable: Value) {
        self.methods.borrow_mut().register(kind, name, callable);
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    #[inline]
    pub fn config(&self) -> EvalConfig {
        self.config
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(stdout_handler(), EvalConfig::default())
    }
}

/// Builder for a fresh global environment.
#[derive(Default)]
pub struct RuntimeBuilder {
    print_handler: Option<SharedPrintHandler>,
    config: EvalConfig,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder::default()
    }

    /// Where `print` writes. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn max_canvas_side(mut self, side: usize) -> Self {
        self.config.max_canvas_side = Some(side);
        self
    }

    /// Build the runtime and a global environment with every native bound
    /// and every builtin method registered.
    pub fn build(self) -> Environment {
        let runtime = Runtime::new(
            self.print_handler.unwrap_or_else(stdout_handler),
            self.config,
        );
        methods::register_builtin_methods(&mut runtime.methods.borrow_mut());
        let env = Environment::new(Rc::new(runtime));
        natives::define_natives(&env);
        tracing::debug!(
            max_call_depth = self.config.max_call_depth,
            max_canvas_side = ?self.config.max_canvas_side,
            "built runtime"
        );
        env
    }
}

/// A global environment with the default configuration, printing to stdout.
pub fn create_fresh_runtime_environment() -> Environment {
    RuntimeBuilder::new().build()
}
