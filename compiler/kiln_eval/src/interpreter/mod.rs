//! Tree-walking interpreter.
//!
//! Scoping rules:
//! - a program runs directly in the environment it is given;
//! - a plain block, an `if` branch, and each `for` iteration get a fresh
//!   child environment;
//! - a call gets one child of the closure's captured environment, and the
//!   function body runs in it directly.

use std::rc::Rc;

use kiln_ir::{Block, Expr, ExprKind, Program, Stmt, StmtKind};
use kiln_stack::ensure_sufficient_stack;

use crate::{
    for_requires_iterator, not_callable, stack_overflow, undefined_variable, unknown_operator,
    Closure, Environment, EvalError, EvalResult, FunctionValue, Runtime, SharedPrintHandler, Step,
    Value,
};

/// Name under which a method receiver is bound inside a user function.
pub const SELF_NAME: &str = "self";

pub struct Interpreter {
    runtime: Rc<Runtime>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(runtime: Rc<Runtime>) -> Self {
        Interpreter {
            runtime,
            call_depth: 0,
        }
    }

    #[inline]
    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.runtime
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        self.runtime.print_handler()
    }

    /// Evaluate every statement in `env`; the last value is the result.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> EvalResult {
        self.eval_statements(&program.statements, env)
    }

    fn eval_statements(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult {
        let mut result = Value::Null;
        for stmt in statements {
            result = self.eval_stmt(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_block(&mut self, block: &Block, env: &Environment) -> EvalResult {
        if block.is_function_body {
            self.eval_statements(&block.statements, env)
        } else {
            self.eval_statements(&block.statements, &env.child())
        }
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult {
        self.eval_stmt_inner(stmt, env).map_err(|e| e.or_span(stmt.span))
    }

    fn eval_stmt_inner(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                let value = match &value.kind {
                    // A function literal bound by `let` takes the binding's name.
                    ExprKind::Function { params, body } => {
                        make_closure(params, body, env, Some(name.clone()))
                    }
                    _ => self.eval_expr(value, env)?,
                };
                env.define(name.clone(), value.clone());
                Ok(value)
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value, env)?;
                env.assign(name, value.clone())
                    .map_err(|_| undefined_variable(name))?;
                Ok(value)
            }
            StmtKind::For {
                binding,
                iterable,
                body,
            } => self.eval_for(binding, iterable, body, env),
            StmtKind::Expr(expr) => self.eval_expr(expr, env),
        }
    }

    fn eval_for(
        &mut self,
        binding: &str,
        iterable: &Expr,
        body: &Block,
        env: &Environment,
    ) -> EvalResult {
        let iter = match self.eval_expr(iterable, env)? {
            Value::Iterator(iter) => iter,
            other => return Err(for_requires_iterator(other.kind()).with_span(iterable.span)),
        };

        let loop_env = env.child();
        loop_env.define(binding, Value::Null);

        let mut result = Value::Null;
        loop {
            // Release the borrow before running the body.
            let step = iter.borrow_mut().next_step();
            match step {
                Step::Done => return Ok(result),
                Step::Yield(value) => {
                    loop_env.define(binding, value);
                    result = self.eval_block(body, &loop_env)?;
                }
            }
        }
    }

    /// Evaluate an expression, tagging any error with its span unless a
    /// nested expression already did.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
            .map_err(|e| e.or_span(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::string(s)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Ident(name) => env.get(name).ok_or_else(|| undefined_variable(name)),
            ExprKind::Function { params, body } => Ok(make_closure(params, body, env, None)),
            ExprKind::BlockAsFunction(body) => {
                Ok(make_closure(&Rc::<[String]>::from([]), body, env, None))
            }
            ExprKind::Block(block) => self.eval_block(block, env),
            ExprKind::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                if !matches!(callee, Value::Function(_)) {
                    return Err(not_callable(callee.kind()));
                }
                let args = self.eval_args(args, env)?;
                self.call_value(&callee, None, args)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval_expr(receiver, env)?;
                let args = self.eval_args(args, env)?;
                self.call_method(receiver, method, args)
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    self.eval_block(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.eval_block(else_branch, env)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::Infix { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                self.call_method(left, op, vec![right])
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Environment) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval_expr(arg, env)).collect()
    }

    /// Dispatch `name` on the receiver's kind.
    pub fn call_method(&mut self, receiver: Value, name: &str, args: Vec<Value>) -> EvalResult {
        let kind = receiver.kind();
        let method = self
            .runtime
            .lookup_method(kind, name)
            .ok_or_else(|| unknown_operator(name, kind))?;
        self.call_value(&method, Some(receiver), args)
    }

    /// Apply a function value. The receiver, if any, is bound as `self` in
    /// user functions and passed through to natives.
    #[tracing::instrument(level = "debug", skip_all, fields(callee = %callee, args = args.len()))]
    pub fn call_value(
        &mut self,
        callee: &Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> EvalResult {
        match callee {
            Value::Function(FunctionValue::Native(native)) => {
                (native.func)(self, receiver.as_ref(), &args)
            }
            Value::Function(FunctionValue::User(closure)) => {
                self.call_closure(closure, receiver, args)
            }
            other => Err(not_callable(other.kind())),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> EvalResult {
        let limit = self.runtime.config().max_call_depth;
        if self.call_depth >= limit {
            return Err(stack_overflow(limit));
        }

        let call_env = closure.env.child();
        if let Some(receiver) = receiver {
            call_env.define(SELF_NAME, receiver);
        }
        // Missing arguments bind null; extras are dropped.
        let mut args = args.into_iter();
        for param in closure.params.iter() {
            call_env.define(param.clone(), args.next().unwrap_or(Value::Null));
        }

        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_block(&closure.body, &call_env));
        self.call_depth -= 1;
        result
    }
}

fn make_closure(
    params: &Rc<[String]>,
    body: &Rc<Block>,
    env: &Environment,
    name: Option<String>,
) -> Value {
    Value::closure(Closure {
        params: Rc::clone(params),
        body: Rc::clone(body),
        env: env.clone(),
        name,
    })
}

/// Evaluate `program` in `env` with a fresh interpreter bound to the
/// environment's runtime.
pub fn evaluate(program: &Program, env: &Environment) -> EvalResult {
    Interpreter::new(Rc::clone(env.runtime())).eval_program(program, env)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
