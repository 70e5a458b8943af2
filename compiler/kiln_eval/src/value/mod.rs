//! Runtime values.
//!
//! Scalars (`Number`, `Str`, `Bool`, `Null`) behave as copies: `Str` shares
//! an immutable `Rc<str>`, so cloning never aliases anything observable.
//! Functions, iterators, and pixel buffers are shared handles, so mutation
//! through one binding is visible through every other.

mod iterator;
mod pixels;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kiln_ir::Block;

pub use iterator::{RangeIter, Step, ValueIterator};
pub use pixels::{clamp_channel, PixelBuffer};

use crate::{Environment, EvalResult, Interpreter};

/// Signature shared by native builtins and native methods.
///
/// The receiver is `Some` when the function was reached through method
/// dispatch (an infix operator or `.name(...)`).
pub type NativeFn = fn(&mut Interpreter, Option<&Value>, &[Value]) -> EvalResult;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Null,
    Function(FunctionValue),
    Iterator(Rc<RefCell<dyn ValueIterator>>),
    PixelBuffer(Rc<RefCell<PixelBuffer>>),
}

#[derive(Clone)]
pub enum FunctionValue {
    User(Rc<Closure>),
    Native(NativeFunction),
}

/// A user function plus the environment it was created in.
pub struct Closure {
    pub params: Rc<[String]>,
    pub body: Rc<Block>,
    pub env: Environment,
    pub name: Option<String>,
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn native(name: &'static str, func: NativeFn) -> Self {
        Value::Function(FunctionValue::Native(NativeFunction { name, func }))
    }

    pub fn closure(closure: Closure) -> Self {
        Value::Function(FunctionValue::User(Rc::new(closure)))
    }

    pub fn iterator(iter: impl ValueIterator + 'static) -> Self {
        Value::Iterator(Rc::new(RefCell::new(iter)))
    }

    pub fn pixel_buffer(buffer: PixelBuffer) -> Self {
        Value::PixelBuffer(Rc::new(RefCell::new(buffer)))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Str(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
            Value::Function(_) => ValueKind::Function,
            Value::Iterator(_) => ValueKind::Iterator,
            Value::PixelBuffer(_) => ValueKind::PixelBuffer,
        }
    }

    /// `null` and `false` are falsy, as are `0` and `""`. Handles are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Function(_) | Value::Iterator(_) | Value::PixelBuffer(_) => true,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(FunctionValue::User(a)), Value::Function(FunctionValue::User(b))) => {
                Rc::ptr_eq(a, b)
            }
            (
                Value::Function(FunctionValue::Native(a)),
                Value::Function(FunctionValue::Native(b)),
            ) => a.name == b.name,
            (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
            (Value::PixelBuffer(a), Value::PixelBuffer(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => fmt_number(*n, f),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Function(FunctionValue::User(closure)) => match &closure.name {
                Some(name) => write!(f, "<function {name}>"),
                None => f.write_str("<function>"),
            },
            Value::Function(FunctionValue::Native(native)) => {
                write!(f, "<native {}>", native.name)
            }
            Value::Iterator(_) => f.write_str("<iterator>"),
            Value::PixelBuffer(buffer) => {
                let buffer = buffer.borrow();
                write!(f, "<pixelBuffer {}x{}>", buffer.width(), buffer.height())
            }
        }
    }
}

// Closures would print their whole captured environment otherwise.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            other => write!(f, "{other}"),
        }
    }
}

/// Numbers print the way a JavaScript host prints them.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Also covers -0.
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

/// Tag used to key the method tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Null,
    Function,
    Iterator,
    PixelBuffer,
}

impl ValueKind {
    pub const COUNT: usize = 7;

    pub const ALL: [ValueKind; Self::COUNT] = [
        ValueKind::Number,
        ValueKind::String,
        ValueKind::Boolean,
        ValueKind::Null,
        ValueKind::Function,
        ValueKind::Iterator,
        ValueKind::PixelBuffer,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Function => "function",
            ValueKind::Iterator => "iterator",
            ValueKind::PixelBuffer => "pixelBuffer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
