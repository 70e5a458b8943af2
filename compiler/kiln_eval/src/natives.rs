//! Global native bindings: printing, `while`, pixel buffers, and runtime
//! extension.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    canvas_dimension, clamp_channel, native_argument_type, out_of_bounds, unknown_value_kind,
    Environment, EvalError, EvalResult, Interpreter, NativeFn, PixelBuffer, Value, ValueKind,
};

pub(crate) fn define_natives(env: &Environment) {
    env.define("true", Value::Bool(true));
    env.define("false", Value::Bool(false));
    env.define("null", Value::Null);

    let natives: [(&'static str, NativeFn); 9] = [
        ("print", native_print),
        ("while", native_while),
        ("canvas", native_canvas),
        ("canvasWidth", native_canvas_width),
        ("canvasHeight", native_canvas_height),
        ("fillCanvas", native_fill_canvas),
        ("setPixel", native_set_pixel),
        ("registerMethod", native_register_method),
        ("typeOf", native_type_of),
    ];
    for (name, func) in natives {
        env.define(name, Value::native(name, func));
    }
}

// Argument helpers. Positions in errors are 1-based.

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn require_function(function: &str, args: &[Value], index: usize) -> Result<Value, EvalError> {
    match arg(args, index) {
        value @ Value::Function(_) => Ok(value),
        other => Err(native_argument_type(
            function,
            index + 1,
            "a function",
            other.kind(),
        )),
    }
}

fn require_number(function: &str, args: &[Value], index: usize) -> Result<f64, EvalError> {
    match arg(args, index) {
        Value::Number(n) => Ok(n),
        other => Err(native_argument_type(
            function,
            index + 1,
            "a number",
            other.kind(),
        )),
    }
}

fn require_string(function: &str, args: &[Value], index: usize) -> Result<Rc<str>, EvalError> {
    match arg(args, index) {
        Value::Str(s) => Ok(s),
        other => Err(native_argument_type(
            function,
            index + 1,
            "a string",
            other.kind(),
        )),
    }
}

fn require_canvas(
    function: &str,
    args: &[Value],
    index: usize,
) -> Result<Rc<RefCell<PixelBuffer>>, EvalError> {
    match arg(args, index) {
        Value::PixelBuffer(buffer) => Ok(buffer),
        other => Err(native_argument_type(
            function,
            index + 1,
            "a pixel buffer",
            other.kind(),
        )),
    }
}

/// `r, g, b` starting at `first`, then an optional alpha defaulting to 255.
fn require_rgba(function: &str, args: &[Value], first: usize) -> Result<[u8; 4], EvalError> {
    let r = require_number(function, args, first)?;
    let g = require_number(function, args, first + 1)?;
    let b = require_number(function, args, first + 2)?;
    let a = match args.get(first + 3) {
        None | Some(Value::Null) => 255.0,
        Some(_) => require_number(function, args, first + 3)?,
    };
    Ok([
        clamp_channel(r),
        clamp_channel(g),
        clamp_channel(b),
        clamp_channel(a),
    ])
}

/// `print(values...)`: display forms joined by spaces, one line per call.
fn native_print(interp: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    interp.print_handler().println(&line);
    Ok(Value::Null)
}

/// `while(condition, body)`: call `body` until `condition()` turns falsy.
/// Yields the last body result, or `null` if the body never ran.
fn native_while(interp: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let condition = require_function("while", args, 0)?;
    let body = require_function("while", args, 1)?;

    let mut result = Value::Null;
    while interp.call_value(&condition, None, Vec::new())?.is_truthy() {
        result = interp.call_value(&body, None, Vec::new())?;
    }
    Ok(result)
}

/// A floored side length, if it is finite, at least 1, and within `limit`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "finite and at least 1; sides past usize::MAX saturate and fail the size check"
)]
fn canvas_side(value: &Value, limit: Option<usize>) -> Option<usize> {
    let n = value.as_number()?.floor();
    if !n.is_finite() || n < 1.0 {
        return None;
    }
    let side = n as usize;
    match limit {
        Some(max) if side > max => None,
        _ => Some(side),
    }
}

/// Whether a `width` x `height` RGBA buffer has a representable byte size.
fn addressable(width: usize, height: usize) -> bool {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .is_some_and(|bytes| bytes <= isize::MAX.unsigned_abs())
}

fn native_canvas(interp: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let limit = interp.runtime().config().max_canvas_side;
    let width = arg(args, 0);
    let height = arg(args, 1);
    match (canvas_side(&width, limit), canvas_side(&height, limit)) {
        (Some(w), Some(h)) if addressable(w, h) => {
            Ok(Value::pixel_buffer(PixelBuffer::new(w, h)))
        }
        _ => Err(canvas_dimension(&width.to_string(), &height.to_string())),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "an allocated canvas side is far below 2^53"
)]
fn native_canvas_width(_: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let buffer = require_canvas("canvasWidth", args, 0)?;
    let width = buffer.borrow().width();
    Ok(Value::Number(width as f64))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "an allocated canvas side is far below 2^53"
)]
fn native_canvas_height(_: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let buffer = require_canvas("canvasHeight", args, 0)?;
    let height = buffer.borrow().height();
    Ok(Value::Number(height as f64))
}

/// `fillCanvas(buffer, r, g, b, a?)`, yielding the buffer.
fn native_fill_canvas(_: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let buffer = require_canvas("fillCanvas", args, 0)?;
    let rgba = require_rgba("fillCanvas", args, 1)?;
    buffer.borrow_mut().fill(rgba);
    Ok(Value::PixelBuffer(buffer))
}

/// `setPixel(buffer, x, y, r, g, b, a?)`, yielding the buffer.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "coordinates are bounds-checked against the canvas before the cast"
)]
fn native_set_pixel(_: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    let buffer = require_canvas("setPixel", args, 0)?;
    let x = require_number("setPixel", args, 1)?.floor();
    let y = require_number("setPixel", args, 2)?.floor();
    let rgba = require_rgba("setPixel", args, 3)?;

    let (width, height) = {
        let buffer = buffer.borrow();
        (buffer.width(), buffer.height())
    };
    let inside = |v: f64, limit: usize| v.is_finite() && v >= 0.0 && v < limit as f64;
    if !inside(x, width) || !inside(y, height) {
        return Err(out_of_bounds(x, y, width, height));
    }

    buffer.borrow_mut().set_pixel(x as usize, y as usize, rgba);
    Ok(Value::PixelBuffer(buffer))
}

/// `registerMethod(kindName, name, function)`: add or replace a method
/// for every value of that kind in this runtime.
fn native_register_method(
    interp: &mut Interpreter,
    _: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    let kind_name = require_string("registerMethod", args, 0)?;
    let name = require_string("registerMethod", args, 1)?;
    let function = require_function("registerMethod", args, 2)?;

    let kind = ValueKind::from_name(&kind_name).ok_or_else(|| unknown_value_kind(&kind_name))?;
    tracing::debug!(kind = %kind, method = %name, "registering method");
    interp.runtime().register_method(kind, &*name, function);
    Ok(Value::Null)
}

fn native_type_of(_: &mut Interpreter, _: Option<&Value>, args: &[Value]) -> EvalResult {
    Ok(Value::string(arg(args, 0).kind().name()))
}
