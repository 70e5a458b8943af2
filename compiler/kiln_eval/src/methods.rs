//! Built-in operator methods for numbers, strings, and booleans.
//!
//! Every infix operator lands here through the registry: `a + b` calls the
//! `plus` entry of `a`'s kind with `a` as receiver and `b` as the single
//! argument. Nothing is coerced except the right operand of string `plus`.

use crate::{
    native_argument_type, unknown_operator, EvalError, EvalResult, Interpreter, MethodRegistry,
    RangeIter, Value, ValueKind,
};

pub(crate) fn register_builtin_methods(registry: &mut MethodRegistry) {
    let number: [(&'static str, crate::NativeFn); 11] = [
        ("plus", number_plus),
        ("minus", number_minus),
        ("times", number_times),
        ("dividedBy", number_divided_by),
        ("equals", number_equals),
        ("lessThan", number_less_than),
        ("lessThanOrEqual", number_less_than_or_equal),
        ("greaterThan", number_greater_than),
        ("greaterThanOrEqual", number_greater_than_or_equal),
        ("rangeExclusive", number_range_exclusive),
        ("rangeInclusive", number_range_inclusive),
    ];
    for (name, func) in number {
        registry.register(ValueKind::Number, name, Value::native(name, func));
    }

    registry.register(ValueKind::String, "plus", Value::native("plus", string_plus));
    registry.register(
        ValueKind::String,
        "equals",
        Value::native("equals", string_equals),
    );

    registry.register(ValueKind::Boolean, "and", Value::native("and", boolean_and));
    registry.register(ValueKind::Boolean, "or", Value::native("or", boolean_or));
    registry.register(
        ValueKind::Boolean,
        "equals",
        Value::native("equals", boolean_equals),
    );
}

/// The single right-hand operand, `null` when missing.
fn operand(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Null)
}

fn receiver_number(receiver: Option<&Value>, method: &str) -> Result<f64, EvalError> {
    match receiver {
        Some(Value::Number(n)) => Ok(*n),
        other => Err(unknown_operator(
            method,
            other.map_or(ValueKind::Null, Value::kind),
        )),
    }
}

fn number_operand(args: &[Value], method: &str) -> Result<f64, EvalError> {
    match operand(args) {
        Value::Number(n) => Ok(n),
        other => Err(native_argument_type(method, 1, "a number", other.kind())),
    }
}

fn arithmetic(
    receiver: Option<&Value>,
    args: &[Value],
    method: &str,
    op: fn(f64, f64) -> f64,
) -> EvalResult {
    let left = receiver_number(receiver, method)?;
    let right = number_operand(args, method)?;
    Ok(Value::Number(op(left, right)))
}

fn comparison(
    receiver: Option<&Value>,
    args: &[Value],
    method: &str,
    op: fn(f64, f64) -> bool,
) -> EvalResult {
    let left = receiver_number(receiver, method)?;
    let right = number_operand(args, method)?;
    Ok(Value::Bool(op(left, right)))
}

fn number_plus(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    arithmetic(receiver, args, "plus", |a, b| a + b)
}

fn number_minus(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    arithmetic(receiver, args, "minus", |a, b| a - b)
}

fn number_times(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    arithmetic(receiver, args, "times", |a, b| a * b)
}

/// IEEE division: `1 / 0` is `Infinity`, `0 / 0` is `NaN`.
fn number_divided_by(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    arithmetic(receiver, args, "dividedBy", |a, b| a / b)
}

/// Numbers never equal a value of another kind.
fn number_equals(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let left = receiver_number(receiver, "equals")?;
    Ok(Value::Bool(matches!(operand(args), Value::Number(right) if left == right)))
}

fn number_less_than(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    comparison(receiver, args, "lessThan", |a, b| a < b)
}

fn number_less_than_or_equal(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    comparison(receiver, args, "lessThanOrEqual", |a, b| a <= b)
}

fn number_greater_than(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    comparison(receiver, args, "greaterThan", |a, b| a > b)
}

fn number_greater_than_or_equal(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    comparison(receiver, args, "greaterThanOrEqual", |a, b| a >= b)
}

fn number_range_exclusive(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    let start = receiver_number(receiver, "rangeExclusive")?;
    let end = number_operand(args, "rangeExclusive")?;
    Ok(Value::iterator(RangeIter::exclusive(start, end)))
}

fn number_range_inclusive(
    _: &mut Interpreter,
    receiver: Option<&Value>,
    args: &[Value],
) -> EvalResult {
    let start = receiver_number(receiver, "rangeInclusive")?;
    let end = number_operand(args, "rangeInclusive")?;
    Ok(Value::iterator(RangeIter::inclusive(start, end)))
}

fn receiver_str<'a>(receiver: Option<&'a Value>, method: &str) -> Result<&'a str, EvalError> {
    match receiver {
        Some(Value::Str(s)) => Ok(s),
        other => Err(unknown_operator(
            method,
            other.map_or(ValueKind::Null, Value::kind),
        )),
    }
}

/// Concatenate. Numbers and booleans on the right are rendered as text;
/// any other non-string operand contributes nothing.
fn string_plus(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let left = receiver_str(receiver, "plus")?;
    let right = match operand(args) {
        Value::Str(s) => s.to_string(),
        value @ (Value::Number(_) | Value::Bool(_)) => value.to_string(),
        _ => String::new(),
    };
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(&right);
    Ok(Value::string(&joined))
}

fn string_equals(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let left = receiver_str(receiver, "equals")?;
    Ok(Value::Bool(operand(args).as_str() == Some(left)))
}

fn boolean_operands(
    receiver: Option<&Value>,
    args: &[Value],
    method: &str,
) -> Result<(bool, bool), EvalError> {
    let left = match receiver {
        Some(Value::Bool(b)) => *b,
        other => {
            return Err(unknown_operator(
                method,
                other.map_or(ValueKind::Null, Value::kind),
            ))
        }
    };
    match operand(args) {
        Value::Bool(right) => Ok((left, right)),
        other => Err(native_argument_type(method, 1, "a boolean", other.kind())),
    }
}

/// Both sides are already evaluated; there is no short-circuiting.
fn boolean_and(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let (left, right) = boolean_operands(receiver, args, "and")?;
    Ok(Value::Bool(left && right))
}

fn boolean_or(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let (left, right) = boolean_operands(receiver, args, "or")?;
    Ok(Value::Bool(left || right))
}

fn boolean_equals(_: &mut Interpreter, receiver: Option<&Value>, args: &[Value]) -> EvalResult {
    let left = match receiver {
        Some(Value::Bool(b)) => *b,
        other => {
            return Err(unknown_operator(
                "equals",
                other.map_or(ValueKind::Null, Value::kind),
            ))
        }
    };
    Ok(Value::Bool(matches!(operand(args), Value::Bool(right) if left == right)))
}
