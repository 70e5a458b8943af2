use super::*;
use crate::{buffer_handler, EvalErrorKind, RuntimeBuilder, ValueKind};
use pretty_assertions::assert_eq;

fn run_with(builder: RuntimeBuilder, source: &str) -> (EvalResult, String) {
    let output = buffer_handler();
    let env = builder.print_handler(output.clone()).build();
    let program = kiln_parse::parse(source).unwrap();
    let result = evaluate(&program, &env);
    (result, output.get_output())
}

fn eval(source: &str) -> Value {
    run_with(RuntimeBuilder::new(), source).0.unwrap()
}

fn eval_err(source: &str) -> EvalErrorKind {
    run_with(RuntimeBuilder::new(), source).0.unwrap_err().kind
}

fn output(source: &str) -> String {
    let (result, output) = run_with(RuntimeBuilder::new(), source);
    result.unwrap();
    output
}

fn pixel(value: &Value, x: usize, y: usize) -> Option<[u8; 4]> {
    match value {
        Value::PixelBuffer(buffer) => buffer.borrow().pixel(x, y),
        _ => None,
    }
}

// Operators

#[test]
fn single_precedence_tier() {
    assert_eq!(eval("1 plus 2 times 3"), Value::Number(9.0));
    assert_eq!(eval("1 + 2 * 3"), Value::Number(9.0));
    assert_eq!(eval("1 + (2 * 3)"), Value::Number(7.0));
}

#[test]
fn arithmetic_follows_ieee() {
    assert_eq!(eval("10 / 4"), Value::Number(2.5));
    assert_eq!(eval("1 / 0"), Value::Number(f64::INFINITY));
    assert_eq!(eval("2 minus 5"), Value::Number(-3.0));
    assert_eq!(eval("0 / 0").to_string(), "NaN");
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(eval("(3 < 4) and (2 >= 2)"), Value::Bool(true));
    assert_eq!(eval("(3 > 4) or false"), Value::Bool(false));
    assert_eq!(eval("4 lessThanOrEqual 4"), Value::Bool(true));
}

#[test]
fn equality_across_kinds_is_false() {
    assert_eq!(eval("1 == 1"), Value::Bool(true));
    assert_eq!(eval("1 == \"1\""), Value::Bool(false));
    assert_eq!(eval("true == 1"), Value::Bool(false));
    assert_eq!(eval("\"a\" equals \"a\""), Value::Bool(true));
}

#[test]
fn string_concatenation_coerces_right_operand() {
    assert_eq!(eval("\"n=\" + 5"), Value::string("n=5"));
    assert_eq!(eval("\"half \" + 0.5"), Value::string("half 0.5"));
    assert_eq!(eval("\"ok: \" + true"), Value::string("ok: true"));
    assert_eq!(eval("\"a\" + \"b\""), Value::string("ab"));
    assert_eq!(eval("\"x\" + null"), Value::string("x"));
    assert_eq!(eval("\"x\" + canvas(1, 1)"), Value::string("x"));
}

#[test]
fn unsupported_receiver_is_unknown_operator() {
    assert_eq!(
        eval_err("null + 1"),
        EvalErrorKind::UnknownOperator {
            name: "plus".to_string(),
            kind: ValueKind::Null,
        }
    );
    assert_eq!(
        eval_err("\"a\" - 1"),
        EvalErrorKind::UnknownOperator {
            name: "minus".to_string(),
            kind: ValueKind::String,
        }
    );
}

#[test]
fn mismatched_operand_is_argument_type_error() {
    assert_eq!(
        eval_err("1 + \"a\""),
        EvalErrorKind::NativeArgumentType {
            function: "plus".to_string(),
            position: 1,
            expected: "a number",
            found: ValueKind::String,
        }
    );
    assert_eq!(
        eval_err("true and 1"),
        EvalErrorKind::NativeArgumentType {
            function: "and".to_string(),
            position: 1,
            expected: "a boolean",
            found: ValueKind::Number,
        }
    );
}

// Statements and scoping

#[test]
fn program_value_is_last_statement() {
    assert_eq!(eval(""), Value::Null);
    assert_eq!(eval("{}"), Value::Null);
    assert_eq!(eval("let x = 3"), Value::Number(3.0));
    assert_eq!(eval("let x = 3\nx = x + 1"), Value::Number(4.0));
}

#[test]
fn blocks_get_their_own_scope() {
    assert_eq!(eval("let x = 1\n{ let x = 2 }\nx"), Value::Number(1.0));
    assert_eq!(eval("let x = 1\n{ x = 2 }\nx"), Value::Number(2.0));
    assert_eq!(eval("{ let y = 4\n y * 2 }"), Value::Number(8.0));
}

#[test]
fn if_selects_one_branch() {
    assert_eq!(eval("if 0 { \"yes\" } else { \"no\" }"), Value::string("no"));
    assert_eq!(eval("if \"\" 1"), Value::Null);
    assert_eq!(
        eval("let n = 7\nif n < 5 \"small\" else if n < 10 \"medium\" else \"large\""),
        Value::string("medium")
    );
    assert_eq!(eval("let x = 1\nif true { let x = 5 }\nx"), Value::Number(1.0));
}

#[test]
fn assignment_requires_existing_binding() {
    assert_eq!(
        eval_err("ghost = 1"),
        EvalErrorKind::UndefinedVariable {
            name: "ghost".to_string()
        }
    );
    assert_eq!(eval("let ghost = 0\nghost = 1\nghost"), Value::Number(1.0));
}

#[test]
fn undefined_read_carries_span() {
    let source = "let a = 1\nlet b = a + missing";
    let err = run_with(RuntimeBuilder::new(), source).0.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "missing".to_string()
        }
    );
    assert_eq!(err.span.and_then(|s| s.slice(source)), Some("missing"));
}

// Functions

#[test]
fn counter_closure_persists_mutations() {
    let source = "
let makeCounter = (start) => {
  let count = start
  () => {
    count = count + 1
    count
  }
}
let next = makeCounter(5)
print(next())
print(next())
";
    assert_eq!(output(source), "6\n7\n");
}

#[test]
fn closures_from_one_scope_share_it() {
    let source = "
let pair = () => {
  let n = 0
  let bump = () => { n = n + 10 }
  let read = () => n
  bump()
  bump()
  read
}
pair()()
";
    assert_eq!(eval(source), Value::Number(20.0));
}

#[test]
fn missing_arguments_are_null_and_extras_ignored() {
    assert_eq!(eval("let f = (a, b) => b\nf(1)"), Value::Null);
    assert_eq!(eval("let f = (a, b) => b\nf(1, 2, 3)"), Value::Number(2.0));
}

#[test]
fn recursion() {
    let source = "
let fib = (n) => if n < 2 n else fib(n - 1) + fib(n - 2)
fib(15)
";
    assert_eq!(eval(source), Value::Number(610.0));
}

#[test]
fn deep_recursion_within_limit() {
    let source = "
let down = (n) => if n == 0 0 else down(n - 1)
down(5000)
";
    assert_eq!(eval(source), Value::Number(0.0));
}

#[test]
fn call_depth_limit() {
    let builder = RuntimeBuilder::new().max_call_depth(50);
    let (result, _) = run_with(builder, "let f = (n) => f(n + 1)\nf(0)");
    assert_eq!(
        result.unwrap_err().kind,
        EvalErrorKind::StackOverflow { limit: 50 }
    );
}

#[test]
fn calling_a_non_function() {
    assert_eq!(
        eval_err("let x = 5\nx(1)"),
        EvalErrorKind::NotCallable {
            kind: ValueKind::Number
        }
    );
}

#[test]
fn function_display_names() {
    assert_eq!(eval("let sq = (x) => x * x\nsq").to_string(), "<function sq>");
    assert_eq!(eval("(x) => x").to_string(), "<function>");
    assert_eq!(output("print(print)"), "<native print>\n");
}

#[test]
fn trailing_block_is_a_zero_argument_function() {
    let source = "
let twice = (f) => {
  f()
  f()
}
let hits = 0
twice() {
  hits = hits + 1
}
hits
";
    assert_eq!(eval(source), Value::Number(2.0));
}

// Loops and iterators

#[test]
fn factorial_via_inclusive_range() {
    let source = "
let product = 1
for number in 1...4 { product = product times number }
product
";
    assert_eq!(eval(source), Value::Number(24.0));
}

#[test]
fn for_yields_last_body_value() {
    assert_eq!(eval("for i in 0..3 { i * 10 }"), Value::Number(20.0));
    assert_eq!(eval("for i in 0..0 { 1 }"), Value::Null);
}

#[test]
fn descending_range() {
    let source = "
let total = 0
for i in 3..0 { total = total + i }
total
";
    assert_eq!(eval(source), Value::Number(6.0));
}

#[test]
fn loop_bindings_do_not_leak() {
    assert_eq!(
        eval_err("for i in 0..2 { let t = i }\nt"),
        EvalErrorKind::UndefinedVariable {
            name: "t".to_string()
        }
    );
    assert_eq!(
        eval_err("for i in 0..2 { i }\ni"),
        EvalErrorKind::UndefinedVariable {
            name: "i".to_string()
        }
    );
}

#[test]
fn for_requires_an_iterator() {
    assert_eq!(
        eval_err("for x in 5 { x }"),
        EvalErrorKind::ForRequiresIterator {
            kind: ValueKind::Number
        }
    );
}

#[test]
fn range_methods() {
    let source = "
let seen = \"\"
for i in 1.rangeInclusive(3) { seen = seen + i }
seen
";
    assert_eq!(eval(source), Value::string("123"));
}

#[test]
fn while_runs_until_condition_is_falsy() {
    let source = "
let counter = 0
while(() => counter < 5, () => {
  counter = counter + 1
  counter * 100
})
";
    assert_eq!(eval(source), Value::Number(500.0));
    assert_eq!(eval("while(() => false, () => 1)"), Value::Null);
}

#[test]
fn while_with_trailing_block() {
    let source = "
let i = 0
while(() => i < 3) {
  i = i + 1
}
i
";
    assert_eq!(eval(source), Value::Number(3.0));
}

#[test]
fn while_requires_functions() {
    assert_eq!(
        eval_err("while(true, () => 1)"),
        EvalErrorKind::NativeArgumentType {
            function: "while".to_string(),
            position: 1,
            expected: "a function",
            found: ValueKind::Boolean,
        }
    );
    assert_eq!(
        eval_err("while(() => false)"),
        EvalErrorKind::NativeArgumentType {
            function: "while".to_string(),
            position: 2,
            expected: "a function",
            found: ValueKind::Null,
        }
    );
}

// Pixel buffers

#[test]
fn canvas_rejects_bad_dimensions() {
    for source in ["canvas(0, 5)", "canvas(10, 0 - 3)", "canvas(0.5, 2)", "canvas(\"4\", 4)"] {
        assert!(
            matches!(eval_err(source), EvalErrorKind::CanvasDimension { .. }),
            "{source}"
        );
    }
    assert!(matches!(
        eval_err("canvas(1 / 0, 2)"),
        EvalErrorKind::CanvasDimension { .. }
    ));
}

#[test]
fn canvas_dimensions_are_floored() {
    assert_eq!(eval("canvasWidth(canvas(2.9, 7))"), Value::Number(2.0));
    assert_eq!(eval("canvasHeight(canvas(2.9, 7))"), Value::Number(7.0));
}

#[test]
fn canvas_has_no_default_side_limit() {
    assert_eq!(eval("canvasWidth(canvas(16385, 1))"), Value::Number(16385.0));
}

#[test]
fn canvas_side_limit_is_configurable() {
    let (result, _) = run_with(
        RuntimeBuilder::new().max_canvas_side(8),
        "canvasHeight(canvas(8, 8))",
    );
    assert_eq!(result.unwrap(), Value::Number(8.0));

    let (result, _) = run_with(RuntimeBuilder::new().max_canvas_side(8), "canvas(9, 1)");
    assert!(matches!(
        result.unwrap_err().kind,
        EvalErrorKind::CanvasDimension { .. }
    ));
}

#[test]
fn canvas_rejects_unaddressable_size() {
    assert!(matches!(
        eval_err("canvas(65536 * 65536 * 65536 * 65536, 1)"),
        EvalErrorKind::CanvasDimension { .. }
    ));
}

#[test]
fn set_pixel_rounds_and_clamps() {
    let image = eval("let img = canvas(2, 2)\nsetPixel(img, 0, 0, 300, 0 - 20, 127.6)\nimg");
    assert_eq!(pixel(&image, 0, 0), Some([255, 0, 128, 255]));
    assert_eq!(pixel(&image, 1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn set_pixel_floors_coordinates() {
    let image = eval("setPixel(canvas(2, 2), 1.9, 0.2, 1, 2, 3, 4)");
    assert_eq!(pixel(&image, 1, 0), Some([1, 2, 3, 4]));
}

#[test]
fn set_pixel_out_of_bounds() {
    for source in [
        "setPixel(canvas(2, 2), 2, 0, 1, 1, 1)",
        "setPixel(canvas(2, 2), 0, 2, 1, 1, 1)",
        "setPixel(canvas(2, 2), 0 - 0.5, 0, 1, 1, 1)",
    ] {
        assert!(
            matches!(eval_err(source), EvalErrorKind::OutOfBounds { .. }),
            "{source}"
        );
    }
}

#[test]
fn fill_canvas_with_default_and_explicit_alpha() {
    let image = eval("fillCanvas(canvas(3, 1), 10, 20, 30)");
    assert_eq!(pixel(&image, 2, 0), Some([10, 20, 30, 255]));
    let image = eval("fillCanvas(canvas(3, 1), 10, 20, 30, 40)");
    assert_eq!(pixel(&image, 0, 0), Some([10, 20, 30, 40]));
}

#[test]
fn buffers_are_shared_between_bindings() {
    let image = eval("let a = canvas(1, 1)\nlet b = a\nsetPixel(b, 0, 0, 9, 9, 9)\na");
    assert_eq!(pixel(&image, 0, 0), Some([9, 9, 9, 255]));
}

#[test]
fn pixel_natives_check_receiver() {
    assert_eq!(
        eval_err("canvasWidth(3)"),
        EvalErrorKind::NativeArgumentType {
            function: "canvasWidth".to_string(),
            position: 1,
            expected: "a pixel buffer",
            found: ValueKind::Number,
        }
    );
}

// Printing and runtime extension

#[test]
fn print_joins_arguments() {
    assert_eq!(
        output("print(\"a\", 1, true)\nprint(null)\nprint()"),
        "a 1 true\nnull\n\n"
    );
}

#[test]
fn registered_method_binds_self() {
    let source = "
registerMethod(\"number\", \"double\", () => self * 2)
21.double()
";
    assert_eq!(eval(source), Value::Number(42.0));
    assert_eq!(
        eval("registerMethod(\"string\", \"shout\", () => self + \"!\")\n\"hi\".shout()"),
        Value::string("hi!")
    );
}

#[test]
fn registered_operator_is_used_by_infix() {
    let source = "
registerMethod(\"null\", \"plus\", (other) => other)
null + 3
";
    assert_eq!(eval(source), Value::Number(3.0));
}

#[test]
fn registrations_stay_in_their_runtime() {
    eval("registerMethod(\"number\", \"double\", () => self * 2)");
    assert_eq!(
        eval_err("21.double()"),
        EvalErrorKind::UnknownOperator {
            name: "double".to_string(),
            kind: ValueKind::Number,
        }
    );
}

#[test]
fn register_method_rejects_unknown_kind() {
    assert_eq!(
        eval_err("registerMethod(\"list\", \"first\", () => 1)"),
        EvalErrorKind::UnknownValueKind {
            name: "list".to_string()
        }
    );
}

#[test]
fn type_of_names_kinds() {
    assert_eq!(eval("typeOf(canvas(1, 1))"), Value::string("pixelBuffer"));
    assert_eq!(eval("typeOf(0..1)"), Value::string("iterator"));
    assert_eq!(eval("typeOf()"), Value::string("null"));
}

#[test]
fn interpreter_reuses_environment_across_programs() {
    let env = RuntimeBuilder::new().print_handler(buffer_handler()).build();
    let first = kiln_parse::parse("let total = 40").unwrap();
    let second = kiln_parse::parse("total + 2").unwrap();
    evaluate(&first, &env).unwrap();
    assert_eq!(evaluate(&second, &env).unwrap(), Value::Number(42.0));
    assert_eq!(env.get("total"), Some(Value::Number(40.0)));
}
