use super::*;
use crate::parse;

fn run(source: &str) -> Globals {
    run_program(&parse(source)).unwrap_or_else(|err| panic!("{source:?}: {err}"))
}

#[test]
fn test_arithmetic_and_strings() {
    let globals = run("var a = 1 + 2 * 3; var b = 'x' + a; var c = 7 % 4, d = 2 ** 3;");
    assert_eq!(globals.render("a"), "7");
    assert_eq!(globals.render("b"), "\"x7\"");
    assert_eq!(globals.render("c"), "3");
    assert_eq!(globals.render("d"), "8");
}

#[test]
fn test_arrays_and_objects() {
    let globals = run("var a = [1, , 3]; var o = {p: a, 'q': a.length}; o.r = o.p[2]; var s = [0, ...a];");
    assert_eq!(globals.render("a"), "[1, undefined, 3]");
    assert_eq!(globals.render("o"), "{ p: [1, undefined, 3], q: 3, r: 3 }");
    assert_eq!(globals.render("s"), "[0, 1, undefined, 3]");
}

#[test]
fn test_string_indexing() {
    let globals = run("var s = 'xy'; var a = s[0], b = s[1], c = s[2], n = s.length;");
    assert_eq!(globals.render("a"), "\"x\"");
    assert_eq!(globals.render("b"), "\"y\"");
    assert!(globals.get("c").is_undefined());
    assert_eq!(globals.render("n"), "2");
}

#[test]
fn test_functions_closures_and_arguments() {
    let globals = run(
        "function counter() { var n = 0; return function () { n++; return n; }; }
         var next = counter(); next(); var two = next();
         function count() { return arguments.length; }
         var three = count(1, 2, 3);
         var add = (x, y) => x + y; var sum = add(2, 3);",
    );
    assert_eq!(globals.render("two"), "2");
    assert_eq!(globals.render("three"), "3");
    assert_eq!(globals.render("sum"), "5");
}

#[test]
fn test_function_declarations_are_hoisted() {
    let globals = run("var r = f(); function f() { return typeof g; }");
    assert_eq!(globals.render("r"), "\"undefined\"");
}

#[test]
fn test_control_flow() {
    let globals = run(
        "var total = 0;
         for (var i = 0; i < 10; i++) { if (i === 5) continue; if (i === 8) break; total += i; }
         var w = 0; while (w < 3) w++;
         var d = 0; do { d += 2; } while (d < 5);
         outer: for (var x = 0; x < 3; x++) { for (var y = 0; y < 3; y++) { if (y === 1) continue outer; } }",
    );
    assert_eq!(globals.render("total"), "23");
    assert_eq!(globals.render("w"), "3");
    assert_eq!(globals.render("d"), "6");
    assert_eq!(globals.render("x"), "3");
}

#[test]
fn test_switch_and_exceptions() {
    let globals = run(
        "var s; switch (2) { case 1: s = 'one'; break; case 2: s = 'two'; default: s += '!'; }
         var caught; try { throw 42; } catch (e) { caught = e; } finally { caught++; }
         var message; try { null.x; } catch (e) { message = typeof e; }",
    );
    assert_eq!(globals.render("s"), "\"two!\"");
    assert_eq!(globals.render("caught"), "43");
    assert_eq!(globals.render("message"), "\"string\"");
}

#[test]
fn test_undeclared_assignment_creates_global() {
    let globals = run("function f() { g = 3; } f();");
    assert_eq!(globals.render("g"), "3");
}

#[test]
fn test_errors() {
    let reference = run_program(&parse("missing;")).unwrap_err();
    assert!(matches!(reference, EvalError::ReferenceError(ref name) if name == "missing"));

    let type_error = run_program(&parse("var u; u.x;")).unwrap_err();
    assert!(matches!(type_error, EvalError::TypeError(_)));

    let not_callable = run_program(&parse("var n = 1; n();")).unwrap_err();
    assert!(matches!(not_callable, EvalError::TypeError(_)));

    let thrown = run_program(&parse("throw 'boom';")).unwrap_err();
    assert!(matches!(thrown, EvalError::Thrown(Value::Str(ref s)) if &**s == "boom"));
}

#[test]
fn test_patterns_are_unsupported() {
    let err = run_program(&parse("var [a] = [1];")).unwrap_err();
    assert!(matches!(err, EvalError::Unsupported(_)));
    let err = run_program(&parse("var a; [a] = [1];")).unwrap_err();
    assert!(matches!(err, EvalError::Unsupported(_)));
}

#[test]
fn test_step_limit_stops_infinite_loops() {
    let err = run_program(&parse("while (true) {}")).unwrap_err();
    assert!(matches!(err, EvalError::StepLimit));
}

#[test]
fn test_value_helpers() {
    assert_eq!(Value::array(vec![Value::number(1.0), Value::string("a")]).to_string(), "[1, \"a\"]");
    assert!(Value::Undefined.is_undefined());
    assert_eq!(Value::Number(0.5).to_string(), "0.5");
}
