use unravel::{Error, GenerateOptions, TransformOptions, transform, transform_source_with};
use unravel_test_utils::{SourceTextParser, parse};

fn compact(source: &str) -> String {
    transform_source_with(
        &SourceTextParser,
        source,
        &TransformOptions::default(),
        &GenerateOptions::compact(),
    )
    .unwrap_or_else(|err| panic!("transform of {source:?} failed: {err}"))
}

#[test]
fn test_program_without_destructuring_round_trips() {
    let source = "var a = 1; function f(x) { return x + a; } if (a) { f(a); } else f(2);";
    assert_eq!(compact(source), source);
}

#[test]
fn test_array_declarations() {
    assert_eq!(compact("var [a, b] = c;"), "var a = c[0], b = c[1];");
    assert_eq!(compact("var [a, b] = c();"), "var $0 = c(), a = $0[0], b = $0[1];");
    assert_eq!(compact("var [a, , b] = c;"), "var a = c[0], b = c[2];");
    assert_eq!(compact("var [a, b] = [1, 2];"), "var a = 1, b = 2;");
}

#[test]
fn test_array_assignments() {
    assert_eq!(compact("[a, b] = c;"), "a = c[0], b = c[1];");
    assert_eq!(compact("[a, b] = c();"), "var $0; $0 = c(), a = $0[0], b = $0[1];");
    assert_eq!(compact("[a, b] = [1];"), "a = 1, b = void 0;");
}

#[test]
fn test_object_patterns() {
    assert_eq!(compact("var {a} = o;"), "var a = o.a;");
    assert_eq!(compact("({a, b: c} = o);"), "a = o.a, c = o.b;");
    assert_eq!(
        compact("({'b': a, 'my-key': c, 0: d, [k]: e} = o);"),
        "a = o.b, c = o['my-key'], d = o[0], e = o[k];"
    );
    assert_eq!(compact("var {a} = {a: 1};"), "var $0 = {a: 1}, a = $0.a;");
}

#[test]
fn test_nested_patterns() {
    assert_eq!(
        compact("var [a, [b, c]] = f();"),
        "var $0 = f(), a = $0[0], $1 = $0[1], b = $1[0], c = $1[1];"
    );
    assert_eq!(compact("var {p: [x, y]} = o;"), "var $0 = o.p, x = $0[0], y = $0[1];");
}

#[test]
fn test_swap_uses_one_temporary() {
    assert_eq!(
        compact("var a = 1, b = 2; [a, b] = [b, a];"),
        "var a = 1, b = 2, $0; $0 = a, a = b, b = $0;"
    );
}

#[test]
fn test_chained_assignment() {
    assert_eq!(
        compact("({c, d} = {a, b} = {a: 1, b: 2, c: 3, d: 4});"),
        "var $0, $1; $1 = ($0 = {a: 1, b: 2, c: 3, d: 4}, a = $0.a, b = $0.b, $0), c = $1.c, d = $1.d;"
    );
}

#[test]
fn test_value_of_assignment_is_preserved() {
    assert_eq!(compact("x = [a, b] = c;"), "x = (a = c[0], b = c[1], c);");
    assert_eq!(compact("g({a} = o);"), "g((a = o.a, o));");
}

#[test]
fn test_directive_prologue_stays_first() {
    assert_eq!(
        compact("'use strict'; [a] = f();"),
        "'use strict'; var $0; $0 = f(), a = $0[0];"
    );
}

#[test]
fn test_out_of_scope_constructs_are_untouched() {
    assert_eq!(compact("for (var [k, v] of xs) {}"), "for (var [k, v] of xs) {}");
    assert_eq!(compact("a += [1];"), "a += [1];");
    assert_eq!(compact("try { f(); } catch (e) { g(e); }"), "try { f(); } catch (e) { g(e); }");
}

#[test]
fn test_second_run_is_a_no_op() {
    let sources = [
        "var [a, [b, c]] = f();",
        "[a, b, c] = [c, a, b];",
        "function f([a, b], {c}) { return a + b + c; }",
        "x = ({c, d} = {a, b} = o());",
        "var g = ([a]) => [b] = a;",
    ];
    for source in sources {
        let once = compact(source);
        assert_eq!(compact(&once), once, "{source}");
    }
}

#[test]
fn test_output_is_deterministic() {
    let source = "var $1 = 0; function f([a, {b}]) { [c, d] = g(); return h({e} = i()); }";
    assert_eq!(compact(source), compact(source));
}

#[test]
fn test_transform_returns_the_rewritten_tree() {
    let tree = transform(parse("[a] = f();"), &TransformOptions::default()).expect("transform failed");
    assert_eq!(tree.body().len(), 2);
    let output = unravel::generate(&tree, &GenerateOptions::compact());
    assert_eq!(output, "var $0; $0 = f(), a = $0[0];");
}

#[test]
fn test_pretty_output() {
    let output = transform_source_with(
        &SourceTextParser,
        "function f([a, b]) { return a; }",
        &TransformOptions::default(),
        &GenerateOptions::default(),
    )
    .expect("transform failed");
    assert_eq!(output, "function f($0) {\n    var a = $0[0], b = $0[1];\n    return a;\n}\n");
}

#[test]
fn test_parse_errors_propagate() {
    let err = transform_source_with(
        &SourceTextParser,
        "var = ;",
        &TransformOptions::default(),
        &GenerateOptions::compact(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{err}");
}

#[test]
fn test_invalid_prefix_is_a_transform_error() {
    let err = transform_source_with(
        &SourceTextParser,
        "[a] = b;",
        &TransformOptions::with_prefix("a-b"),
        &GenerateOptions::compact(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Transform(unravel::TransformError::InvalidOption(_))), "{err}");
}
