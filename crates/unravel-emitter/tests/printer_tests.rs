use super::*;
use unravel_test_utils::parse;

fn compact(source: &str) -> String {
    generate(&parse(source), &GenerateOptions::compact())
}

fn pretty(source: &str) -> String {
    generate(&parse(source), &GenerateOptions::default())
}

#[test]
fn test_variable_declarations() {
    assert_eq!(compact("var a = 1, b = 2;"), "var a = 1, b = 2;");
    assert_eq!(compact("let x; const y = 'q';"), "let x; const y = 'q';");
}

#[test]
fn test_sequence_is_parenthesized_inside_assignment() {
    assert_eq!(compact("x = (a, b);"), "x = (a, b);");
    assert_eq!(compact("f((a, b), c);"), "f((a, b), c);");
    assert_eq!(compact("a = 1, b = 2;"), "a = 1, b = 2;");
}

#[test]
fn test_object_literal_statement_is_wrapped() {
    assert_eq!(compact("({a: 1});"), "({a: 1});");
    assert_eq!(compact("({a: 1}).a;"), "({a: 1}.a);");
    assert_eq!(compact("x = {};"), "x = {};");
}

#[test]
fn test_function_expression_statement_is_wrapped() {
    assert_eq!(compact("(function () {})();"), "(function () {}());");
    assert_eq!(compact("x = function () {};"), "x = function () {};");
}

#[test]
fn test_arrow_functions() {
    assert_eq!(compact("f = (a, b) => a + b;"), "f = (a, b) => a + b;");
    assert_eq!(compact("f = a => ({a: a});"), "f = (a) => ({a: a});");
    assert_eq!(compact("f = () => { return 1; };"), "f = () => { return 1; };");
}

#[test]
fn test_binary_precedence() {
    assert_eq!(compact("x = (a + b) * c;"), "x = (a + b) * c;");
    assert_eq!(compact("x = a + b * c;"), "x = a + b * c;");
    assert_eq!(compact("x = a - (b - c);"), "x = a - (b - c);");
    assert_eq!(compact("x = (a ? b : c) ? d : e;"), "x = (a ? b : c) ? d : e;");
}

#[test]
fn test_unary_spacing() {
    assert_eq!(compact("x = -(-y);"), "x = - -y;");
    assert_eq!(compact("x = typeof y;"), "x = typeof y;");
    assert_eq!(compact("x = void 0;"), "x = void 0;");
    assert_eq!(compact("x = !y;"), "x = !y;");
}

#[test]
fn test_member_access_on_numbers_and_new() {
    assert_eq!(compact("(1).toString();"), "(1).toString();");
    assert_eq!(compact("x = new (f())();"), "x = new (f())();");
    assert_eq!(compact("x = new F(1);"), "x = new F(1);");
    assert_eq!(compact("x = a[0].b;"), "x = a[0].b;");
}

#[test]
fn test_array_holes() {
    assert_eq!(compact("x = [1, , 2];"), "x = [1,, 2];");
    assert_eq!(compact("x = [];"), "x = [];");
}

#[test]
fn test_patterns_print_like_literals() {
    assert_eq!(compact("[a, b] = c;"), "[a, b] = c;");
    assert_eq!(compact("({a, b: c} = d);"), "({a, b: c} = d);");
    assert_eq!(compact("var [, x] = y;"), "var [, x] = y;");
}

#[test]
fn test_control_flow_statements() {
    assert_eq!(compact("if (a) b(); else { c(); }"), "if (a) b(); else { c(); }");
    assert_eq!(compact("for (var i = 0; i < n; i++) {}"), "for (var i = 0; i < n; i++) {}");
    assert_eq!(compact("for (;;) break;"), "for (;;) break;");
    assert_eq!(compact("while (x) x--;"), "while (x) x--;");
    assert_eq!(compact("do x++; while (x < 3);"), "do x++; while (x < 3);");
    assert_eq!(compact("for (var k in o) {}"), "for (var k in o) {}");
}

#[test]
fn test_try_switch_and_labels() {
    assert_eq!(
        compact("try { f(); } catch (e) { g(e); } finally { h(); }"),
        "try { f(); } catch (e) { g(e); } finally { h(); }"
    );
    assert_eq!(
        compact("switch (x) { case 1: f(); break; default: g(); }"),
        "switch (x) { case 1: f(); break; default: g(); }"
    );
    assert_eq!(compact("outer: for (;;) { continue outer; }"), "outer: for (;;) { continue outer; }");
}

#[test]
fn test_directive_prologue_is_preserved() {
    assert_eq!(
        compact("function f() { 'use strict'; return 1; }"),
        "function f() { 'use strict'; return 1; }"
    );
}

#[test]
fn test_multiline_output_indents_blocks() {
    let output = pretty("function f(a) { if (a) { return 1; } return 2; }");
    assert_eq!(
        output,
        "function f(a) {\n    if (a) {\n        return 1;\n    }\n    return 2;\n}\n"
    );
}

#[test]
fn test_custom_indent_and_crlf() {
    let options = GenerateOptions {
        new_line: unravel_common::NewLineKind::CarriageReturnLineFeed,
        indent: "\t".to_string(),
    };
    let output = generate(&parse("a(); { b(); }"), &options);
    assert_eq!(output, "a();\r\n{\r\n\tb();\r\n}\r\n");
}

#[test]
fn test_synthesized_literals() {
    let mut arena = NodeArena::new();
    let quoted = arena.add_string("a\"b\n");
    let number = arena.add_number(2.5);
    let void = arena.add_void_zero();
    let sequence = arena.add_sequence(vec![quoted, number, void]);
    let options = GenerateOptions::compact();
    let mut printer = Printer::new(&arena, &options);
    printer.emit_expression(sequence);
    assert_eq!(printer.get_output(), "\"a\\\"b\\n\", 2.5, void 0");
}

#[test]
fn test_empty_program() {
    assert_eq!(generate(&ProgramTree::empty(), &GenerateOptions::default()), "");
}
