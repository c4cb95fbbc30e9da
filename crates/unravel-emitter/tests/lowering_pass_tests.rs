use super::*;
use crate::printer::generate;
use unravel_common::{GenerateOptions, TempPlacement};
use unravel_test_utils::parse;

fn lower_with(source: &str, options: &TransformOptions) -> (String, LoweringStats) {
    let mut tree = parse(source);
    let stats = lower_destructuring(&mut tree, options).expect("lowering failed");
    (generate(&tree, &GenerateOptions::compact()), stats)
}

fn lower(source: &str) -> String {
    lower_with(source, &TransformOptions::default()).0
}

#[test]
fn test_program_without_patterns_is_unchanged() {
    let source = "var a = 1; function f(x) { return x + a; } f(a);";
    let (output, stats) = lower_with(source, &TransformOptions::default());
    assert_eq!(output, source);
    assert_eq!(stats, LoweringStats::default());
}

#[test]
fn test_assignment_value_is_threaded_through() {
    assert_eq!(lower("x = [a, b] = f();"), "var $0; x = ($0 = f(), a = $0[0], b = $0[1], $0);");
    assert_eq!(lower("x = [a, b] = c;"), "x = (a = c[0], b = c[1], c);");
    assert_eq!(lower("g({a} = o);"), "g((a = o.a, o));");
}

#[test]
fn test_assignment_inside_sequence_is_spliced() {
    assert_eq!(lower("[a, b] = c, d();"), "a = c[0], b = c[1], d();");
    assert_eq!(lower("x = (d(), [a] = c);"), "x = (d(), a = c[0], c);");
}

#[test]
fn test_for_statement_parts() {
    assert_eq!(
        lower("for (var [k, v] = f(); k; [k, v] = g()) {}"),
        "var $1; for (var $0 = f(), k = $0[0], v = $0[1]; k; $1 = g(), k = $1[0], v = $1[1]) {}"
    );
}

#[test]
fn test_declarator_without_initializer_is_left_alone() {
    assert_eq!(lower("for (var [k, v] of xs) {}"), "for (var [k, v] of xs) {}");
}

#[test]
fn test_compound_assignment_is_not_a_pattern() {
    assert_eq!(lower("a += [1];"), "a += [1];");
}

#[test]
fn test_pattern_parameters() {
    assert_eq!(
        lower("var [a, b] = function ([c, d]) { return [d, c]; }([1, 2]);"),
        "var $0 = function ($1) { var c = $1[0], d = $1[1]; return [d, c]; }([1, 2]), a = $0[0], b = $0[1];"
    );
}

#[test]
fn test_nested_pattern_parameter() {
    assert_eq!(
        lower("function f([c, [d, e]]) {}"),
        "function f($0) { var c = $0[0], $1 = $0[1], d = $1[0], e = $1[1]; }"
    );
}

#[test]
fn test_several_pattern_parameters_in_order() {
    assert_eq!(
        lower("function f(x, [a], {b}) { return x; }"),
        "function f(x, $0, $1) { var a = $0[0]; var b = $1.b; return x; }"
    );
}

#[test]
fn test_concise_arrow_parameters() {
    assert_eq!(
        lower("var f = ({c, d}) => [c, d];"),
        "var f = ($0) => { var c = $0.c, d = $0.d; return [c, d]; };"
    );
}

#[test]
fn test_parameters_after_directive() {
    assert_eq!(
        lower("function g([a]) { 'use strict'; return a; }"),
        "function g($0) { 'use strict'; var a = $0[0]; return a; }"
    );
}

#[test]
fn test_temporaries_hoist_to_enclosing_function() {
    assert_eq!(
        lower("function f() { var x; if (x) { [a, b] = g(); } }"),
        "function f() { var x, $0; if (x) { $0 = g(), a = $0[0], b = $0[1]; } }"
    );
}

#[test]
fn test_temporaries_hoist_to_nearest_block() {
    let options = TransformOptions {
        temp_placement: TempPlacement::NearestBlock,
        ..TransformOptions::default()
    };
    let (output, _) = lower_with("function f() { var x; if (x) { [a, b] = g(); } }", &options);
    assert_eq!(
        output,
        "function f() { var x; if (x) { var $0; $0 = g(), a = $0[0], b = $0[1]; } }"
    );
}

#[test]
fn test_hoisting_into_concise_arrow() {
    assert_eq!(
        lower("var f = () => [a, b] = g();"),
        "var f = () => { var $0; return $0 = g(), a = $0[0], b = $0[1], $0; };"
    );
}

#[test]
fn test_global_unique_avoids_program_names() {
    assert_eq!(
        lower("var $0 = 1; [a, b] = f();"),
        "var $0 = 1, $1; $1 = f(), a = $1[0], b = $1[1];"
    );
}

#[test]
fn test_simple_prefix_uses_prefix_verbatim() {
    let options = TransformOptions {
        name_prefix: "_t".to_string(),
        naming: unravel_common::NamingStrategy::SimplePrefix,
        ..TransformOptions::default()
    };
    let (output, _) = lower_with("[a, b] = f();", &options);
    assert_eq!(output, "var _t0; _t0 = f(), a = _t0[0], b = _t0[1];");
}

#[test]
fn test_stats_count_each_rewrite() {
    let (_, stats) = lower_with(
        "var [a, [b]] = f(); [c, d] = [d, c]; function g({e}) {}",
        &TransformOptions::default(),
    );
    assert_eq!(
        stats,
        LoweringStats {
            declarators: 3,
            assignments: 1,
            functions: 1,
            temporaries: 4,
            hoisted: 1,
        }
    );
}

#[test]
fn test_invalid_prefix_is_rejected_before_rewriting() {
    let mut tree = parse("[a] = b;");
    let before = generate(&tree, &GenerateOptions::compact());
    for prefix in ["", "1x", "a-b"] {
        let err = lower_destructuring(&mut tree, &TransformOptions::with_prefix(prefix)).unwrap_err();
        assert!(matches!(err, TransformError::InvalidOption(_)), "{prefix:?}");
    }
    assert_eq!(generate(&tree, &GenerateOptions::compact()), before);
}

#[test]
fn test_renormalization_depth_is_bounded() {
    let depth = MAX_RENORMALIZE_DEPTH as usize + 5;
    let source = format!("{}a{} = x;", "[".repeat(depth), "]".repeat(depth));
    let mut tree = parse(&source);
    let err = lower_destructuring(&mut tree, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::RenormalizationLimit { .. }));
}

#[test]
fn test_depth_counts_pattern_nesting_not_right_hand_side_nesting() {
    let count = MAX_RENORMALIZE_DEPTH + 5;
    let mut inner = "f(z)".to_string();
    for i in (1..count).rev() {
        inner = format!("f([a{i}] = {inner})");
    }
    let mut tree = parse(&format!("[a0] = {inner};"));
    let stats = lower_destructuring(&mut tree, &TransformOptions::default()).expect("flat patterns are in range");
    assert_eq!(stats.assignments, count as usize);
    let output = generate(&tree, &GenerateOptions::compact());
    assert!(!output.contains("[a"), "{output}");
}

#[test]
fn test_nesting_below_a_grouped_rewrite_keeps_counting() {
    let depth = MAX_RENORMALIZE_DEPTH as usize;
    let source = format!("[{}a{}, b] = x();", "[".repeat(depth), "]".repeat(depth));
    let mut tree = parse(&source);
    let err = lower_destructuring(&mut tree, &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::RenormalizationLimit { .. }));
}

#[test]
fn test_moderate_nesting_is_fully_lowered() {
    let output = lower("[[[[a]]]] = x;");
    assert_eq!(
        output,
        "var $0, $1, $2; $0 = x[0], $1 = $0[0], $2 = $1[0], a = $2[0];"
    );
}
