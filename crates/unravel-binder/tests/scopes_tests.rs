use super::*;
use unravel_test_utils::parse;

fn analyze(source: &str) -> ScopeInfo {
    let tree = parse(source);
    analyze_scopes(&tree.arena, tree.root)
}

fn first_scope(info: &ScopeInfo, kind: ScopeKind) -> &Scope {
    info.scopes()
        .iter()
        .find(|scope| scope.kind == kind)
        .unwrap_or_else(|| panic!("expected a {kind:?} scope"))
}

#[test]
fn test_declared_and_referenced_names_are_used() {
    let info = analyze("var a = b; function f(c) { return d; }");
    for name in ["a", "b", "f", "c", "d"] {
        assert!(info.is_used_name(name), "{name} should be used");
    }
    assert!(!info.is_used_name("e"));
}

#[test]
fn test_property_names_are_not_references() {
    let info = analyze("o.x; var y = {z: 1};");
    assert!(info.is_used_name("o"));
    assert!(info.is_used_name("y"));
    assert!(!info.is_used_name("x"));
    assert!(!info.is_used_name("z"));
}

#[test]
fn test_computed_members_are_references() {
    let info = analyze("o[k] = {[m]: 1};");
    assert!(info.is_used_name("k"));
    assert!(info.is_used_name("m"));
}

#[test]
fn test_var_hoists_to_function_scope() {
    let info = analyze("function f() { { var a; let b; } }");
    let function = first_scope(&info, ScopeKind::Function);
    assert!(function.declared.contains("a"));
    assert!(!function.declared.contains("b"));
    let block = first_scope(&info, ScopeKind::Block);
    assert!(block.declared.contains("b"));
    assert_eq!(block.parent, Some(1));
}

#[test]
fn test_pattern_targets_are_declared_but_keys_are_not() {
    let info = analyze("var [a, {b: c}] = d;");
    let program = first_scope(&info, ScopeKind::Program);
    assert!(program.declared.contains("a"));
    assert!(program.declared.contains("c"));
    assert!(!info.is_used_name("b"));
    assert!(program.referenced.contains("d"));
}

#[test]
fn test_assignment_pattern_targets_are_references() {
    let info = analyze("[a, b] = [b, a]; ({k: v} = w);");
    let program = first_scope(&info, ScopeKind::Program);
    for name in ["a", "b", "v", "w"] {
        assert!(program.referenced.contains(name), "{name} should be referenced");
    }
    assert!(!info.is_used_name("k"));
}

#[test]
fn test_catch_parameter_has_its_own_scope() {
    let info = analyze("try { g(); } catch (e) { f(e); }");
    let catch = first_scope(&info, ScopeKind::Catch);
    assert!(catch.declared.contains("e"));
    assert!(catch.referenced.contains("f"));
}

#[test]
fn test_function_expression_name_is_local() {
    let info = analyze("var g = function inner(p) { return inner; };");
    let program = first_scope(&info, ScopeKind::Program);
    assert!(!program.declared.contains("inner"));
    let function = first_scope(&info, ScopeKind::Function);
    assert!(function.declared.contains("inner"));
    assert!(function.declared.contains("p"));
}

#[test]
fn test_arrow_parameters_and_expression_body() {
    let info = analyze("var h = ([x, y]) => x + z;");
    let function = first_scope(&info, ScopeKind::Function);
    assert!(function.declared.contains("x"));
    assert!(function.declared.contains("y"));
    assert!(function.referenced.contains("z"));
}

#[test]
fn test_labels_are_not_names() {
    let info = analyze("outer: while (t) { break outer; }");
    assert!(info.is_used_name("t"));
    assert!(!info.is_used_name("outer"));
}
