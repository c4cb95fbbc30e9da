use super::*;
use crate::printer::generate;
use unravel_common::GenerateOptions;
use unravel_parser::ProgramTree;
use unravel_test_utils::parse;

fn print(tree: &ProgramTree) -> String {
    generate(tree, &GenerateOptions::compact())
}

/// Initializer of the first declarator of the first statement.
fn first_init(tree: &ProgramTree) -> NodeIndex {
    let Some(Node::VariableDeclaration { declarations, .. }) = tree.arena.get(tree.body()[0]) else {
        panic!("expected a variable declaration");
    };
    match tree.arena.get(declarations[0]) {
        Some(Node::VariableDeclarator { init, .. }) => *init,
        _ => panic!("expected a declarator"),
    }
}

#[test]
fn test_declare_into_empty_program() {
    let mut tree = parse("");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    assert_eq!(print(&tree), "var $0;");
}

#[test]
fn test_merges_into_leading_var() {
    let mut tree = parse("var a = 1; f();");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    declare_var(&mut tree.arena, tree.root, "$1").unwrap();
    assert_eq!(print(&tree), "var a = 1, $0, $1; f();");
}

#[test]
fn test_inserts_before_other_statements() {
    let mut tree = parse("f(); var a;");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    assert_eq!(print(&tree), "var $0; f(); var a;");
}

#[test]
fn test_let_and_const_are_not_extended() {
    let mut tree = parse("let a = 1;");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    assert_eq!(print(&tree), "var $0; let a = 1;");
}

#[test]
fn test_directive_prologue_stays_first() {
    let mut tree = parse("'use strict'; var a;");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    assert_eq!(print(&tree), "'use strict'; var a, $0;");

    let mut tree = parse("'use strict'; f();");
    declare_var(&mut tree.arena, tree.root, "$0").unwrap();
    assert_eq!(print(&tree), "'use strict'; var $0; f();");
}

#[test]
fn test_declare_into_function_body() {
    let mut tree = parse("var f = function () { return 1; };");
    let function = first_init(&tree);
    declare_var(&mut tree.arena, function, "$0").unwrap();
    assert_eq!(print(&tree), "var f = function () { var $0; return 1; };");
}

#[test]
fn test_concise_arrow_body_becomes_block() {
    let mut tree = parse("var f = (a) => a + 1;");
    let arrow = first_init(&tree);
    let body = ensure_block_body(&mut tree.arena, arrow).unwrap();
    assert!(matches!(tree.arena.get(body), Some(Node::BlockStatement { .. })));
    assert_eq!(print(&tree), "var f = (a) => { return a + 1; };");

    // Already a block: unchanged.
    assert_eq!(ensure_block_body(&mut tree.arena, arrow).unwrap(), body);

    declare_var(&mut tree.arena, arrow, "$0").unwrap();
    assert_eq!(print(&tree), "var f = (a) => { var $0; return a + 1; };");
}

#[test]
fn test_hoisting_into_expression_is_rejected() {
    let mut tree = parse("f();");
    let statement = tree.body()[0];
    let err = declare_var(&mut tree.arena, statement, "$0").unwrap_err();
    assert!(matches!(err, TransformError::InvariantViolation { .. }));
}

#[test]
fn test_policy_picks_container() {
    let function = NodeIndex(1);
    let block = NodeIndex(2);
    assert_eq!(
        HoistPolicy::new(TempPlacement::FunctionScope).container(function, block),
        function
    );
    assert_eq!(HoistPolicy::new(TempPlacement::NearestBlock).container(function, block), block);
    assert_eq!(
        HoistPolicy::new(TempPlacement::NearestBlock).placement(),
        TempPlacement::NearestBlock
    );
}
