//! Tests for the arena and ESTree ingestion.

use super::*;
use serde_json::json;

fn ident(name: &str) -> serde_json::Value {
    json!({"type": "Identifier", "name": name})
}

fn program(body: serde_json::Value) -> ProgramTree {
    EstreeJsonParser::new()
        .parse_value(json!({"type": "Program", "body": body}))
        .expect("valid ESTree program")
}

#[test]
fn test_node_index() {
    let index = NodeIndex(0);
    assert!(index.is_some());
    assert!(!index.is_none());

    let none = NodeIndex::NONE;
    assert!(none.is_none());
    assert!(!none.is_some());
}

#[test]
fn test_arena_add_and_get() {
    let mut arena = NodeArena::new();
    let a = arena.add_identifier("a");
    let zero = arena.add_element_access(a, 0);
    assert_eq!(arena.identifier_name(a), Some("a"));
    match arena.get(zero) {
        Some(Node::MemberExpression {
            object, computed, ..
        }) => {
            assert_eq!(*object, a);
            assert!(*computed);
        }
        other => panic!("expected member expression, got {other:?}"),
    }
    assert!(arena.get(NodeIndex::NONE).is_none());
}

#[test]
fn test_arena_replace_keeps_index() {
    let mut arena = NodeArena::new();
    let a = arena.add_identifier("a");
    let stmt = arena.add_expression_statement(a);
    let previous = arena.replace(a, Node::Identifier { name: "b".into() });
    assert_eq!(previous, Some(Node::Identifier { name: "a".into() }));
    let Some(Node::ExpressionStatement { expression, .. }) = arena.get(stmt) else {
        panic!("expected statement");
    };
    assert_eq!(arena.identifier_name(*expression), Some("b"));
}

#[test]
fn test_children_in_evaluation_order_skip_holes() {
    let mut arena = NodeArena::new();
    let a = arena.add_identifier("a");
    let b = arena.add_identifier("b");
    let pattern = arena.add(Node::ArrayPattern {
        elements: vec![a, NodeIndex::NONE, b],
    });
    assert_eq!(arena.children(pattern), vec![a, b]);
}

#[test]
fn test_deep_clone_allocates_fresh_nodes() {
    let mut arena = NodeArena::new();
    let obj = arena.add_identifier("obj");
    let access = arena.add_property_access(obj, "x");
    let copy = arena.deep_clone(access);
    assert_ne!(copy, access);
    let Some(Node::MemberExpression { object, .. }) = arena.get(copy) else {
        panic!("expected member expression");
    };
    assert_ne!(*object, obj);
    assert_eq!(arena.identifier_name(*object), Some("obj"));
}

#[test]
fn test_estree_variable_declaration_with_pattern() {
    let tree = program(json!([{
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": {"type": "ArrayPattern", "elements": [ident("a"), null, ident("b")]},
            "init": ident("c")
        }]
    }]));
    let [decl] = tree.body() else {
        panic!("expected one statement");
    };
    let Some(Node::VariableDeclaration { kind, declarations }) = tree.arena.get(*decl) else {
        panic!("expected declaration");
    };
    assert_eq!(*kind, VarKind::Var);
    let Some(Node::VariableDeclarator { id, init }) = tree.arena.get(declarations[0]) else {
        panic!("expected declarator");
    };
    let Some(Node::ArrayPattern { elements }) = tree.arena.get(*id) else {
        panic!("expected array pattern");
    };
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_none());
    assert_eq!(tree.arena.identifier_name(*init), Some("c"));
}

#[test]
fn test_estree_literals_keep_raw() {
    let tree = program(json!([
        {"type": "ExpressionStatement", "directive": "use strict",
         "expression": {"type": "Literal", "value": "use strict", "raw": "'use strict'"}},
        {"type": "ExpressionStatement",
         "expression": {"type": "Literal", "value": 1.5, "raw": "1.50"}},
        {"type": "ExpressionStatement",
         "expression": {"type": "Literal", "value": {}, "raw": "/a+/g", "regex": {"pattern": "a+", "flags": "g"}}}
    ]));
    let literal = |stmt: NodeIndex| match tree.arena.get(stmt) {
        Some(Node::ExpressionStatement { expression, .. }) => tree.arena.get(*expression).cloned(),
        _ => None,
    };
    let body = tree.body().to_vec();
    assert!(matches!(
        tree.arena.get(body[0]),
        Some(Node::ExpressionStatement { directive: Some(d), .. }) if d == "use strict"
    ));
    assert_eq!(
        literal(body[1]),
        Some(Node::Literal {
            value: LiteralValue::Number(1.5),
            raw: Some("1.50".into())
        })
    );
    assert!(matches!(
        literal(body[2]),
        Some(Node::Literal { value: LiteralValue::RegExp { .. }, .. })
    ));
}

#[test]
fn test_estree_arrow_function_flags() {
    let tree = program(json!([{
        "type": "ExpressionStatement",
        "expression": {
            "type": "ArrowFunctionExpression",
            "params": [{"type": "ObjectPattern", "properties": [{
                "type": "Property", "key": ident("c"), "value": ident("c"),
                "kind": "init", "computed": false, "shorthand": true
            }]}],
            "body": ident("c"),
            "expression": true,
            "async": false
        }
    }]));
    let Some(Node::ExpressionStatement { expression, .. }) = tree.arena.get(tree.body()[0]) else {
        panic!("expected statement");
    };
    let data = tree.arena.function_data(*expression).expect("arrow function");
    assert!(data.expression);
    assert!(data.id.is_none());
    assert!(crate::syntax::transform_utils::is_pattern(&tree.arena, data.params[0]));
}

#[test]
fn test_estree_rejects_unsupported_nodes() {
    let result = EstreeJsonParser::new().parse(
        r#"{"type": "Program", "body": [{"type": "ClassDeclaration", "id": null, "body": {"type": "ClassBody", "body": []}}]}"#,
    );
    assert!(matches!(result, Err(ParseError::Json(_))));
}

#[test]
fn test_estree_rejects_non_program_root() {
    let result = EstreeJsonParser::new().parse(r#"{"type": "Identifier", "name": "a"}"#);
    assert!(matches!(result, Err(ParseError::NotAProgram("Identifier"))));
}

#[test]
fn test_estree_ignores_location_fields() {
    let result = EstreeJsonParser::new().parse(
        r#"{"type": "Program", "range": [0, 1], "body": [{"type": "EmptyStatement", "loc": null}]}"#,
    );
    let tree = result.expect("location fields are ignored");
    assert_eq!(tree.arena.get(tree.body()[0]), Some(&Node::EmptyStatement));
}
