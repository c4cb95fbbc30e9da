use super::*;

fn parse_ok(source: &str) -> ProgramTree {
    SourceTextParser.parse(source).unwrap_or_else(|err| panic!("{source:?}: {err}"))
}

fn first_expression(tree: &ProgramTree) -> &Node {
    let Some(Node::ExpressionStatement { expression, .. }) = tree.arena.get(tree.body()[0]) else {
        panic!("expected an expression statement");
    };
    tree.arena.get(*expression).expect("expression node")
}

#[test]
fn test_declaration_patterns() {
    let tree = parse_ok("var [a, , {b: c}] = d;");
    let Some(Node::VariableDeclaration { kind, declarations }) = tree.arena.get(tree.body()[0]) else {
        panic!("expected a declaration");
    };
    assert_eq!(*kind, VarKind::Var);
    let Some(Node::VariableDeclarator { id, init }) = tree.arena.get(declarations[0]) else {
        panic!("expected a declarator");
    };
    let Some(Node::ArrayPattern { elements }) = tree.arena.get(*id) else {
        panic!("expected an array pattern");
    };
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_none());
    assert!(matches!(tree.arena.get(elements[2]), Some(Node::ObjectPattern { .. })));
    assert_eq!(tree.arena.identifier_name(*init), Some("d"));
}

#[test]
fn test_assignment_literals_become_patterns() {
    let tree = parse_ok("[a, {b, c: [d]}] = e;");
    let Node::AssignmentExpression { left, .. } = first_expression(&tree) else {
        panic!("expected an assignment");
    };
    let Some(Node::ArrayPattern { elements }) = tree.arena.get(*left) else {
        panic!("expected an array pattern");
    };
    let Some(Node::ObjectPattern { properties }) = tree.arena.get(elements[1]) else {
        panic!("expected an object pattern");
    };
    let Some(Node::Property { key, value, shorthand, .. }) = tree.arena.get(properties[0]) else {
        panic!("expected a property");
    };
    assert!(*shorthand);
    assert_ne!(key, value, "shorthand key and value must be distinct nodes");
}

#[test]
fn test_invalid_assignment_targets_are_rejected() {
    for source in ["a + b = c;", "[a + 1] = c;", "({a() {}} = c);", "1 += 2;"] {
        let err = SourceTextParser.parse(source).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }), "{source}");
    }
}

#[test]
fn test_arrow_functions() {
    let tree = parse_ok("f = (a, [b]) => a;");
    let Node::AssignmentExpression { right, .. } = first_expression(&tree) else {
        panic!("expected an assignment");
    };
    let Some(Node::ArrowFunctionExpression(data)) = tree.arena.get(*right) else {
        panic!("expected an arrow");
    };
    assert!(data.expression);
    assert_eq!(data.params.len(), 2);
    assert!(matches!(tree.arena.get(data.params[1]), Some(Node::ArrayPattern { .. })));

    let tree = parse_ok("g = x => { return x; };");
    let Node::AssignmentExpression { right, .. } = first_expression(&tree) else {
        panic!("expected an assignment");
    };
    assert!(matches!(
        tree.arena.get(*right),
        Some(Node::ArrowFunctionExpression(FunctionData { expression: false, .. }))
    ));
}

#[test]
fn test_parenthesized_expression_is_not_an_arrow() {
    let tree = parse_ok("(a, b);");
    assert!(matches!(first_expression(&tree), Node::SequenceExpression { .. }));
}

#[test]
fn test_directives_are_marked() {
    let tree = parse_ok("'use strict'; \"other\"; f(); 'late';");
    let directives: Vec<_> = tree
        .body()
        .iter()
        .map(|&stmt| match tree.arena.get(stmt) {
            Some(Node::ExpressionStatement { directive, .. }) => directive.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(
        directives,
        vec![Some("use strict".to_string()), Some("other".to_string()), None, None]
    );
}

#[test]
fn test_automatic_semicolons() {
    let tree = parse_ok("a = 1\nb = 2\nfunction f() { return }");
    assert_eq!(tree.body().len(), 3);
}

#[test]
fn test_literals_keep_raw_text() {
    let tree = parse_ok("x = 0x10;");
    let Node::AssignmentExpression { right, .. } = first_expression(&tree) else {
        panic!("expected an assignment");
    };
    assert_eq!(
        tree.arena.get(*right),
        Some(&Node::Literal {
            value: LiteralValue::Number(16.0),
            raw: Some("0x10".to_string()),
        })
    );
}

#[test]
fn test_unterminated_string_is_a_syntax_error() {
    let err = SourceTextParser.parse("x = 'open").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
    assert!(err.to_string().contains("unterminated string literal"), "{err}");
}

#[test]
fn test_unsupported_syntax_is_an_error() {
    for source in ["var [...rest] = x;", "class A {}", "var [a = 1] = x;"] {
        assert!(SourceTextParser.parse(source).is_err(), "{source}");
    }
}
