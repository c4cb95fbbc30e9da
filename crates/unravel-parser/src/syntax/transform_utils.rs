//! Transform utilities for syntax analysis.
//!
//! Queries the destructuring rules use to decide whether a right-hand side
//! can be paired positionally or must be cached in a temporary.

use crate::parser::{Node, NodeArena, NodeIndex, NodeList};
use rustc_hash::FxHashSet;

/// True for `ArrayPattern` and `ObjectPattern` nodes.
#[must_use]
pub fn is_pattern(arena: &NodeArena, node_idx: NodeIndex) -> bool {
    arena.get(node_idx).is_some_and(Node::is_pattern)
}

/// Append every name bound by an assignment or binding target.
///
/// Identifiers bind themselves, patterns bind the names of all their
/// (nested) targets, member expressions bind nothing.
pub fn collect_bound_names(arena: &NodeArena, target: NodeIndex, out: &mut Vec<String>) {
    let Some(node) = arena.get(target) else {
        return;
    };
    match node {
        Node::Identifier { name } => out.push(name.clone()),
        Node::ArrayPattern { elements } => {
            for &element in elements {
                collect_bound_names(arena, element, out);
            }
        }
        Node::ObjectPattern { properties } => {
            for &property in properties {
                if let Some(Node::Property { value, .. }) = arena.get(property) {
                    collect_bound_names(arena, *value, out);
                }
            }
        }
        _ => {}
    }
}

/// Names bound by `target`, as a list in source order.
#[must_use]
pub fn bound_names(arena: &NodeArena, target: NodeIndex) -> Vec<String> {
    let mut names = Vec::new();
    collect_bound_names(arena, target, &mut names);
    names
}

/// A target whose evaluation cannot observe earlier writes of the same
/// destructuring: an identifier, a nested pattern, or a member access on an
/// identifier or `this` with a fixed key.
#[must_use]
pub fn is_simple_target(arena: &NodeArena, target: NodeIndex) -> bool {
    let Some(node) = arena.get(target) else {
        return true;
    };
    match node {
        Node::Identifier { .. } | Node::ArrayPattern { .. } | Node::ObjectPattern { .. } => true,
        Node::MemberExpression {
            object,
            property,
            computed,
        } => {
            let object_ok = matches!(
                arena.get(*object),
                Some(Node::Identifier { .. } | Node::ThisExpression)
            );
            let key_ok = !computed || matches!(arena.get(*property), Some(Node::Literal { .. }));
            object_ok && key_ok
        }
        _ => false,
    }
}

/// True when evaluating the expression has no side effects and cannot
/// throw: literals, identifiers, `this`, function and arrow expressions, and
/// array/object literals built only from inert parts.
#[must_use]
pub fn is_inert_expression(arena: &NodeArena, node_idx: NodeIndex) -> bool {
    let Some(node) = arena.get(node_idx) else {
        // Holes in array literals.
        return true;
    };
    match node {
        Node::Literal { .. }
        | Node::Identifier { .. }
        | Node::ThisExpression
        | Node::FunctionExpression(_)
        | Node::ArrowFunctionExpression(_) => true,
        Node::ArrayExpression { elements } => elements.iter().all(|&e| is_inert_expression(arena, e)),
        Node::ObjectExpression { properties } => properties.iter().all(|&p| match arena.get(p) {
            Some(Node::Property {
                value, computed, ..
            }) => !computed && is_inert_expression(arena, *value),
            _ => false,
        }),
        Node::UnaryExpression { operator, argument } => {
            operator != "delete" && is_inert_expression(arena, *argument)
        }
        _ => false,
    }
}

/// True when the expression reads any of `names`.
///
/// Function bodies are not searched; they run later, not while the
/// surrounding expression is evaluated.
#[must_use]
pub fn references_any_name(arena: &NodeArena, node_idx: NodeIndex, names: &FxHashSet<String>) -> bool {
    if names.is_empty() {
        return false;
    }
    let Some(node) = arena.get(node_idx) else {
        return false;
    };
    match node {
        Node::Identifier { name } => names.contains(name),
        Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_) | Node::FunctionDeclaration(_) => false,
        Node::MemberExpression {
            object,
            property,
            computed,
        } => {
            references_any_name(arena, *object, names)
                || (*computed && references_any_name(arena, *property, names))
        }
        Node::Property {
            key,
            value,
            computed,
            ..
        } => (*computed && references_any_name(arena, *key, names)) || references_any_name(arena, *value, names),
        _ => arena
            .children(node_idx)
            .into_iter()
            .any(|child| references_any_name(arena, child, names)),
    }
}

/// Number of leading directive statements (`"use strict";`) in a statement
/// list. New statements are inserted after them.
#[must_use]
pub fn directive_prologue_len(arena: &NodeArena, statements: &NodeList) -> usize {
    statements
        .iter()
        .take_while(|&&stmt| {
            matches!(
                arena.get(stmt),
                Some(Node::ExpressionStatement {
                    directive: Some(_),
                    ..
                })
            )
        })
        .count()
}

/// True when `text` can be written as `object.text`.
#[must_use]
pub fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
