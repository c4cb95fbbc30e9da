//! Temporary Declaration Placement.
//!
//! Temporaries assigned inside an expression (`$0 = f(), a = $0[0]`) need a
//! `var` somewhere in scope. They are declared at the top of the container
//! chosen by `TempPlacement`, after any directive prologue:
//!
//! ```javascript
//! function f() { "use strict"; var x = 1; [a, b] = g(); }
//! // function f() { "use strict"; var x = 1, $0; $0 = g(), a = $0[0], b = $0[1]; }
//! ```
//!
//! A leading `var` statement absorbs the new declarator; otherwise a new
//! `var name;` statement is inserted. `let`/`const` statements are never
//! extended.

use super::error::{Result, TransformError};
use unravel_common::TempPlacement;
use unravel_parser::parser::{Node, NodeArena, NodeIndex, VarKind};
use unravel_parser::syntax::transform_utils::directive_prologue_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoistPolicy {
    placement: TempPlacement,
}

impl HoistPolicy {
    pub const fn new(placement: TempPlacement) -> Self {
        HoistPolicy { placement }
    }

    pub const fn placement(&self) -> TempPlacement {
        self.placement
    }

    /// Container receiving the `var`, given the nearest function (or
    /// program) and the nearest block.
    pub const fn container(&self, function: NodeIndex, block: NodeIndex) -> NodeIndex {
        match self.placement {
            TempPlacement::FunctionScope => function,
            TempPlacement::NearestBlock => block,
        }
    }
}

/// Statement list owner for a function: its body block. A concise arrow body
/// is first converted into `{ return body; }`.
pub fn ensure_block_body(arena: &mut NodeArena, function: NodeIndex) -> Result<NodeIndex> {
    let data = arena
        .function_data(function)
        .ok_or_else(|| TransformError::invariant("ensure_block_body", format!("{function:?} is not a function")))?;
    if !data.expression {
        return Ok(data.body);
    }
    let expression = data.body;
    let ret = arena.add_return(expression);
    let block = arena.add_block(vec![ret]);
    if let Some(data) = arena.function_data_mut(function) {
        data.body = block;
        data.expression = false;
    }
    Ok(block)
}

/// Declare `var name;` at the top of `container` (a program, block statement
/// or function node).
pub fn declare_var(arena: &mut NodeArena, container: NodeIndex, name: &str) -> Result<()> {
    let owner = match arena.get(container) {
        Some(node) if node.is_function_like() => ensure_block_body(arena, container)?,
        Some(Node::Program { .. } | Node::BlockStatement { .. }) => container,
        Some(other) => {
            return Err(TransformError::invariant(
                "declare_var",
                format!("cannot hoist into {}", other.kind_name()),
            ));
        }
        None => return Err(TransformError::MissingNode(container)),
    };
    let statements = arena
        .statements(owner)
        .ok_or_else(|| TransformError::invariant("declare_var", "hoist container has no statement list"))?;
    let at = directive_prologue_len(arena, statements);
    let leading_var = statements.get(at).copied().filter(|&stmt| {
        matches!(
            arena.get(stmt),
            Some(Node::VariableDeclaration {
                kind: VarKind::Var,
                ..
            })
        )
    });

    let id = arena.add_identifier(name);
    let declarator = arena.add_declarator(id, NodeIndex::NONE);
    match leading_var {
        Some(stmt) => {
            if let Some(Node::VariableDeclaration { declarations, .. }) = arena.get_mut(stmt) {
                declarations.push(declarator);
            }
        }
        None => {
            let declaration = arena.add_variable_declaration(VarKind::Var, vec![declarator]);
            if let Some(statements) = arena.statements_mut(owner) {
                statements.insert(at, declaration);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/hoisting_tests.rs"]
mod tests;
