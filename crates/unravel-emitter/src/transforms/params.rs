//! Function-Parameter Rewriter.
//!
//! ```javascript
//! function f([a, b], {c}) { return a + b + c; }
//! // function f($0, $1) { var [a, b] = $0; var {c} = $1; return a + b + c; }
//! ```
//!
//! The injected declarations still carry their patterns. They sit at the
//! head of the body, so the driver reaches them when it descends into the
//! function and the declarator rules flatten them there.

use super::error::{Result, TransformError};
use super::hoisting::ensure_block_body;
use crate::lowering_pass::LoweringPass;
use crate::trace_targets;
use tracing::debug;
use unravel_parser::parser::{NodeIndex, NodeList, VarKind};
use unravel_parser::syntax::transform_utils::{directive_prologue_len, is_pattern};

impl LoweringPass<'_> {
    /// Replace every pattern parameter of `function` with a fresh identifier.
    /// Returns whether anything changed.
    pub(crate) fn rewrite_params(&mut self, function: NodeIndex) -> Result<bool> {
        let params = self
            .arena
            .function_data(function)
            .map(|data| data.params.clone())
            .ok_or_else(|| TransformError::invariant("rewrite_params", format!("{function:?} is not a function")))?;

        let mut injected: NodeList = Vec::new();
        for (position, &param) in params.iter().enumerate() {
            if !is_pattern(self.arena, param) {
                continue;
            }
            let name = self.names.next_name()?;
            let replacement = self.arena.add_identifier(name.as_str());
            if let Some(data) = self.arena.function_data_mut(function) {
                data.params[position] = replacement;
            }
            let init = self.arena.add_identifier(name);
            let declarator = self.arena.add_declarator(param, init);
            injected.push(self.arena.add_variable_declaration(VarKind::Var, vec![declarator]));
        }
        if injected.is_empty() {
            return Ok(false);
        }

        let body = ensure_block_body(self.arena, function)?;
        let statements = self
            .arena
            .statements(body)
            .ok_or_else(|| TransformError::invariant("rewrite_params", "function body has no statement list"))?;
        let at = directive_prologue_len(self.arena, statements);
        let count = injected.len();
        if let Some(statements) = self.arena.statements_mut(body) {
            statements.splice(at..at, injected);
        }
        self.stats.functions += 1;
        debug!(target: trace_targets::REWRITE, function = function.0, params = count, "rewrote pattern parameters");
        Ok(true)
    }
}
