//! Pattern Rewrite Rules for array and object patterns.
//!
//! Each rule turns `pattern = right` into elementary bindings on a
//! `DeclarationTarget`. The shape of `right` picks the strategy:
//!
//! | right                         | array pattern               | object pattern       |
//! |-------------------------------|-----------------------------|----------------------|
//! | identifier / `this`           | `a = x[0], b = x[1]`        | `a = x.a`            |
//! | array literal (value unused)  | paired: `a = 1, b = 2`      | cached               |
//! | chained `[c] = ...`           | inner rewrite, then cached  | same                 |
//! | anything else                 | `$0 = right, a = $0[0]`     | `$0 = right, a = $0.a` |
//!
//! Nested pattern slots are bound like plain targets (`[b, c] = $0[1]`); the
//! driver visits that binding again and the rules apply one level down.

use super::declaration_target::DeclarationTarget;
use super::error::{Result, TransformError};
use crate::lowering_pass::LoweringPass;
use crate::trace_targets;
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span};
use unravel_parser::parser::{LiteralValue, Node, NodeIndex, NodeList};
use unravel_parser::syntax::transform_utils::{
    bound_names, collect_bound_names, is_identifier_name, is_inert_expression, is_pattern, is_simple_target,
    references_any_name,
};

/// Syntactic class of a right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightKind {
    Identifier,
    This,
    ArrayLiteral,
    ObjectLiteral,
    Literal,
    Call,
    New,
    Member,
    Assignment,
    Sequence,
    Yield,
    Function,
    Other,
}

impl RightKind {
    pub fn classify(node: Option<&Node>) -> RightKind {
        match node {
            Some(Node::Identifier { .. }) => RightKind::Identifier,
            Some(Node::ThisExpression) => RightKind::This,
            Some(Node::ArrayExpression { .. }) => RightKind::ArrayLiteral,
            Some(Node::ObjectExpression { .. }) => RightKind::ObjectLiteral,
            Some(Node::Literal { .. }) => RightKind::Literal,
            Some(Node::CallExpression { .. }) => RightKind::Call,
            Some(Node::NewExpression { .. }) => RightKind::New,
            Some(Node::MemberExpression { .. }) => RightKind::Member,
            Some(Node::AssignmentExpression { .. }) => RightKind::Assignment,
            Some(Node::SequenceExpression { .. }) => RightKind::Sequence,
            Some(Node::YieldExpression { .. }) => RightKind::Yield,
            Some(Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_)) => RightKind::Function,
            _ => RightKind::Other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RightKind::Identifier => "identifier",
            RightKind::This => "this",
            RightKind::ArrayLiteral => "array",
            RightKind::ObjectLiteral => "object",
            RightKind::Literal => "literal",
            RightKind::Call => "call",
            RightKind::New => "new",
            RightKind::Member => "member",
            RightKind::Assignment => "assignment",
            RightKind::Sequence => "sequence",
            RightKind::Yield => "yield",
            RightKind::Function => "function",
            RightKind::Other => "other",
        }
    }

    /// Safe to read more than once and never written by the pattern
    /// (aliasing is checked separately for identifiers).
    const fn is_rereadable(self) -> bool {
        matches!(self, RightKind::Identifier | RightKind::This)
    }
}

impl LoweringPass<'_> {
    /// Rewrite `var <pattern> = init` into plain declarators.
    pub(crate) fn rewrite_declarator(&mut self, declarator: NodeIndex) -> Result<NodeList> {
        let Some(Node::VariableDeclarator { id, init }) = self.arena.get(declarator) else {
            return Err(TransformError::MissingNode(declarator));
        };
        let (id, init) = (*id, *init);
        let _span =
            debug_span!(target: trace_targets::REWRITE, "rewrite", node = declarator.0, form = "declarator").entered();
        let mut target = DeclarationTarget::declarator();
        let kind = self.rewrite_pattern(&mut target, id, init)?;
        self.pending_hoists.extend(target.take_temporaries());
        let bindings = target.len();
        let replacements = target.finalize(self.arena)?;
        self.stats.declarators += 1;
        debug!(
            target: trace_targets::REWRITE,
            right = kind.as_str(),
            bindings,
            "rewrote destructuring"
        );
        Ok(replacements)
    }

    /// Rewrite `<pattern> = right` into plain assignments.
    pub(crate) fn rewrite_assignment(
        &mut self,
        assignment: NodeIndex,
        value_discarded: bool,
        parent_is_sequence: bool,
    ) -> Result<NodeList> {
        let Some(Node::AssignmentExpression { left, right, .. }) = self.arena.get(assignment) else {
            return Err(TransformError::MissingNode(assignment));
        };
        let (left, right) = (*left, *right);
        let _span =
            debug_span!(target: trace_targets::REWRITE, "rewrite", node = assignment.0, form = "assignment").entered();
        let mut target = DeclarationTarget::assignment(value_discarded, parent_is_sequence);
        let kind = self.rewrite_pattern(&mut target, left, right)?;
        self.pending_hoists.extend(target.take_temporaries());
        let bindings = target.len();
        let replacements = target.finalize(self.arena)?;
        self.stats.assignments += 1;
        debug!(
            target: trace_targets::REWRITE,
            right = kind.as_str(),
            bindings,
            value_discarded,
            "rewrote destructuring"
        );
        Ok(replacements)
    }

    /// Reduce a chained right side (`[a] = [b] = x`) to the single grouped
    /// expression its own rewrite produces. Other right sides pass through.
    fn resolve_chained_right(&mut self, right: NodeIndex) -> Result<NodeIndex> {
        let chained = matches!(
            self.arena.get(right),
            Some(Node::AssignmentExpression { operator, left, .. })
                if operator == "=" && is_pattern(self.arena, *left)
        );
        if !chained {
            return Ok(right);
        }
        let resolved = self.rewrite_assignment(right, false, false)?;
        match resolved.as_slice() {
            [single] => Ok(*single),
            other => Err(TransformError::invariant(
                "resolve_chained_right",
                format!("chained assignment produced {} nodes instead of one", other.len()),
            )),
        }
    }

    fn rewrite_pattern(&mut self, target: &mut DeclarationTarget, pattern: NodeIndex, right: NodeIndex) -> Result<RightKind> {
        let right = self.resolve_chained_right(right)?;
        let kind = RightKind::classify(self.arena.get(right));
        let names = bound_names(self.arena, pattern);
        match self.arena.get(pattern) {
            Some(Node::ArrayPattern { elements }) => {
                let slots = elements.clone();
                self.rewrite_array_pattern(target, &slots, &names, right, kind)?;
            }
            Some(Node::ObjectPattern { properties }) => {
                let properties = properties.clone();
                self.rewrite_object_pattern(target, &properties, &names, right, kind)?;
            }
            _ => {
                return Err(TransformError::invariant(
                    "rewrite_pattern",
                    format!("{pattern:?} is not an array or object pattern"),
                ));
            }
        }
        Ok(kind)
    }

    /// Identifier right sides that the pattern itself writes would be read
    /// after being overwritten.
    fn reads_directly(&self, right: NodeIndex, kind: RightKind, names: &[String]) -> bool {
        kind.is_rereadable()
            && self
                .arena
                .identifier_name(right)
                .is_none_or(|name| !names.iter().any(|n| n == name))
    }

    // =========================================================================
    // Array patterns
    // =========================================================================

    fn rewrite_array_pattern(
        &mut self,
        target: &mut DeclarationTarget,
        slots: &[NodeIndex],
        names: &[String],
        right: NodeIndex,
        kind: RightKind,
    ) -> Result<()> {
        let has_targets = slots.iter().any(|slot| slot.is_some());
        if has_targets && self.reads_directly(right, kind, names) {
            for (i, &slot) in slots.iter().enumerate() {
                if slot.is_none() {
                    continue;
                }
                let base = self.arena.deep_clone(right);
                let access = self.arena.add_element_access(base, i);
                target.push_binding(self.arena, slot, access);
            }
            if target.needs_value() {
                target.expose(right);
            }
            return Ok(());
        }
        if has_targets && kind == RightKind::ArrayLiteral && !target.needs_value() && self.can_pair(slots, right) {
            return self.pair_elements(target, slots, right);
        }

        let temp = self.cache_right(target, right)?;
        for (i, &slot) in slots.iter().enumerate() {
            if slot.is_none() {
                continue;
            }
            let base = self.arena.add_identifier(temp.as_str());
            let access = self.arena.add_element_access(base, i);
            target.push_binding(self.arena, slot, access);
        }
        if !has_targets {
            self.push_nullish_guard(target, &temp);
        }
        if target.needs_value() {
            let value = self.arena.add_identifier(temp.as_str());
            target.expose(value);
        }
        Ok(())
    }

    /// Whether `slots = [v0, v1, ...]` can be bound element by element
    /// without changing what is read or in which order side effects run.
    fn can_pair(&self, slots: &[NodeIndex], right: NodeIndex) -> bool {
        let Some(Node::ArrayExpression { elements: values }) = self.arena.get(right) else {
            return false;
        };
        if values
            .iter()
            .any(|&value| matches!(self.arena.get(value), Some(Node::SpreadElement { .. })))
        {
            return false;
        }
        // Values without a slot are dropped, so they must not do anything.
        for (i, &value) in values.iter().enumerate() {
            let dropped = slots.get(i).is_none_or(|slot| slot.is_none());
            if dropped && !is_inert_expression(self.arena, value) {
                return false;
            }
        }

        let all_inert = values.iter().all(|&value| is_inert_expression(self.arena, value));
        let first_inert = values.first().is_none_or(|&value| is_inert_expression(self.arena, value));
        let mut written: FxHashSet<String> = FxHashSet::default();
        // A property write may run a setter, which must not see a later
        // element that the literal would already have evaluated.
        let mut member_written = false;
        for (i, &slot) in slots.iter().enumerate() {
            if slot.is_none() {
                continue;
            }
            let value = values.get(i).copied().unwrap_or(NodeIndex::NONE);
            if member_written
                && value.is_some()
                && !matches!(
                    self.arena.get(value),
                    Some(
                        Node::Literal { .. }
                            | Node::ThisExpression
                            | Node::FunctionExpression(_)
                            | Node::ArrowFunctionExpression(_)
                    )
                )
            {
                return false;
            }
            let target_ok = match self.arena.get(slot) {
                Some(Node::Identifier { .. } | Node::ArrayPattern { .. } | Node::ObjectPattern { .. }) => true,
                Some(Node::MemberExpression { .. }) => all_inert && is_simple_target(self.arena, slot),
                _ => false,
            };
            if !target_ok {
                return false;
            }
            if !written.is_empty() && value.is_some() {
                match self.arena.identifier_name(value) {
                    // Captured before the first write, which is only sound
                    // when nothing before the capture point could change it.
                    Some(name) => {
                        if written.contains(name) && !first_inert {
                            return false;
                        }
                    }
                    None => {
                        if !is_inert_expression(self.arena, value)
                            || references_any_name(self.arena, value, &written)
                        {
                            return false;
                        }
                    }
                }
            }
            let mut names = Vec::new();
            collect_bound_names(self.arena, slot, &mut names);
            written.extend(names);
            member_written |= self.writes_member(slot);
        }
        true
    }

    /// `target` is, or contains, a property write.
    fn writes_member(&self, target: NodeIndex) -> bool {
        match self.arena.get(target) {
            Some(Node::MemberExpression { .. }) => true,
            Some(Node::ArrayPattern { elements }) => {
                elements.iter().any(|&element| element.is_some() && self.writes_member(element))
            }
            Some(Node::ObjectPattern { properties }) => properties.iter().any(|&property| {
                matches!(self.arena.get(property), Some(Node::Property { value, .. }) if self.writes_member(*value))
            }),
            _ => false,
        }
    }

    /// Bind each slot to its element. A bare identifier element that an
    /// earlier slot overwrites is first captured in a temporary placed ahead
    /// of every write (`[a, b] = [b, a]` becomes `$0 = a, a = b, b = $0`).
    fn pair_elements(&mut self, target: &mut DeclarationTarget, slots: &[NodeIndex], right: NodeIndex) -> Result<()> {
        let Some(Node::ArrayExpression { elements }) = self.arena.get(right) else {
            return Err(TransformError::invariant("pair_elements", "right side is not an array literal"));
        };
        let values = elements.clone();
        for (i, &slot) in slots.iter().enumerate() {
            if slot.is_none() {
                continue;
            }
            let value = values.get(i).copied().unwrap_or(NodeIndex::NONE);
            let value = if value.is_none() {
                self.arena.add_void_zero()
            } else if self
                .arena
                .identifier_name(value)
                .is_some_and(|name| target.is_already_bound(name))
            {
                let temp = self.names.next_name()?;
                let capture = self.arena.add_identifier(temp.as_str());
                target.unshift_binding(self.arena, capture, value);
                target.note_temporary(&temp);
                self.arena.add_identifier(temp)
            } else {
                value
            };
            target.push_binding(self.arena, slot, value);
        }
        Ok(())
    }

    // =========================================================================
    // Object patterns
    // =========================================================================

    fn rewrite_object_pattern(
        &mut self,
        target: &mut DeclarationTarget,
        properties: &[NodeIndex],
        names: &[String],
        right: NodeIndex,
        kind: RightKind,
    ) -> Result<()> {
        let direct = !properties.is_empty() && self.reads_directly(right, kind, names);
        let temp = if direct {
            None
        } else {
            Some(self.cache_right(target, right)?)
        };

        for &property in properties {
            let Some(Node::Property {
                key, value, computed, ..
            }) = self.arena.get(property)
            else {
                return Err(TransformError::invariant(
                    "rewrite_object_pattern",
                    format!("{property:?} is not a property"),
                ));
            };
            let (key, value, computed) = (*key, *value, *computed);
            let base = match &temp {
                Some(name) => self.arena.add_identifier(name.as_str()),
                None => self.arena.deep_clone(right),
            };
            let access = self.keyed_access(base, key, computed);
            target.push_binding(self.arena, value, access);
        }
        if properties.is_empty()
            && let Some(name) = &temp
        {
            self.push_nullish_guard(target, name);
        }

        if target.needs_value() {
            let value = match &temp {
                Some(name) => self.arena.add_identifier(name.as_str()),
                None => right,
            };
            target.expose(value);
        }
        Ok(())
    }

    /// `base.key`, `base["key"]`, `base[0]` or `base[expr]`. Key nodes are
    /// moved out of the pattern, so computed keys still run exactly once.
    fn keyed_access(&mut self, base: NodeIndex, key: NodeIndex, computed: bool) -> NodeIndex {
        if computed {
            return self.arena.add_member(base, key, true);
        }
        match self.arena.get(key) {
            Some(Node::Identifier { .. }) => self.arena.add_member(base, key, false),
            Some(Node::Literal {
                value: LiteralValue::String(text),
                ..
            }) if is_identifier_name(text) => {
                let name = text.clone();
                self.arena.add_property_access(base, &name)
            }
            _ => self.arena.add_member(base, key, true),
        }
    }

    // =========================================================================
    // Caching
    // =========================================================================

    /// Evaluate `right` once into a fresh temporary: `$n = right` becomes the
    /// next binding. Returns the temporary's name.
    fn cache_right(&mut self, target: &mut DeclarationTarget, right: NodeIndex) -> Result<String> {
        let temp = self.names.next_name()?;
        let id = self.arena.add_identifier(temp.as_str());
        target.push_binding(self.arena, id, right);
        target.note_temporary(&temp);
        Ok(temp)
    }

    /// `$0 = $0 == null ? $0[0] : $0`. A pattern that reads nothing still
    /// has to throw on `null` and `undefined`.
    fn push_nullish_guard(&mut self, target: &mut DeclarationTarget, temp: &str) {
        let tested = self.arena.add_identifier(temp);
        let null = self.arena.add_null();
        let test = self.arena.add(Node::BinaryExpression {
            operator: "==".to_string(),
            left: tested,
            right: null,
        });
        let base = self.arena.add_identifier(temp);
        let read = self.arena.add_element_access(base, 0);
        let unchanged = self.arena.add_identifier(temp);
        let guard = self.arena.add(Node::ConditionalExpression {
            test,
            consequent: read,
            alternate: unchanged,
        });
        let id = self.arena.add_identifier(temp);
        target.push_binding(self.arena, id, guard);
    }
}

#[cfg(test)]
#[path = "../../tests/destructuring_tests.rs"]
mod tests;
