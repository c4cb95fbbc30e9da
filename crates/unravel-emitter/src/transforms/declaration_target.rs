//! Declaration Target.
//!
//! One rewrite of a declarator or an assignment collects its elementary
//! bindings here, then `finalize` turns them into declarators (`var a = x`)
//! or assignment expressions (`a = x`). The rules never need to know which
//! surface form they are filling.

use super::error::{Result, TransformError};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use unravel_parser::parser::{NodeArena, NodeIndex, NodeList};
use unravel_parser::syntax::transform_utils::collect_bound_names;

/// Surface form being rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetForm {
    /// `var <pattern> = init`; produces declarators.
    Declarator,
    /// `<pattern> = right`; produces expressions.
    Assignment {
        /// Nothing reads the assignment's value.
        value_discarded: bool,
        /// The assignment is an element of a `SequenceExpression`, so its
        /// bindings are spliced into that sequence instead of a new one.
        parent_is_sequence: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `target = value`
    Assign { target: NodeIndex, value: NodeIndex },
    /// Trailing expression that carries the assignment's value.
    Expose(NodeIndex),
}

#[derive(Debug)]
pub struct DeclarationTarget {
    form: TargetForm,
    bindings: VecDeque<Binding>,
    bound: FxHashSet<String>,
    /// Temporaries whose defining binding is an assignment and therefore
    /// need a hoisted `var`.
    temporaries: Vec<String>,
}

impl DeclarationTarget {
    pub fn new(form: TargetForm) -> Self {
        DeclarationTarget {
            form,
            bindings: VecDeque::new(),
            bound: FxHashSet::default(),
            temporaries: Vec::new(),
        }
    }

    pub fn declarator() -> Self {
        DeclarationTarget::new(TargetForm::Declarator)
    }

    pub fn assignment(value_discarded: bool, parent_is_sequence: bool) -> Self {
        DeclarationTarget::new(TargetForm::Assignment {
            value_discarded,
            parent_is_sequence,
        })
    }

    pub const fn form(&self) -> TargetForm {
        self.form
    }

    pub const fn is_assignment(&self) -> bool {
        matches!(self.form, TargetForm::Assignment { .. })
    }

    /// The rewritten construct must still evaluate to the right-hand value.
    pub const fn needs_value(&self) -> bool {
        matches!(
            self.form,
            TargetForm::Assignment {
                value_discarded: false,
                ..
            }
        )
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    fn record_bound(&mut self, arena: &NodeArena, target: NodeIndex) {
        let mut names = Vec::new();
        collect_bound_names(arena, target, &mut names);
        self.bound.extend(names);
    }

    /// Append `target = value`.
    pub fn push_binding(&mut self, arena: &NodeArena, target: NodeIndex, value: NodeIndex) {
        self.record_bound(arena, target);
        self.bindings.push_back(Binding::Assign { target, value });
    }

    /// Prepend `target = value` so it runs before every queued binding.
    pub fn unshift_binding(&mut self, arena: &NodeArena, target: NodeIndex, value: NodeIndex) {
        self.record_bound(arena, target);
        self.bindings.push_front(Binding::Assign { target, value });
    }

    /// Append the expression that carries the construct's value.
    pub fn expose(&mut self, value: NodeIndex) {
        self.bindings.push_back(Binding::Expose(value));
    }

    /// `name` is written by a binding queued earlier in this rewrite.
    pub fn is_already_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    /// Snapshot of the names written so far.
    pub fn bound_names(&self) -> &FxHashSet<String> {
        &self.bound
    }

    /// Record a temporary that is assigned rather than declared.
    pub fn note_temporary(&mut self, name: &str) {
        if self.is_assignment() {
            self.temporaries.push(name.to_string());
        }
    }

    pub fn take_temporaries(&mut self) -> Vec<String> {
        std::mem::take(&mut self.temporaries)
    }

    /// Build the replacement nodes.
    ///
    /// Declarator form yields one `VariableDeclarator` per binding. The
    /// assignment form yields the flat expression list when the parent is a
    /// sequence, otherwise a single node (one expression, or a
    /// `SequenceExpression` grouping several).
    pub fn finalize(self, arena: &mut NodeArena) -> Result<NodeList> {
        if self.bindings.is_empty() {
            return Err(TransformError::invariant(
                "DeclarationTarget::finalize",
                "rewrite produced no bindings",
            ));
        }
        let exposes = self
            .bindings
            .iter()
            .filter(|b| matches!(b, Binding::Expose(_)))
            .count();
        match self.form {
            TargetForm::Declarator => {
                if exposes > 0 {
                    return Err(TransformError::invariant(
                        "DeclarationTarget::finalize",
                        "declarator rewrite exposed a value",
                    ));
                }
                Ok(self
                    .bindings
                    .into_iter()
                    .filter_map(|binding| match binding {
                        Binding::Assign { target, value } => Some(arena.add_declarator(target, value)),
                        Binding::Expose(_) => None,
                    })
                    .collect())
            }
            TargetForm::Assignment {
                value_discarded,
                parent_is_sequence,
            } => {
                let expected = usize::from(!value_discarded);
                if exposes != expected || (expected == 1 && !matches!(self.bindings.back(), Some(Binding::Expose(_))))
                {
                    return Err(TransformError::invariant(
                        "DeclarationTarget::finalize",
                        format!("expected {expected} trailing value reference, found {exposes}"),
                    ));
                }
                let expressions: NodeList = self
                    .bindings
                    .into_iter()
                    .map(|binding| match binding {
                        Binding::Assign { target, value } => arena.add_assignment(target, value),
                        Binding::Expose(value) => value,
                    })
                    .collect();
                if parent_is_sequence || expressions.len() == 1 {
                    Ok(expressions)
                } else {
                    Ok(vec![arena.add_sequence(expressions)])
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/declaration_target_tests.rs"]
mod tests;
