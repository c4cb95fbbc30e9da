//! Lowering Pass - destructuring to plain assignments
//!
//! Walks the program tree and rewrites every destructuring construct:
//!
//! ```javascript
//! var [a, {b}] = f();          // var $0 = f(), a = $0[0], $1 = $0[1], b = $1.b;
//! [a, b] = [b, a];             // $0 = a, a = b, b = $0;
//! function g([x, y]) {}        // function g($0) { var x = $0[0], y = $0[1]; }
//! ```
//!
//! # Architecture
//!
//! The walk runs off an explicit LIFO work-list of `(node, Cursor)` items
//! instead of recursion. The cursor carries everything a rule needs to know
//! about the node's position: its parent, the enclosing function and block
//! (where hoisted temporaries go), whether its value is discarded, and how
//! many rewrites produced it.
//!
//! A rewrite never recurses into its own output. Replacement nodes are pushed
//! back onto the work-list and visited like any other node, so nested
//! patterns (`[a, [b]] = x` leaves `[b] = $0[1]` behind) are normalized by
//! the same loop. Each push from a rewrite increments the cursor depth;
//! `MAX_RENORMALIZE_DEPTH` turns a rule that keeps producing patterns into an
//! error. Only rewrite output carries a depth: user subtrees moved into a
//! replacement (a cached right-hand side, call arguments) start again at 0.
//!
//! Two ways of installing a replacement:
//!
//! - Declarators, and assignments that are elements of a sequence, are
//!   spliced into the parent's list (`declarations` / `expressions`).
//! - Any other assignment is overwritten in place with `NodeArena::replace`,
//!   so the parent keeps pointing at the same index.

use crate::transforms::error::{Result, TransformError};
use crate::transforms::hoisting::{self, HoistPolicy};
use crate::trace_targets;
use crate::transforms::temp_names::TempNameAllocator;
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};
use unravel_binder::analyze_scopes;
use unravel_common::limits::{INITIAL_WORKLIST_CAPACITY, MAX_RENORMALIZE_DEPTH};
use unravel_common::{NamingStrategy, TransformOptions};
use unravel_parser::ProgramTree;
use unravel_parser::parser::{Node, NodeArena, NodeIndex};
use unravel_parser::syntax::transform_utils::is_pattern;

bitflags! {
    /// Position facts carried by a `Cursor`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CursorFlags: u8 {
        /// Nothing reads the value of the node.
        const VALUE_DISCARDED = 1 << 0;
        /// The node was produced by a rewrite.
        const SYNTHESIZED = 1 << 1;
    }
}

/// Where a work item sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub parent: NodeIndex,
    /// Nearest enclosing function node, or the program root.
    pub function: NodeIndex,
    /// Nearest enclosing block statement, function node, or program root.
    pub block: NodeIndex,
    pub flags: CursorFlags,
    /// Number of rewrites in the chain that produced this node; 0 for nodes
    /// written by the user.
    pub depth: u32,
}

impl Cursor {
    fn root(root: NodeIndex) -> Self {
        Cursor {
            parent: NodeIndex::NONE,
            function: root,
            block: root,
            flags: CursorFlags::empty(),
            depth: 0,
        }
    }

    /// Cursor for a node produced by rewriting the node at `self`.
    fn renormalized(self, flags: CursorFlags) -> Self {
        Cursor {
            flags: flags | CursorFlags::SYNTHESIZED,
            depth: self.depth + 1,
            ..self
        }
    }

    pub const fn value_discarded(&self) -> bool {
        self.flags.contains(CursorFlags::VALUE_DISCARDED)
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkItem {
    node: NodeIndex,
    cursor: Cursor,
}

/// Counters reported by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoweringStats {
    /// Declarators with a pattern target that were rewritten.
    pub declarators: usize,
    /// Assignment expressions with a pattern target that were rewritten.
    pub assignments: usize,
    /// Functions whose pattern parameters were rewritten.
    pub functions: usize,
    /// Temporary names allocated (cached values, swap captures, parameters).
    pub temporaries: usize,
    /// `var` declarations added for temporaries assigned in expressions.
    pub hoisted: usize,
}

/// What a visited node needs.
enum Action {
    Declarator,
    Assignment,
    Function,
    Descend,
}

pub struct LoweringPass<'a> {
    pub(crate) arena: &'a mut NodeArena,
    pub(crate) names: TempNameAllocator,
    pub(crate) stats: LoweringStats,
    /// Temporaries of the current rewrite awaiting a hoisted `var`.
    pub(crate) pending_hoists: Vec<String>,
    /// Depth of bindings inside a grouped replacement, read when the driver
    /// descends into the group.
    rewrite_depth: FxHashMap<NodeIndex, u32>,
    hoist_policy: HoistPolicy,
    root: NodeIndex,
}

/// Rewrite every destructuring construct in `tree`.
///
/// The option prefix is validated before the tree is touched.
pub fn lower_destructuring(tree: &mut ProgramTree, options: &TransformOptions) -> Result<LoweringStats> {
    if !options.has_valid_name_prefix() {
        return Err(TransformError::InvalidOption(format!(
            "namePrefix `{}` is not a valid identifier prefix",
            options.name_prefix
        )));
    }
    let names = match options.naming {
        NamingStrategy::GlobalUnique => {
            TempNameAllocator::global_unique(options.name_prefix.clone(), analyze_scopes(&tree.arena, tree.root))
        }
        NamingStrategy::SimplePrefix => TempNameAllocator::simple_prefix(options.name_prefix.clone()),
    };
    let root = tree.root;
    LoweringPass::new(&mut tree.arena, root, names, HoistPolicy::new(options.temp_placement)).run()
}

impl<'a> LoweringPass<'a> {
    pub fn new(arena: &'a mut NodeArena, root: NodeIndex, names: TempNameAllocator, hoist_policy: HoistPolicy) -> Self {
        LoweringPass {
            arena,
            names,
            stats: LoweringStats::default(),
            pending_hoists: Vec::new(),
            rewrite_depth: FxHashMap::default(),
            hoist_policy,
            root,
        }
    }

    /// Run the pass to completion.
    pub fn run(mut self) -> Result<LoweringStats> {
        let span = debug_span!("lower_destructuring", nodes = self.arena.len(), naming = ?self.names.strategy());
        let _enter = span.enter();

        let mut worklist: Vec<WorkItem> = Vec::with_capacity(INITIAL_WORKLIST_CAPACITY);
        worklist.push(WorkItem {
            node: self.root,
            cursor: Cursor::root(self.root),
        });
        while let Some(item) = worklist.pop() {
            self.visit(item, &mut worklist)?;
        }

        self.stats.temporaries = self.names.allocated();
        debug!(
            declarators = self.stats.declarators,
            assignments = self.stats.assignments,
            functions = self.stats.functions,
            temporaries = self.stats.temporaries,
            hoisted = self.stats.hoisted,
            "destructuring lowered"
        );
        Ok(self.stats)
    }

    fn classify(&self, idx: NodeIndex) -> Result<Action> {
        let node = self.arena.get(idx).ok_or(TransformError::MissingNode(idx))?;
        Ok(match node {
            Node::VariableDeclarator { id, init } if init.is_some() && is_pattern(self.arena, *id) => {
                Action::Declarator
            }
            Node::AssignmentExpression { operator, left, .. }
                if operator == "=" && is_pattern(self.arena, *left) =>
            {
                Action::Assignment
            }
            node if node.is_function_like() => Action::Function,
            _ => Action::Descend,
        })
    }

    fn visit(&mut self, item: WorkItem, worklist: &mut Vec<WorkItem>) -> Result<()> {
        let WorkItem { node: idx, cursor } = item;
        if cursor.depth > MAX_RENORMALIZE_DEPTH {
            return Err(TransformError::RenormalizationLimit { depth: cursor.depth });
        }
        match self.classify(idx)? {
            Action::Declarator => {
                let replacements = self.rewrite_declarator(idx)?;
                self.flush_hoists(&cursor)?;
                self.splice(cursor.parent, idx, &replacements)?;
                let next = cursor.renormalized(CursorFlags::empty());
                for &node in replacements.iter().rev() {
                    worklist.push(WorkItem { node, cursor: next });
                }
            }
            Action::Assignment => {
                let in_sequence = matches!(self.arena.get(cursor.parent), Some(Node::SequenceExpression { .. }));
                let replacements = self.rewrite_assignment(idx, cursor.value_discarded(), in_sequence)?;
                self.flush_hoists(&cursor)?;
                if in_sequence {
                    self.splice(cursor.parent, idx, &replacements)?;
                    // Only the last spliced element takes over the
                    // original's position at the end of the sequence.
                    let inherited = cursor.flags & CursorFlags::VALUE_DISCARDED;
                    for (i, &node) in replacements.iter().enumerate().rev() {
                        let flags = if i + 1 == replacements.len() {
                            inherited
                        } else {
                            CursorFlags::VALUE_DISCARDED
                        };
                        worklist.push(WorkItem {
                            node,
                            cursor: cursor.renormalized(flags),
                        });
                    }
                } else {
                    let [single] = replacements.as_slice() else {
                        return Err(TransformError::invariant(
                            "LoweringPass::visit",
                            format!("in-place rewrite produced {} nodes", replacements.len()),
                        ));
                    };
                    let node = self
                        .arena
                        .get(*single)
                        .cloned()
                        .ok_or(TransformError::MissingNode(*single))?;
                    self.arena.replace(idx, node);
                    let next = cursor.renormalized(cursor.flags);
                    self.mark_grouped_bindings(idx, next.depth);
                    worklist.push(WorkItem { node: idx, cursor: next });
                }
            }
            Action::Function => {
                self.rewrite_params(idx)?;
                self.push_children(idx, cursor, worklist);
            }
            Action::Descend => self.push_children(idx, cursor, worklist),
        }
        Ok(())
    }

    /// Push the children of `idx` so they are visited in source order.
    fn push_children(&mut self, idx: NodeIndex, cursor: Cursor, worklist: &mut Vec<WorkItem>) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let mut base = Cursor {
            parent: idx,
            flags: CursorFlags::empty(),
            ..cursor
        };
        match node {
            Node::Program { .. } => {
                base.function = idx;
                base.block = idx;
            }
            Node::BlockStatement { .. } => base.block = idx,
            node if node.is_function_like() => {
                base.function = idx;
                base.block = idx;
            }
            _ => {}
        }

        let children = self.arena.children(idx);
        let last = children.last().copied();
        let discarded: SmallVec<[NodeIndex; 2]> = match node {
            Node::ExpressionStatement { expression, .. } => SmallVec::from_slice(&[*expression]),
            Node::ForStatement { init, update, .. } => SmallVec::from_slice(&[*init, *update]),
            Node::SequenceExpression { expressions } => {
                expressions.iter().copied().filter(|&e| Some(e) != last).collect()
            }
            _ => SmallVec::new(),
        };
        let last_inherits = matches!(node, Node::SequenceExpression { .. }) && cursor.value_discarded();

        for &child in children.iter().rev() {
            let mut flags = CursorFlags::empty();
            if discarded.contains(&child) || (last_inherits && Some(child) == last) {
                flags |= CursorFlags::VALUE_DISCARDED;
            }
            let depth = self.rewrite_depth.remove(&child).unwrap_or(0);
            worklist.push(WorkItem {
                node: child,
                cursor: Cursor { flags, depth, ..base },
            });
        }
    }

    /// An in-place replacement may be a sequence of bindings; nested
    /// patterns among them continue the chain at `depth`.
    fn mark_grouped_bindings(&mut self, idx: NodeIndex, depth: u32) {
        if let Some(Node::SequenceExpression { expressions }) = self.arena.get(idx) {
            for &expression in expressions {
                self.rewrite_depth.insert(expression, depth);
            }
        }
    }

    /// Replace `old` in the child list of `parent` with `replacements`.
    fn splice(&mut self, parent: NodeIndex, old: NodeIndex, replacements: &[NodeIndex]) -> Result<()> {
        let list = match self.arena.get_mut(parent) {
            Some(Node::VariableDeclaration { declarations, .. }) => declarations,
            Some(Node::SequenceExpression { expressions }) => expressions,
            _ => {
                return Err(TransformError::invariant(
                    "LoweringPass::splice",
                    format!("parent {parent:?} has no declarator or expression list"),
                ));
            }
        };
        let Some(position) = list.iter().position(|&child| child == old) else {
            return Err(TransformError::invariant(
                "LoweringPass::splice",
                format!("{old:?} is not a child of {parent:?}"),
            ));
        };
        list.splice(position..=position, replacements.iter().copied());
        Ok(())
    }

    /// Declare the temporaries of the last rewrite in the container chosen
    /// by the placement policy.
    fn flush_hoists(&mut self, cursor: &Cursor) -> Result<()> {
        if self.pending_hoists.is_empty() {
            return Ok(());
        }
        let container = self.hoist_policy.container(cursor.function, cursor.block);
        for name in std::mem::take(&mut self.pending_hoists) {
            hoisting::declare_var(self.arena, container, &name)?;
            self.stats.hoisted += 1;
            trace!(target: trace_targets::TEMPS, name = %name, container = container.0, "hoisted temporary");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/lowering_pass_tests.rs"]
mod tests;
