use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;
use unravel_parser::parser::{Node, NodeArena, NodeIndex, VarKind};
use unravel_parser::syntax::transform_utils::collect_bound_names;

pub type ScopeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
    Catch,
}

impl ScopeKind {
    /// `var` declarations hoist to the nearest scope of this kind.
    #[must_use]
    pub const fn is_var_scope(self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Node that opened the scope.
    pub node: NodeIndex,
    pub parent: Option<ScopeId>,
    pub declared: FxHashSet<String>,
    pub referenced: FxHashSet<String>,
}

/// Result of scope analysis over one program.
#[derive(Debug, Clone, Default)]
pub struct ScopeInfo {
    scopes: Vec<Scope>,
    used: FxHashSet<String>,
}

impl ScopeInfo {
    /// True when `name` is declared or referenced in any scope.
    #[must_use]
    pub fn is_used_name(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// The scope opened by `node`, if any.
    pub fn scope_for(&self, node: NodeIndex) -> Option<&Scope> {
        self.scopes.iter().find(|scope| scope.node == node)
    }

    pub fn used_names(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(String::as_str)
    }
}

/// Analyze every scope of the program rooted at `root`.
pub fn analyze_scopes(arena: &NodeArena, root: NodeIndex) -> ScopeInfo {
    let mut binder = ScopeBinder {
        scopes: Vec::new(),
        stack: SmallVec::new(),
    };
    binder.bind_node(arena, root);

    let mut used = FxHashSet::default();
    for scope in &binder.scopes {
        used.extend(scope.declared.iter().cloned());
        used.extend(scope.referenced.iter().cloned());
    }
    debug!(scopes = binder.scopes.len(), names = used.len(), "scope analysis complete");
    ScopeInfo {
        scopes: binder.scopes,
        used,
    }
}

struct ScopeBinder {
    scopes: Vec<Scope>,
    stack: SmallVec<[ScopeId; 8]>,
}

impl ScopeBinder {
    fn enter_scope(&mut self, kind: ScopeKind, node: NodeIndex) {
        let id = self.scopes.len() as ScopeId;
        self.scopes.push(Scope {
            kind,
            node,
            parent: self.stack.last().copied(),
            declared: FxHashSet::default(),
            referenced: FxHashSet::default(),
        });
        self.stack.push(id);
    }

    fn exit_scope(&mut self) {
        self.stack.pop();
    }

    fn current_mut(&mut self) -> Option<&mut Scope> {
        let id = *self.stack.last()?;
        self.scopes.get_mut(id as usize)
    }

    fn var_scope_mut(&mut self) -> Option<&mut Scope> {
        let id = self
            .stack
            .iter()
            .rev()
            .copied()
            .find(|&id| self.scopes.get(id as usize).is_some_and(|s| s.kind.is_var_scope()))?;
        self.scopes.get_mut(id as usize)
    }

    fn declare_names(&mut self, arena: &NodeArena, target: NodeIndex, hoisted: bool) {
        let mut names = Vec::new();
        collect_bound_names(arena, target, &mut names);
        let scope = if hoisted {
            self.var_scope_mut()
        } else {
            self.current_mut()
        };
        if let Some(scope) = scope {
            scope.declared.extend(names);
        }
    }

    fn reference(&mut self, name: &str) {
        if let Some(scope) = self.current_mut() {
            scope.referenced.insert(name.to_string());
        }
    }

    fn bind_children(&mut self, arena: &NodeArena, idx: NodeIndex) {
        for child in arena.children(idx) {
            self.bind_node(arena, child);
        }
    }

    fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node {
            Node::Program { body } => {
                self.enter_scope(ScopeKind::Program, idx);
                for &stmt in body {
                    self.bind_node(arena, stmt);
                }
                self.exit_scope();
            }
            Node::BlockStatement { body } => {
                self.enter_scope(ScopeKind::Block, idx);
                for &stmt in body {
                    self.bind_node(arena, stmt);
                }
                self.exit_scope();
            }
            Node::ForStatement { .. } | Node::ForInStatement { .. } | Node::ForOfStatement { .. } => {
                self.enter_scope(ScopeKind::Block, idx);
                self.bind_children(arena, idx);
                self.exit_scope();
            }
            Node::VariableDeclaration { kind, declarations } => {
                let hoisted = *kind == VarKind::Var;
                for &decl in declarations {
                    if let Some(Node::VariableDeclarator { id, init }) = arena.get(decl) {
                        self.declare_names(arena, *id, hoisted);
                        self.bind_pattern_keys(arena, *id);
                        self.bind_node(arena, *init);
                    }
                }
            }
            Node::FunctionDeclaration(data) => {
                self.declare_names(arena, data.id, false);
                self.bind_function(arena, idx, false);
            }
            Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_) => {
                self.bind_function(arena, idx, true);
            }
            Node::CatchClause { param, body } => {
                self.enter_scope(ScopeKind::Catch, idx);
                self.declare_names(arena, *param, false);
                self.bind_pattern_keys(arena, *param);
                self.bind_statements_of(arena, *body);
                self.exit_scope();
            }
            Node::Identifier { name } => self.reference(name),
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.bind_node(arena, *object);
                if *computed {
                    self.bind_node(arena, *property);
                }
            }
            Node::Property {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.bind_node(arena, *key);
                }
                self.bind_node(arena, *value);
            }
            Node::LabeledStatement { body, .. } => self.bind_node(arena, *body),
            Node::BreakStatement { .. } | Node::ContinueStatement { .. } => {}
            _ => self.bind_children(arena, idx),
        }
    }

    /// Functions open one scope holding the name (for expressions), the
    /// parameters and the body's top-level declarations.
    fn bind_function(&mut self, arena: &NodeArena, idx: NodeIndex, declares_own_name: bool) {
        let Some(data) = arena.function_data(idx) else {
            return;
        };
        self.enter_scope(ScopeKind::Function, idx);
        if declares_own_name {
            self.declare_names(arena, data.id, false);
        }
        for &param in &data.params {
            self.declare_names(arena, param, false);
            self.bind_pattern_keys(arena, param);
        }
        if data.expression {
            self.bind_node(arena, data.body);
        } else {
            self.bind_statements_of(arena, data.body);
        }
        self.exit_scope();
    }

    /// Bind a block's statements in the current scope.
    fn bind_statements_of(&mut self, arena: &NodeArena, block: NodeIndex) {
        match arena.statements(block) {
            Some(body) => {
                for &stmt in body {
                    self.bind_node(arena, stmt);
                }
            }
            None => self.bind_node(arena, block),
        }
    }

    /// Computed keys inside a binding pattern are ordinary expressions.
    fn bind_pattern_keys(&mut self, arena: &NodeArena, target: NodeIndex) {
        match arena.get(target) {
            Some(Node::ArrayPattern { elements }) => {
                for &element in elements {
                    self.bind_pattern_keys(arena, element);
                }
            }
            Some(Node::ObjectPattern { properties }) => {
                for &property in properties {
                    if let Some(Node::Property {
                        key,
                        value,
                        computed,
                        ..
                    }) = arena.get(property)
                    {
                        if *computed {
                            self.bind_node(arena, *key);
                        }
                        self.bind_pattern_keys(arena, *value);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/scopes_tests.rs"]
mod tests;
