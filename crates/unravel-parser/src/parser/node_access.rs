//! NodeArena access methods: lookup, in-place replacement, child enumeration
//! and small typed accessors.

use super::base::{NodeIndex, NodeList};
use super::node::*;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Overwrite the node stored at `index`, returning the previous node.
    ///
    /// Every parent pointing at `index` now sees `node`; this is how a
    /// single replacement is installed without touching the parent.
    pub fn replace(&mut self, index: NodeIndex, node: Node) -> Option<Node> {
        self.get_mut(index).map(|slot| std::mem::replace(slot, node))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name of an `Identifier` node.
    #[inline]
    pub fn identifier_name(&self, index: NodeIndex) -> Option<&str> {
        match self.get(index)? {
            Node::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Function data of a function declaration, function expression or arrow.
    pub fn function_data(&self, index: NodeIndex) -> Option<&FunctionData> {
        match self.get(index)? {
            Node::FunctionDeclaration(data)
            | Node::FunctionExpression(data)
            | Node::ArrowFunctionExpression(data) => Some(data),
            _ => None,
        }
    }

    pub fn function_data_mut(&mut self, index: NodeIndex) -> Option<&mut FunctionData> {
        match self.get_mut(index)? {
            Node::FunctionDeclaration(data)
            | Node::FunctionExpression(data)
            | Node::ArrowFunctionExpression(data) => Some(data),
            _ => None,
        }
    }

    /// Statement list of a `Program` or `BlockStatement`.
    pub fn statements_mut(&mut self, index: NodeIndex) -> Option<&mut NodeList> {
        match self.get_mut(index)? {
            Node::Program { body } | Node::BlockStatement { body } => Some(body),
            _ => None,
        }
    }

    pub fn statements(&self, index: NodeIndex) -> Option<&NodeList> {
        match self.get(index)? {
            Node::Program { body } | Node::BlockStatement { body } => Some(body),
            _ => None,
        }
    }

    /// Direct children of a node in source (evaluation) order, skipping
    /// absent children.
    pub fn children(&self, index: NodeIndex) -> NodeList {
        let Some(node) = self.get(index) else {
            return NodeList::new();
        };
        let mut out = NodeList::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match node {
            Node::Program { body } | Node::BlockStatement { body } => body.iter().copied().for_each(push),
            Node::ExpressionStatement { expression, .. } => push(*expression),
            Node::VariableDeclaration { declarations, .. } => {
                declarations.iter().copied().for_each(push)
            }
            Node::VariableDeclarator { id, init } => {
                push(*id);
                push(*init);
            }
            Node::FunctionDeclaration(data)
            | Node::FunctionExpression(data)
            | Node::ArrowFunctionExpression(data) => {
                push(data.id);
                data.params.iter().copied().for_each(&mut push);
                push(data.body);
            }
            Node::ReturnStatement { argument }
            | Node::ThrowStatement { argument }
            | Node::SpreadElement { argument }
            | Node::UnaryExpression { argument, .. }
            | Node::UpdateExpression { argument, .. }
            | Node::YieldExpression { argument, .. } => push(*argument),
            Node::IfStatement {
                test,
                consequent,
                alternate,
            }
            | Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                push(*test);
                push(*consequent);
                push(*alternate);
            }
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                push(*init);
                push(*test);
                push(*update);
                push(*body);
            }
            Node::ForInStatement { left, right, body } | Node::ForOfStatement { left, right, body } => {
                push(*left);
                push(*right);
                push(*body);
            }
            Node::WhileStatement { test, body } => {
                push(*test);
                push(*body);
            }
            Node::DoWhileStatement { body, test } => {
                push(*body);
                push(*test);
            }
            Node::BreakStatement { label } | Node::ContinueStatement { label } => push(*label),
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                push(*block);
                push(*handler);
                push(*finalizer);
            }
            Node::CatchClause { param, body } => {
                push(*param);
                push(*body);
            }
            Node::LabeledStatement { label, body } => {
                push(*label);
                push(*body);
            }
            Node::SwitchStatement {
                discriminant,
                cases,
            } => {
                push(*discriminant);
                cases.iter().copied().for_each(push);
            }
            Node::SwitchCase { test, consequent } => {
                push(*test);
                consequent.iter().copied().for_each(push);
            }
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => {
                elements.iter().copied().for_each(push)
            }
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                properties.iter().copied().for_each(push)
            }
            Node::Property { key, value, .. } => {
                push(*key);
                push(*value);
            }
            Node::BinaryExpression { left, right, .. }
            | Node::LogicalExpression { left, right, .. }
            | Node::AssignmentExpression { left, right, .. } => {
                push(*left);
                push(*right);
            }
            Node::CallExpression { callee, arguments } | Node::NewExpression { callee, arguments } => {
                push(*callee);
                arguments.iter().copied().for_each(push);
            }
            Node::MemberExpression {
                object, property, ..
            } => {
                push(*object);
                push(*property);
            }
            Node::SequenceExpression { expressions } => expressions.iter().copied().for_each(push),
            Node::EmptyStatement | Node::Identifier { .. } | Node::Literal { .. } | Node::ThisExpression => {}
        }
        out
    }
}

impl Node {
    /// ESTree `type` name, used in logs and error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::ExpressionStatement { .. } => "ExpressionStatement",
            Node::BlockStatement { .. } => "BlockStatement",
            Node::EmptyStatement => "EmptyStatement",
            Node::VariableDeclaration { .. } => "VariableDeclaration",
            Node::VariableDeclarator { .. } => "VariableDeclarator",
            Node::FunctionDeclaration(_) => "FunctionDeclaration",
            Node::ReturnStatement { .. } => "ReturnStatement",
            Node::IfStatement { .. } => "IfStatement",
            Node::ForStatement { .. } => "ForStatement",
            Node::ForInStatement { .. } => "ForInStatement",
            Node::ForOfStatement { .. } => "ForOfStatement",
            Node::WhileStatement { .. } => "WhileStatement",
            Node::DoWhileStatement { .. } => "DoWhileStatement",
            Node::BreakStatement { .. } => "BreakStatement",
            Node::ContinueStatement { .. } => "ContinueStatement",
            Node::ThrowStatement { .. } => "ThrowStatement",
            Node::TryStatement { .. } => "TryStatement",
            Node::CatchClause { .. } => "CatchClause",
            Node::LabeledStatement { .. } => "LabeledStatement",
            Node::SwitchStatement { .. } => "SwitchStatement",
            Node::SwitchCase { .. } => "SwitchCase",
            Node::Identifier { .. } => "Identifier",
            Node::Literal { .. } => "Literal",
            Node::ThisExpression => "ThisExpression",
            Node::ArrayExpression { .. } => "ArrayExpression",
            Node::ObjectExpression { .. } => "ObjectExpression",
            Node::Property { .. } => "Property",
            Node::FunctionExpression(_) => "FunctionExpression",
            Node::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::UpdateExpression { .. } => "UpdateExpression",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::LogicalExpression { .. } => "LogicalExpression",
            Node::AssignmentExpression { .. } => "AssignmentExpression",
            Node::ConditionalExpression { .. } => "ConditionalExpression",
            Node::CallExpression { .. } => "CallExpression",
            Node::NewExpression { .. } => "NewExpression",
            Node::MemberExpression { .. } => "MemberExpression",
            Node::SequenceExpression { .. } => "SequenceExpression",
            Node::YieldExpression { .. } => "YieldExpression",
            Node::SpreadElement { .. } => "SpreadElement",
            Node::ArrayPattern { .. } => "ArrayPattern",
            Node::ObjectPattern { .. } => "ObjectPattern",
        }
    }

    /// `ArrayPattern` or `ObjectPattern`.
    #[inline]
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Node::ArrayPattern { .. } | Node::ObjectPattern { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_function_like(&self) -> bool {
        matches!(
            self,
            Node::FunctionDeclaration(_) | Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_)
        )
    }
}
