//! NodeArena creation methods (add_* methods).
//!
//! Builders return the index of the freshly allocated node. They never look
//! at the children they are handed; callers are responsible for passing
//! nodes that are not already owned by another parent.

use super::base::{NodeIndex, NodeList};
use super::node::*;

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow on huge inputs.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(Self::MAX_NODE_PREALLOC)),
        }
    }

    /// Allocate a node and return its index.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    pub fn add_program(&mut self, body: NodeList) -> NodeIndex {
        self.add(Node::Program { body })
    }

    pub fn add_identifier(&mut self, name: impl Into<String>) -> NodeIndex {
        self.add(Node::Identifier { name: name.into() })
    }

    pub fn add_this(&mut self) -> NodeIndex {
        self.add(Node::ThisExpression)
    }

    /// Synthesized numeric literal (printed without a raw spelling).
    pub fn add_number(&mut self, value: f64) -> NodeIndex {
        self.add(Node::Literal {
            value: LiteralValue::Number(value),
            raw: None,
        })
    }

    pub fn add_string(&mut self, value: impl Into<String>) -> NodeIndex {
        self.add(Node::Literal {
            value: LiteralValue::String(value.into()),
            raw: None,
        })
    }

    pub fn add_null(&mut self) -> NodeIndex {
        self.add(Node::Literal {
            value: LiteralValue::Null,
            raw: None,
        })
    }

    /// `void 0`, the canonical spelling of `undefined`.
    pub fn add_void_zero(&mut self) -> NodeIndex {
        let zero = self.add_number(0.0);
        self.add(Node::UnaryExpression {
            operator: "void".to_string(),
            argument: zero,
        })
    }

    pub fn add_member(&mut self, object: NodeIndex, property: NodeIndex, computed: bool) -> NodeIndex {
        self.add(Node::MemberExpression {
            object,
            property,
            computed,
        })
    }

    /// `object[index]`
    pub fn add_element_access(&mut self, object: NodeIndex, index: usize) -> NodeIndex {
        let property = self.add_number(index as f64);
        self.add_member(object, property, true)
    }

    /// `object.name`
    pub fn add_property_access(&mut self, object: NodeIndex, name: &str) -> NodeIndex {
        let property = self.add_identifier(name);
        self.add_member(object, property, false)
    }

    /// `left = right`
    pub fn add_assignment(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(Node::AssignmentExpression {
            operator: "=".to_string(),
            left,
            right,
        })
    }

    pub fn add_sequence(&mut self, expressions: NodeList) -> NodeIndex {
        self.add(Node::SequenceExpression { expressions })
    }

    pub fn add_declarator(&mut self, id: NodeIndex, init: NodeIndex) -> NodeIndex {
        self.add(Node::VariableDeclarator { id, init })
    }

    pub fn add_variable_declaration(&mut self, kind: VarKind, declarations: NodeList) -> NodeIndex {
        self.add(Node::VariableDeclaration { kind, declarations })
    }

    pub fn add_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::ExpressionStatement {
            expression,
            directive: None,
        })
    }

    pub fn add_return(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(Node::ReturnStatement { argument })
    }

    pub fn add_block(&mut self, body: NodeList) -> NodeIndex {
        self.add(Node::BlockStatement { body })
    }

    /// Copy the subtree rooted at `index` into fresh nodes.
    ///
    /// Used when a rewrite needs a second copy of a side-effect free
    /// expression (an identifier or `this`) without sharing nodes.
    pub fn deep_clone(&mut self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index).cloned() else {
            return NodeIndex::NONE;
        };
        let cloned = self.clone_children(node);
        self.add(cloned)
    }

    fn clone_list(&mut self, items: NodeList) -> NodeList {
        items.into_iter().map(|idx| self.deep_clone(idx)).collect()
    }

    fn clone_children(&mut self, node: Node) -> Node {
        match node {
            Node::Program { body } => Node::Program {
                body: self.clone_list(body),
            },
            Node::ExpressionStatement {
                expression,
                directive,
            } => Node::ExpressionStatement {
                expression: self.deep_clone(expression),
                directive,
            },
            Node::BlockStatement { body } => Node::BlockStatement {
                body: self.clone_list(body),
            },
            Node::VariableDeclaration { kind, declarations } => Node::VariableDeclaration {
                kind,
                declarations: self.clone_list(declarations),
            },
            Node::VariableDeclarator { id, init } => Node::VariableDeclarator {
                id: self.deep_clone(id),
                init: self.deep_clone(init),
            },
            Node::FunctionDeclaration(data) => Node::FunctionDeclaration(self.clone_function(data)),
            Node::FunctionExpression(data) => Node::FunctionExpression(self.clone_function(data)),
            Node::ArrowFunctionExpression(data) => {
                Node::ArrowFunctionExpression(self.clone_function(data))
            }
            Node::ReturnStatement { argument } => Node::ReturnStatement {
                argument: self.deep_clone(argument),
            },
            Node::IfStatement {
                test,
                consequent,
                alternate,
            } => Node::IfStatement {
                test: self.deep_clone(test),
                consequent: self.deep_clone(consequent),
                alternate: self.deep_clone(alternate),
            },
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => Node::ForStatement {
                init: self.deep_clone(init),
                test: self.deep_clone(test),
                update: self.deep_clone(update),
                body: self.deep_clone(body),
            },
            Node::ForInStatement { left, right, body } => Node::ForInStatement {
                left: self.deep_clone(left),
                right: self.deep_clone(right),
                body: self.deep_clone(body),
            },
            Node::ForOfStatement { left, right, body } => Node::ForOfStatement {
                left: self.deep_clone(left),
                right: self.deep_clone(right),
                body: self.deep_clone(body),
            },
            Node::WhileStatement { test, body } => Node::WhileStatement {
                test: self.deep_clone(test),
                body: self.deep_clone(body),
            },
            Node::DoWhileStatement { body, test } => Node::DoWhileStatement {
                body: self.deep_clone(body),
                test: self.deep_clone(test),
            },
            Node::BreakStatement { label } => Node::BreakStatement {
                label: self.deep_clone(label),
            },
            Node::ContinueStatement { label } => Node::ContinueStatement {
                label: self.deep_clone(label),
            },
            Node::ThrowStatement { argument } => Node::ThrowStatement {
                argument: self.deep_clone(argument),
            },
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => Node::TryStatement {
                block: self.deep_clone(block),
                handler: self.deep_clone(handler),
                finalizer: self.deep_clone(finalizer),
            },
            Node::CatchClause { param, body } => Node::CatchClause {
                param: self.deep_clone(param),
                body: self.deep_clone(body),
            },
            Node::LabeledStatement { label, body } => Node::LabeledStatement {
                label: self.deep_clone(label),
                body: self.deep_clone(body),
            },
            Node::SwitchStatement {
                discriminant,
                cases,
            } => Node::SwitchStatement {
                discriminant: self.deep_clone(discriminant),
                cases: self.clone_list(cases),
            },
            Node::SwitchCase { test, consequent } => Node::SwitchCase {
                test: self.deep_clone(test),
                consequent: self.clone_list(consequent),
            },
            Node::ArrayExpression { elements } => Node::ArrayExpression {
                elements: self.clone_list(elements),
            },
            Node::ObjectExpression { properties } => Node::ObjectExpression {
                properties: self.clone_list(properties),
            },
            Node::Property {
                key,
                value,
                kind,
                computed,
                shorthand,
                method,
            } => Node::Property {
                key: self.deep_clone(key),
                value: self.deep_clone(value),
                kind,
                computed,
                shorthand,
                method,
            },
            Node::UnaryExpression { operator, argument } => Node::UnaryExpression {
                operator,
                argument: self.deep_clone(argument),
            },
            Node::UpdateExpression {
                operator,
                prefix,
                argument,
            } => Node::UpdateExpression {
                operator,
                prefix,
                argument: self.deep_clone(argument),
            },
            Node::BinaryExpression {
                operator,
                left,
                right,
            } => Node::BinaryExpression {
                operator,
                left: self.deep_clone(left),
                right: self.deep_clone(right),
            },
            Node::LogicalExpression {
                operator,
                left,
                right,
            } => Node::LogicalExpression {
                operator,
                left: self.deep_clone(left),
                right: self.deep_clone(right),
            },
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => Node::AssignmentExpression {
                operator,
                left: self.deep_clone(left),
                right: self.deep_clone(right),
            },
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => Node::ConditionalExpression {
                test: self.deep_clone(test),
                consequent: self.deep_clone(consequent),
                alternate: self.deep_clone(alternate),
            },
            Node::CallExpression { callee, arguments } => Node::CallExpression {
                callee: self.deep_clone(callee),
                arguments: self.clone_list(arguments),
            },
            Node::NewExpression { callee, arguments } => Node::NewExpression {
                callee: self.deep_clone(callee),
                arguments: self.clone_list(arguments),
            },
            Node::MemberExpression {
                object,
                property,
                computed,
            } => Node::MemberExpression {
                object: self.deep_clone(object),
                property: self.deep_clone(property),
                computed,
            },
            Node::SequenceExpression { expressions } => Node::SequenceExpression {
                expressions: self.clone_list(expressions),
            },
            Node::YieldExpression { argument, delegate } => Node::YieldExpression {
                argument: self.deep_clone(argument),
                delegate,
            },
            Node::SpreadElement { argument } => Node::SpreadElement {
                argument: self.deep_clone(argument),
            },
            Node::ArrayPattern { elements } => Node::ArrayPattern {
                elements: self.clone_list(elements),
            },
            Node::ObjectPattern { properties } => Node::ObjectPattern {
                properties: self.clone_list(properties),
            },
            leaf @ (Node::EmptyStatement
            | Node::Identifier { .. }
            | Node::Literal { .. }
            | Node::ThisExpression) => leaf,
        }
    }

    fn clone_function(&mut self, data: FunctionData) -> FunctionData {
        FunctionData {
            id: self.deep_clone(data.id),
            params: self.clone_list(data.params),
            body: self.deep_clone(data.body),
            ..data
        }
    }
}
