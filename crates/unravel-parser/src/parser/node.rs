//! Node definitions.
//!
//! The tree is stored in a `NodeArena` and nodes point at their children
//! through `NodeIndex`. The node set is the ESTree subset the destructuring
//! transform understands: ES5 statements and expressions plus array/object
//! patterns, arrow functions and generators.
//!
//! Every child reference is owned by exactly one parent. Rewrites that need
//! the same name twice allocate a fresh `Identifier` node for each use.

use super::base::{NodeIndex, NodeList};

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// Object literal member kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// Literal payload. `raw` keeps the source spelling when the node came from
/// a parser; synthesized literals have none and are formatted by the printer.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp { pattern: String, flags: String },
}

/// Shared shape of function declarations, function expressions and arrows.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionData {
    /// Function name, `NONE` when anonymous.
    pub id: NodeIndex,
    pub params: NodeList,
    /// A `BlockStatement`, or an expression when `expression` is set.
    pub body: NodeIndex,
    pub generator: bool,
    pub is_async: bool,
    /// Arrow function with a concise (expression) body.
    pub expression: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program {
        body: NodeList,
    },

    // Statements
    ExpressionStatement {
        expression: NodeIndex,
        /// Raw directive text (`use strict`) for prologue entries.
        directive: Option<String>,
    },
    BlockStatement {
        body: NodeList,
    },
    EmptyStatement,
    VariableDeclaration {
        kind: VarKind,
        declarations: NodeList,
    },
    VariableDeclarator {
        id: NodeIndex,
        /// `NONE` when the declarator has no initializer.
        init: NodeIndex,
    },
    FunctionDeclaration(FunctionData),
    ReturnStatement {
        argument: NodeIndex,
    },
    IfStatement {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    ForStatement {
        init: NodeIndex,
        test: NodeIndex,
        update: NodeIndex,
        body: NodeIndex,
    },
    ForInStatement {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    ForOfStatement {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    WhileStatement {
        test: NodeIndex,
        body: NodeIndex,
    },
    DoWhileStatement {
        body: NodeIndex,
        test: NodeIndex,
    },
    BreakStatement {
        label: NodeIndex,
    },
    ContinueStatement {
        label: NodeIndex,
    },
    ThrowStatement {
        argument: NodeIndex,
    },
    TryStatement {
        block: NodeIndex,
        handler: NodeIndex,
        finalizer: NodeIndex,
    },
    CatchClause {
        param: NodeIndex,
        body: NodeIndex,
    },
    LabeledStatement {
        label: NodeIndex,
        body: NodeIndex,
    },
    SwitchStatement {
        discriminant: NodeIndex,
        cases: NodeList,
    },
    SwitchCase {
        /// `NONE` for `default:`.
        test: NodeIndex,
        consequent: NodeList,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: Option<String>,
    },
    ThisExpression,
    ArrayExpression {
        /// `NONE` entries are holes.
        elements: NodeList,
    },
    ObjectExpression {
        properties: NodeList,
    },
    Property {
        key: NodeIndex,
        value: NodeIndex,
        kind: PropertyKind,
        computed: bool,
        shorthand: bool,
        method: bool,
    },
    FunctionExpression(FunctionData),
    ArrowFunctionExpression(FunctionData),
    UnaryExpression {
        operator: String,
        argument: NodeIndex,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: NodeIndex,
    },
    BinaryExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    LogicalExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    AssignmentExpression {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    ConditionalExpression {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    CallExpression {
        callee: NodeIndex,
        arguments: NodeList,
    },
    NewExpression {
        callee: NodeIndex,
        arguments: NodeList,
    },
    MemberExpression {
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
    },
    SequenceExpression {
        expressions: NodeList,
    },
    YieldExpression {
        /// `NONE` for a bare `yield`.
        argument: NodeIndex,
        delegate: bool,
    },
    SpreadElement {
        argument: NodeIndex,
    },

    // Patterns
    ArrayPattern {
        /// `NONE` entries are elided slots.
        elements: NodeList,
    },
    ObjectPattern {
        /// `Property` nodes whose `value` is the binding target.
        properties: NodeList,
    },
}

/// Arena owning every node of one program tree.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}
