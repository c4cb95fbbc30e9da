//! ESTree JSON ingestion.
//!
//! `EstreeJsonParser` accepts the JSON interchange format produced by
//! esprima/acorn-style parsers and lowers it into a `NodeArena`. Node types
//! outside the supported subset (classes, template literals, rest elements,
//! pattern defaults, ...) fail deserialization with an unknown-variant error,
//! so the rewrite engine only ever sees nodes it understands.
//!
//! Location fields (`loc`, `range`, `start`, `end`) are ignored.

use super::base::{NodeIndex, NodeList};
use super::node::{FunctionData, LiteralValue, Node, NodeArena, PropertyKind, VarKind};
use super::program::{ParseError, ProgramTree, SourceParser};
use serde::Deserialize;
use tracing::debug;

/// Parses ESTree JSON text into a `ProgramTree`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstreeJsonParser;

impl EstreeJsonParser {
    pub fn new() -> Self {
        EstreeJsonParser
    }

    /// Lower an already-decoded JSON value.
    pub fn parse_value(&self, value: serde_json::Value) -> Result<ProgramTree, ParseError> {
        let node: EsNode = serde_json::from_value(value)?;
        lower_program(node)
    }
}

impl SourceParser for EstreeJsonParser {
    fn parse(&self, source_text: &str) -> Result<ProgramTree, ParseError> {
        let node: EsNode = serde_json::from_str(source_text)?;
        lower_program(node)
    }
}

fn lower_program(node: EsNode) -> Result<ProgramTree, ParseError> {
    let body = match node {
        EsNode::Program { body } => body,
        other => return Err(ParseError::NotAProgram(other.type_name())),
    };
    let mut lowering = Lowering {
        arena: NodeArena::with_capacity(body.len() * 16),
    };
    let body = lowering.lower_list(body);
    let root = lowering.arena.add_program(body);
    debug!(nodes = lowering.arena.len(), "lowered ESTree program");
    Ok(ProgramTree::new(lowering.arena, root))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EsVarKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EsPropertyKind {
    #[default]
    Init,
    Get,
    Set,
}

#[derive(Debug, Deserialize)]
struct EsRegex {
    pattern: String,
    flags: String,
}

#[derive(Debug, Deserialize)]
struct EsFunction {
    #[serde(default)]
    id: Option<Box<EsNode>>,
    #[serde(default)]
    params: Vec<EsNode>,
    body: Box<EsNode>,
    #[serde(default)]
    generator: bool,
    #[serde(default, rename = "async")]
    is_async: bool,
    #[serde(default)]
    expression: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum EsNode {
    Program {
        body: Vec<EsNode>,
    },
    ExpressionStatement {
        expression: Box<EsNode>,
        #[serde(default)]
        directive: Option<String>,
    },
    BlockStatement {
        body: Vec<EsNode>,
    },
    EmptyStatement {},
    VariableDeclaration {
        kind: EsVarKind,
        declarations: Vec<EsNode>,
    },
    VariableDeclarator {
        id: Box<EsNode>,
        #[serde(default)]
        init: Option<Box<EsNode>>,
    },
    FunctionDeclaration(EsFunction),
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<EsNode>>,
    },
    IfStatement {
        test: Box<EsNode>,
        consequent: Box<EsNode>,
        #[serde(default)]
        alternate: Option<Box<EsNode>>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<EsNode>>,
        #[serde(default)]
        test: Option<Box<EsNode>>,
        #[serde(default)]
        update: Option<Box<EsNode>>,
        body: Box<EsNode>,
    },
    ForInStatement {
        left: Box<EsNode>,
        right: Box<EsNode>,
        body: Box<EsNode>,
    },
    ForOfStatement {
        left: Box<EsNode>,
        right: Box<EsNode>,
        body: Box<EsNode>,
    },
    WhileStatement {
        test: Box<EsNode>,
        body: Box<EsNode>,
    },
    DoWhileStatement {
        body: Box<EsNode>,
        test: Box<EsNode>,
    },
    BreakStatement {
        #[serde(default)]
        label: Option<Box<EsNode>>,
    },
    ContinueStatement {
        #[serde(default)]
        label: Option<Box<EsNode>>,
    },
    ThrowStatement {
        argument: Box<EsNode>,
    },
    TryStatement {
        block: Box<EsNode>,
        #[serde(default)]
        handler: Option<Box<EsNode>>,
        #[serde(default)]
        finalizer: Option<Box<EsNode>>,
    },
    CatchClause {
        #[serde(default)]
        param: Option<Box<EsNode>>,
        body: Box<EsNode>,
    },
    LabeledStatement {
        label: Box<EsNode>,
        body: Box<EsNode>,
    },
    SwitchStatement {
        discriminant: Box<EsNode>,
        cases: Vec<EsNode>,
    },
    SwitchCase {
        #[serde(default)]
        test: Option<Box<EsNode>>,
        consequent: Vec<EsNode>,
    },
    Identifier {
        name: String,
    },
    Literal {
        #[serde(default)]
        value: serde_json::Value,
        #[serde(default)]
        raw: Option<String>,
        #[serde(default)]
        regex: Option<EsRegex>,
    },
    ThisExpression {},
    ArrayExpression {
        elements: Vec<Option<EsNode>>,
    },
    ObjectExpression {
        properties: Vec<EsNode>,
    },
    Property {
        key: Box<EsNode>,
        value: Box<EsNode>,
        #[serde(default)]
        kind: EsPropertyKind,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        shorthand: bool,
        #[serde(default)]
        method: bool,
    },
    FunctionExpression(EsFunction),
    ArrowFunctionExpression(EsFunction),
    UnaryExpression {
        operator: String,
        argument: Box<EsNode>,
    },
    UpdateExpression {
        operator: String,
        prefix: bool,
        argument: Box<EsNode>,
    },
    BinaryExpression {
        operator: String,
        left: Box<EsNode>,
        right: Box<EsNode>,
    },
    LogicalExpression {
        operator: String,
        left: Box<EsNode>,
        right: Box<EsNode>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<EsNode>,
        right: Box<EsNode>,
    },
    ConditionalExpression {
        test: Box<EsNode>,
        consequent: Box<EsNode>,
        alternate: Box<EsNode>,
    },
    CallExpression {
        callee: Box<EsNode>,
        #[serde(default)]
        arguments: Vec<EsNode>,
    },
    NewExpression {
        callee: Box<EsNode>,
        #[serde(default)]
        arguments: Vec<EsNode>,
    },
    MemberExpression {
        object: Box<EsNode>,
        property: Box<EsNode>,
        #[serde(default)]
        computed: bool,
    },
    SequenceExpression {
        expressions: Vec<EsNode>,
    },
    YieldExpression {
        #[serde(default)]
        argument: Option<Box<EsNode>>,
        #[serde(default)]
        delegate: bool,
    },
    SpreadElement {
        argument: Box<EsNode>,
    },
    ArrayPattern {
        elements: Vec<Option<EsNode>>,
    },
    ObjectPattern {
        properties: Vec<EsNode>,
    },
}

impl EsNode {
    fn type_name(&self) -> &'static str {
        match self {
            EsNode::Program { .. } => "Program",
            EsNode::ExpressionStatement { .. } => "ExpressionStatement",
            EsNode::BlockStatement { .. } => "BlockStatement",
            EsNode::FunctionDeclaration(_) => "FunctionDeclaration",
            EsNode::VariableDeclaration { .. } => "VariableDeclaration",
            EsNode::Identifier { .. } => "Identifier",
            EsNode::Literal { .. } => "Literal",
            _ => "a non-program node",
        }
    }
}

struct Lowering {
    arena: NodeArena,
}

impl Lowering {
    fn lower_list(&mut self, nodes: Vec<EsNode>) -> NodeList {
        nodes.into_iter().map(|node| self.lower(node)).collect()
    }

    fn lower_holes(&mut self, nodes: Vec<Option<EsNode>>) -> NodeList {
        nodes.into_iter().map(|node| self.lower_opt(node)).collect()
    }

    fn lower_opt(&mut self, node: Option<EsNode>) -> NodeIndex {
        match node {
            Some(node) => self.lower(node),
            None => NodeIndex::NONE,
        }
    }

    fn lower_boxed_opt(&mut self, node: Option<Box<EsNode>>) -> NodeIndex {
        self.lower_opt(node.map(|boxed| *boxed))
    }

    fn lower_box(&mut self, node: Box<EsNode>) -> NodeIndex {
        self.lower(*node)
    }

    fn lower_function(&mut self, function: EsFunction) -> FunctionData {
        FunctionData {
            id: self.lower_boxed_opt(function.id),
            params: self.lower_list(function.params),
            body: self.lower_box(function.body),
            generator: function.generator,
            is_async: function.is_async,
            expression: function.expression,
        }
    }

    fn lower(&mut self, node: EsNode) -> NodeIndex {
        let lowered = match node {
            EsNode::Program { body } => Node::Program {
                body: self.lower_list(body),
            },
            EsNode::ExpressionStatement {
                expression,
                directive,
            } => Node::ExpressionStatement {
                expression: self.lower_box(expression),
                directive,
            },
            EsNode::BlockStatement { body } => Node::BlockStatement {
                body: self.lower_list(body),
            },
            EsNode::EmptyStatement {} => Node::EmptyStatement,
            EsNode::VariableDeclaration { kind, declarations } => Node::VariableDeclaration {
                kind: match kind {
                    EsVarKind::Var => VarKind::Var,
                    EsVarKind::Let => VarKind::Let,
                    EsVarKind::Const => VarKind::Const,
                },
                declarations: self.lower_list(declarations),
            },
            EsNode::VariableDeclarator { id, init } => Node::VariableDeclarator {
                id: self.lower_box(id),
                init: self.lower_boxed_opt(init),
            },
            EsNode::FunctionDeclaration(function) => Node::FunctionDeclaration(self.lower_function(function)),
            EsNode::ReturnStatement { argument } => Node::ReturnStatement {
                argument: self.lower_boxed_opt(argument),
            },
            EsNode::IfStatement {
                test,
                consequent,
                alternate,
            } => Node::IfStatement {
                test: self.lower_box(test),
                consequent: self.lower_box(consequent),
                alternate: self.lower_boxed_opt(alternate),
            },
            EsNode::ForStatement {
                init,
                test,
                update,
                body,
            } => Node::ForStatement {
                init: self.lower_boxed_opt(init),
                test: self.lower_boxed_opt(test),
                update: self.lower_boxed_opt(update),
                body: self.lower_box(body),
            },
            EsNode::ForInStatement { left, right, body } => Node::ForInStatement {
                left: self.lower_box(left),
                right: self.lower_box(right),
                body: self.lower_box(body),
            },
            EsNode::ForOfStatement { left, right, body } => Node::ForOfStatement {
                left: self.lower_box(left),
                right: self.lower_box(right),
                body: self.lower_box(body),
            },
            EsNode::WhileStatement { test, body } => Node::WhileStatement {
                test: self.lower_box(test),
                body: self.lower_box(body),
            },
            EsNode::DoWhileStatement { body, test } => Node::DoWhileStatement {
                body: self.lower_box(body),
                test: self.lower_box(test),
            },
            EsNode::BreakStatement { label } => Node::BreakStatement {
                label: self.lower_boxed_opt(label),
            },
            EsNode::ContinueStatement { label } => Node::ContinueStatement {
                label: self.lower_boxed_opt(label),
            },
            EsNode::ThrowStatement { argument } => Node::ThrowStatement {
                argument: self.lower_box(argument),
            },
            EsNode::TryStatement {
                block,
                handler,
                finalizer,
            } => Node::TryStatement {
                block: self.lower_box(block),
                handler: self.lower_boxed_opt(handler),
                finalizer: self.lower_boxed_opt(finalizer),
            },
            EsNode::CatchClause { param, body } => Node::CatchClause {
                param: self.lower_boxed_opt(param),
                body: self.lower_box(body),
            },
            EsNode::LabeledStatement { label, body } => Node::LabeledStatement {
                label: self.lower_box(label),
                body: self.lower_box(body),
            },
            EsNode::SwitchStatement {
                discriminant,
                cases,
            } => Node::SwitchStatement {
                discriminant: self.lower_box(discriminant),
                cases: self.lower_list(cases),
            },
            EsNode::SwitchCase { test, consequent } => Node::SwitchCase {
                test: self.lower_boxed_opt(test),
                consequent: self.lower_list(consequent),
            },
            EsNode::Identifier { name } => Node::Identifier { name },
            EsNode::Literal { value, raw, regex } => Node::Literal {
                value: literal_value(value, regex),
                raw,
            },
            EsNode::ThisExpression {} => Node::ThisExpression,
            EsNode::ArrayExpression { elements } => Node::ArrayExpression {
                elements: self.lower_holes(elements),
            },
            EsNode::ObjectExpression { properties } => Node::ObjectExpression {
                properties: self.lower_list(properties),
            },
            EsNode::Property {
                key,
                value,
                kind,
                computed,
                shorthand,
                method,
            } => Node::Property {
                key: self.lower_box(key),
                value: self.lower_box(value),
                kind: match kind {
                    EsPropertyKind::Init => PropertyKind::Init,
                    EsPropertyKind::Get => PropertyKind::Get,
                    EsPropertyKind::Set => PropertyKind::Set,
                },
                computed,
                shorthand,
                method,
            },
            EsNode::FunctionExpression(function) => Node::FunctionExpression(self.lower_function(function)),
            EsNode::ArrowFunctionExpression(function) => {
                Node::ArrowFunctionExpression(self.lower_function(function))
            }
            EsNode::UnaryExpression { operator, argument } => Node::UnaryExpression {
                operator,
                argument: self.lower_box(argument),
            },
            EsNode::UpdateExpression {
                operator,
                prefix,
                argument,
            } => Node::UpdateExpression {
                operator,
                prefix,
                argument: self.lower_box(argument),
            },
            EsNode::BinaryExpression {
                operator,
                left,
                right,
            } => Node::BinaryExpression {
                operator,
                left: self.lower_box(left),
                right: self.lower_box(right),
            },
            EsNode::LogicalExpression {
                operator,
                left,
                right,
            } => Node::LogicalExpression {
                operator,
                left: self.lower_box(left),
                right: self.lower_box(right),
            },
            EsNode::AssignmentExpression {
                operator,
                left,
                right,
            } => Node::AssignmentExpression {
                operator,
                left: self.lower_box(left),
                right: self.lower_box(right),
            },
            EsNode::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => Node::ConditionalExpression {
                test: self.lower_box(test),
                consequent: self.lower_box(consequent),
                alternate: self.lower_box(alternate),
            },
            EsNode::CallExpression { callee, arguments } => Node::CallExpression {
                callee: self.lower_box(callee),
                arguments: self.lower_list(arguments),
            },
            EsNode::NewExpression { callee, arguments } => Node::NewExpression {
                callee: self.lower_box(callee),
                arguments: self.lower_list(arguments),
            },
            EsNode::MemberExpression {
                object,
                property,
                computed,
            } => Node::MemberExpression {
                object: self.lower_box(object),
                property: self.lower_box(property),
                computed,
            },
            EsNode::SequenceExpression { expressions } => Node::SequenceExpression {
                expressions: self.lower_list(expressions),
            },
            EsNode::YieldExpression { argument, delegate } => Node::YieldExpression {
                argument: self.lower_boxed_opt(argument),
                delegate,
            },
            EsNode::SpreadElement { argument } => Node::SpreadElement {
                argument: self.lower_box(argument),
            },
            EsNode::ArrayPattern { elements } => Node::ArrayPattern {
                elements: self.lower_holes(elements),
            },
            EsNode::ObjectPattern { properties } => Node::ObjectPattern {
                properties: self.lower_list(properties),
            },
        };
        self.arena.add(lowered)
    }
}

fn literal_value(value: serde_json::Value, regex: Option<EsRegex>) -> LiteralValue {
    if let Some(EsRegex { pattern, flags }) = regex {
        return LiteralValue::RegExp { pattern, flags };
    }
    match value {
        serde_json::Value::Bool(b) => LiteralValue::Boolean(b),
        serde_json::Value::Number(n) => LiteralValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => LiteralValue::String(s),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            LiteralValue::Null
        }
    }
}
