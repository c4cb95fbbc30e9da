//! Recursive-descent parser for the JavaScript test subset.
//!
//! Covers ES5 statements and expressions plus array/object destructuring
//! (declarations, assignments, parameters), arrow functions and generators.
//! Automatic semicolon insertion is supported at line breaks, before `}` and
//! at end of input. Regular expression literals, classes, templates, rest
//! elements and pattern defaults are rejected with a syntax error.

use crate::lexer::{Token, TokenKind, tokenize};
use unravel_parser::parser::{FunctionData, LiteralValue, Node, NodeArena, NodeIndex, NodeList, PropertyKind, VarKind};
use unravel_parser::{ParseError, ProgramTree, SourceParser};

/// Parses JavaScript source text into a `ProgramTree`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceTextParser;

impl SourceParser for SourceTextParser {
    fn parse(&self, source_text: &str) -> Result<ProgramTree, ParseError> {
        let tokens = tokenize(source_text)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            arena: NodeArena::new(),
            no_in: false,
        };
        let mut body = NodeList::new();
        let mut in_prologue = true;
        while !parser.at_eof() {
            let stmt = parser.parse_statement()?;
            in_prologue = in_prologue && parser.mark_directive(stmt);
            body.push(stmt);
        }
        let root = parser.arena.add_program(body);
        Ok(ProgramTree::new(parser.arena, root))
    }
}

type ParseResult<T> = Result<T, ParseError>;

const RESERVED: &[&str] = &[
    "break", "case", "catch", "const", "continue", "default", "delete", "do", "else", "false", "finally",
    "for", "function", "if", "in", "instanceof", "let", "new", "null", "return", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while",
];

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
];

fn binary_precedence(op: &str) -> Option<u8> {
    Some(match op {
        "||" | "??" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" | "===" | "!==" => 6,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        "**" => 11,
        _ => return None,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: NodeArena,
    /// Inside a `for` head, where `in` starts a for-in loop.
    no_in: bool,
}

impl Parser {
    // ---------------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------------

    fn token_at(&self, ahead: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + ahead).min(last)]
    }

    fn current(&self) -> &Token {
        self.token_at(0)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn is_punct_at(&self, ahead: usize, punct: &str) -> bool {
        matches!(&self.token_at(ahead).kind, TokenKind::Punct(p) if *p == punct)
    }

    fn is_punct(&self, punct: &str) -> bool {
        self.is_punct_at(0, punct)
    }

    fn is_name(&self, name: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Name(n) if n == name)
    }

    fn current_name(&self) -> Option<String> {
        match &self.current().kind {
            TokenKind::Name(n) => Some(n.clone()),
            _ => None,
        }
    }

    fn current_punct(&self) -> Option<&'static str> {
        match self.current().kind {
            TokenKind::Punct(p) => Some(p),
            _ => None,
        }
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.is_punct(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_name(&mut self, name: &str) -> bool {
        if self.is_name(name) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(ParseError::Syntax {
            message: message.into(),
            offset: self.current().offset,
        })
    }

    fn expect_punct(&mut self, punct: &str) -> ParseResult<()> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            self.error(format!("expected `{punct}`, found {:?}", self.current().kind))
        }
    }

    fn expect_name(&mut self, name: &str) -> ParseResult<()> {
        if self.eat_name(name) {
            Ok(())
        } else {
            self.error(format!("expected `{name}`, found {:?}", self.current().kind))
        }
    }

    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat_punct(";") || self.is_punct("}") || self.at_eof() || self.current().newline_before {
            Ok(())
        } else {
            self.error(format!("expected `;`, found {:?}", self.current().kind))
        }
    }

    fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        match self.current_name() {
            Some(name) if !RESERVED.contains(&name.as_str()) => {
                self.bump();
                Ok(self.arena.add_identifier(name))
            }
            _ => self.error(format!("expected identifier, found {:?}", self.current().kind)),
        }
    }

    /// Record a directive if `stmt` is a string-literal expression statement.
    fn mark_directive(&mut self, stmt: NodeIndex) -> bool {
        let Some(Node::ExpressionStatement { expression, .. }) = self.arena.get(stmt) else {
            return false;
        };
        let Some(Node::Literal {
            value: LiteralValue::String(_),
            raw: Some(raw),
        }) = self.arena.get(*expression)
        else {
            return false;
        };
        let text = raw[1..raw.len() - 1].to_string();
        if let Some(Node::ExpressionStatement { directive, .. }) = self.arena.get_mut(stmt) {
            *directive = Some(text);
        }
        true
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        if self.is_punct("{") {
            return self.parse_block(false);
        }
        if self.eat_punct(";") {
            return Ok(self.arena.add(Node::EmptyStatement));
        }
        let name = self.current_name();
        match name.as_deref() {
            Some("var" | "let" | "const") => {
                let decl = self.parse_var_declaration()?;
                self.consume_semicolon()?;
                Ok(decl)
            }
            Some("function") => {
                let data = self.parse_function()?;
                Ok(self.arena.add(Node::FunctionDeclaration(data)))
            }
            Some("return") => {
                self.bump();
                let argument = if self.is_punct(";") || self.is_punct("}") || self.at_eof() || self.current().newline_before
                {
                    NodeIndex::NONE
                } else {
                    self.parse_expression()?
                };
                self.consume_semicolon()?;
                Ok(self.arena.add_return(argument))
            }
            Some("if") => self.parse_if(),
            Some("for") => self.parse_for(),
            Some("while") => {
                self.bump();
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                Ok(self.arena.add(Node::WhileStatement { test, body }))
            }
            Some("do") => {
                self.bump();
                let body = self.parse_statement()?;
                self.expect_name("while")?;
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                self.eat_punct(";");
                Ok(self.arena.add(Node::DoWhileStatement { body, test }))
            }
            Some(keyword @ ("break" | "continue")) => {
                let is_break = keyword == "break";
                self.bump();
                let label = if !self.current().newline_before
                    && self.current_name().is_some_and(|n| !RESERVED.contains(&n.as_str()))
                {
                    self.parse_identifier()?
                } else {
                    NodeIndex::NONE
                };
                self.consume_semicolon()?;
                Ok(self.arena.add(if is_break {
                    Node::BreakStatement { label }
                } else {
                    Node::ContinueStatement { label }
                }))
            }
            Some("throw") => {
                self.bump();
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.arena.add(Node::ThrowStatement { argument }))
            }
            Some("try") => self.parse_try(),
            Some("switch") => self.parse_switch(),
            Some(label) if !RESERVED.contains(&label) && self.is_punct_at(1, ":") => {
                let label = self.parse_identifier()?;
                self.expect_punct(":")?;
                let body = self.parse_statement()?;
                Ok(self.arena.add(Node::LabeledStatement { label, body }))
            }
            _ => {
                let expression = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.arena.add_expression_statement(expression))
            }
        }
    }

    fn parse_block(&mut self, directives: bool) -> ParseResult<NodeIndex> {
        self.expect_punct("{")?;
        let mut body = NodeList::new();
        let mut in_prologue = directives;
        while !self.eat_punct("}") {
            if self.at_eof() {
                return self.error("unterminated block");
            }
            let stmt = self.parse_statement()?;
            in_prologue = in_prologue && self.mark_directive(stmt);
            body.push(stmt);
        }
        Ok(self.arena.add_block(body))
    }

    fn parse_var_declaration(&mut self) -> ParseResult<NodeIndex> {
        let kind = match self.current_name().as_deref() {
            Some("let") => VarKind::Let,
            Some("const") => VarKind::Const,
            _ => VarKind::Var,
        };
        self.bump();
        let mut declarations = NodeList::new();
        loop {
            let id = self.parse_binding_target()?;
            let init = if self.eat_punct("=") {
                self.parse_assignment()?
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.arena.add_declarator(id, init));
            if !self.eat_punct(",") {
                break;
            }
        }
        Ok(self.arena.add_variable_declaration(kind, declarations))
    }

    fn parse_if(&mut self) -> ParseResult<NodeIndex> {
        self.bump();
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat_name("else") {
            self.parse_statement()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.arena.add(Node::IfStatement {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_for(&mut self) -> ParseResult<NodeIndex> {
        self.bump();
        self.expect_punct("(")?;
        let mut init = NodeIndex::NONE;
        if !self.is_punct(";") {
            let saved = std::mem::replace(&mut self.no_in, true);
            let head = if self.is_name("var") || self.is_name("let") || self.is_name("const") {
                self.parse_var_declaration()
            } else {
                self.parse_expression()
            };
            self.no_in = saved;
            init = head?;

            if self.is_name("in") || self.is_name("of") {
                let is_of = self.is_name("of");
                self.bump();
                let left = if matches!(self.arena.get(init), Some(Node::VariableDeclaration { .. })) {
                    init
                } else {
                    self.to_assignment_target(init)?
                };
                let right = if is_of {
                    self.parse_assignment()?
                } else {
                    self.parse_expression()?
                };
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                return Ok(self.arena.add(if is_of {
                    Node::ForOfStatement { left, right, body }
                } else {
                    Node::ForInStatement { left, right, body }
                }));
            }
        }
        self.expect_punct(";")?;
        let test = if self.is_punct(";") {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        self.expect_punct(";")?;
        let update = if self.is_punct(")") {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        Ok(self.arena.add(Node::ForStatement {
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_try(&mut self) -> ParseResult<NodeIndex> {
        self.bump();
        let block = self.parse_block(false)?;
        let mut handler = NodeIndex::NONE;
        if self.eat_name("catch") {
            let param = if self.eat_punct("(") {
                let param = self.parse_binding_target()?;
                self.expect_punct(")")?;
                param
            } else {
                NodeIndex::NONE
            };
            let body = self.parse_block(false)?;
            handler = self.arena.add(Node::CatchClause { param, body });
        }
        let finalizer = if self.eat_name("finally") {
            self.parse_block(false)?
        } else {
            NodeIndex::NONE
        };
        if handler.is_none() && finalizer.is_none() {
            return self.error("try statement needs catch or finally");
        }
        Ok(self.arena.add(Node::TryStatement {
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_switch(&mut self) -> ParseResult<NodeIndex> {
        self.bump();
        self.expect_punct("(")?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;
        let mut cases = NodeList::new();
        while !self.eat_punct("}") {
            let test = if self.eat_name("case") {
                self.parse_expression()?
            } else {
                self.expect_name("default")?;
                NodeIndex::NONE
            };
            self.expect_punct(":")?;
            let mut consequent = NodeList::new();
            while !(self.is_name("case") || self.is_name("default") || self.is_punct("}")) {
                if self.at_eof() {
                    return self.error("unterminated switch");
                }
                consequent.push(self.parse_statement()?);
            }
            cases.push(self.arena.add(Node::SwitchCase { test, consequent }));
        }
        Ok(self.arena.add(Node::SwitchStatement {
            discriminant,
            cases,
        }))
    }

    // ---------------------------------------------------------------------
    // Functions and patterns
    // ---------------------------------------------------------------------

    /// `function [*] [name] (params) { body }`
    fn parse_function(&mut self) -> ParseResult<FunctionData> {
        self.expect_name("function")?;
        let generator = self.eat_punct("*");
        let id = if self.is_punct("(") {
            NodeIndex::NONE
        } else {
            self.parse_identifier()?
        };
        self.parse_function_rest(id, generator)
    }

    fn parse_function_rest(&mut self, id: NodeIndex, generator: bool) -> ParseResult<FunctionData> {
        let params = self.parse_params()?;
        let body = self.parse_block(true)?;
        Ok(FunctionData {
            id,
            params,
            body,
            generator,
            is_async: false,
            expression: false,
        })
    }

    fn parse_params(&mut self) -> ParseResult<NodeList> {
        self.expect_punct("(")?;
        let mut params = NodeList::new();
        while !self.eat_punct(")") {
            params.push(self.parse_binding_target()?);
            if !self.is_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(params)
    }

    fn parse_arrow_body(&mut self, params: NodeList) -> ParseResult<NodeIndex> {
        self.expect_punct("=>")?;
        let data = if self.is_punct("{") {
            FunctionData {
                id: NodeIndex::NONE,
                params,
                body: self.parse_block(true)?,
                generator: false,
                is_async: false,
                expression: false,
            }
        } else {
            let saved = std::mem::replace(&mut self.no_in, false);
            let body = self.parse_assignment();
            self.no_in = saved;
            FunctionData {
                id: NodeIndex::NONE,
                params,
                body: body?,
                generator: false,
                is_async: false,
                expression: true,
            }
        };
        Ok(self.arena.add(Node::ArrowFunctionExpression(data)))
    }

    /// Identifier, array pattern or object pattern in binding position.
    fn parse_binding_target(&mut self) -> ParseResult<NodeIndex> {
        if self.eat_punct("[") {
            let mut elements = NodeList::new();
            while !self.eat_punct("]") {
                if self.eat_punct(",") {
                    elements.push(NodeIndex::NONE);
                    continue;
                }
                elements.push(self.parse_binding_target()?);
                if !self.is_punct("]") {
                    self.expect_punct(",")?;
                }
            }
            return Ok(self.arena.add(Node::ArrayPattern { elements }));
        }
        if self.eat_punct("{") {
            let mut properties = NodeList::new();
            while !self.eat_punct("}") {
                let (key, computed) = self.parse_property_key()?;
                let (value, shorthand) = if self.eat_punct(":") {
                    (self.parse_binding_target()?, false)
                } else {
                    (self.shorthand_value(key, computed)?, true)
                };
                properties.push(self.arena.add(Node::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    computed,
                    shorthand,
                    method: false,
                }));
                if !self.is_punct("}") {
                    self.expect_punct(",")?;
                }
            }
            return Ok(self.arena.add(Node::ObjectPattern { properties }));
        }
        self.parse_identifier()
    }

    fn shorthand_value(&mut self, key: NodeIndex, computed: bool) -> ParseResult<NodeIndex> {
        let name = match self.arena.identifier_name(key) {
            Some(name) if !computed && !RESERVED.contains(&name) => name.to_string(),
            _ => return self.error("invalid shorthand property"),
        };
        Ok(self.arena.add_identifier(name))
    }

    fn parse_property_key(&mut self) -> ParseResult<(NodeIndex, bool)> {
        if self.eat_punct("[") {
            let key = self.parse_assignment()?;
            self.expect_punct("]")?;
            return Ok((key, true));
        }
        let token = self.bump();
        let key = match token.kind {
            TokenKind::Name(name) => self.arena.add_identifier(name),
            TokenKind::Number { value, raw } => self.arena.add(Node::Literal {
                value: LiteralValue::Number(value),
                raw: Some(raw),
            }),
            TokenKind::Str { value, raw } => self.arena.add(Node::Literal {
                value: LiteralValue::String(value),
                raw: Some(raw),
            }),
            other => {
                return Err(ParseError::Syntax {
                    message: format!("expected property key, found {other:?}"),
                    offset: token.offset,
                });
            }
        };
        Ok((key, false))
    }

    /// Reinterpret an array/object literal as an assignment pattern.
    fn to_assignment_target(&mut self, idx: NodeIndex) -> ParseResult<NodeIndex> {
        match self.arena.get(idx).cloned() {
            Some(
                Node::Identifier { .. }
                | Node::MemberExpression { .. }
                | Node::ArrayPattern { .. }
                | Node::ObjectPattern { .. },
            ) => Ok(idx),
            Some(Node::ArrayExpression { elements }) => {
                for &element in &elements {
                    if element.is_some() {
                        self.to_assignment_target(element)?;
                    }
                }
                self.arena.replace(idx, Node::ArrayPattern { elements });
                Ok(idx)
            }
            Some(Node::ObjectExpression { properties }) => {
                for &property in &properties {
                    match self.arena.get(property).cloned() {
                        Some(Node::Property {
                            value,
                            kind: PropertyKind::Init,
                            method: false,
                            ..
                        }) => {
                            self.to_assignment_target(value)?;
                        }
                        _ => return self.error("invalid destructuring target"),
                    }
                }
                self.arena.replace(idx, Node::ObjectPattern { properties });
                Ok(idx)
            }
            _ => self.error("invalid assignment target"),
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_assignment()?;
        if !self.is_punct(",") {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat_punct(",") {
            expressions.push(self.parse_assignment()?);
        }
        Ok(self.arena.add_sequence(expressions))
    }

    /// True when the `(` at the cursor opens an arrow parameter list.
    fn arrow_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut ahead = 0;
        loop {
            let token = self.token_at(ahead);
            match token.kind {
                TokenKind::Eof => return false,
                TokenKind::Punct("(" | "[" | "{") => depth += 1,
                TokenKind::Punct(")" | "]" | "}") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.is_punct_at(ahead + 1, "=>");
                    }
                }
                _ => {}
            }
            ahead += 1;
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<NodeIndex> {
        if let Some(name) = self.current_name()
            && !RESERVED.contains(&name.as_str())
            && name != "yield"
            && self.is_punct_at(1, "=>")
        {
            let param = self.parse_identifier()?;
            return self.parse_arrow_body(vec![param]);
        }
        if self.is_punct("(") && self.arrow_ahead() {
            let params = self.parse_params()?;
            return self.parse_arrow_body(params);
        }
        if self.is_name("yield") {
            return self.parse_yield();
        }

        let left = self.parse_conditional()?;
        let Some(op) = self.current_punct().filter(|op| ASSIGNMENT_OPERATORS.contains(op)) else {
            return Ok(left);
        };
        self.bump();
        let left = if op == "=" {
            self.to_assignment_target(left)?
        } else if matches!(
            self.arena.get(left),
            Some(Node::Identifier { .. } | Node::MemberExpression { .. })
        ) {
            left
        } else {
            return self.error("invalid compound assignment target");
        };
        let right = self.parse_assignment()?;
        Ok(self.arena.add(Node::AssignmentExpression {
            operator: op.to_string(),
            left,
            right,
        }))
    }

    fn parse_yield(&mut self) -> ParseResult<NodeIndex> {
        self.bump();
        let delegate = self.eat_punct("*");
        let ends_here = self.at_eof()
            || self.current().newline_before
            || [")", "]", "}", ",", ";", ":"].iter().any(|p| self.is_punct(p));
        let argument = if ends_here && !delegate {
            NodeIndex::NONE
        } else {
            self.parse_assignment()?
        };
        Ok(self.arena.add(Node::YieldExpression { argument, delegate }))
    }

    fn parse_conditional(&mut self) -> ParseResult<NodeIndex> {
        let test = self.parse_binary(1)?;
        if !self.eat_punct("?") {
            return Ok(test);
        }
        let saved = std::mem::replace(&mut self.no_in, false);
        let consequent = self.parse_assignment();
        self.no_in = saved;
        let consequent = consequent?;
        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        Ok(self.arena.add(Node::ConditionalExpression {
            test,
            consequent,
            alternate,
        }))
    }

    fn current_binary_operator(&self) -> Option<(String, u8)> {
        let op = match &self.current().kind {
            TokenKind::Punct(p) => (*p).to_string(),
            TokenKind::Name(n) if n == "instanceof" || (n == "in" && !self.no_in) => n.clone(),
            _ => return None,
        };
        binary_precedence(&op).map(|prec| (op, prec))
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<NodeIndex> {
        let mut left = self.parse_unary()?;
        while let Some((op, prec)) = self.current_binary_operator() {
            if prec < min_prec {
                break;
            }
            self.bump();
            let next_min = if op == "**" { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            left = if matches!(op.as_str(), "&&" | "||" | "??") {
                self.arena.add(Node::LogicalExpression {
                    operator: op,
                    left,
                    right,
                })
            } else {
                self.arena.add(Node::BinaryExpression {
                    operator: op,
                    left,
                    right,
                })
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<NodeIndex> {
        let operator = match &self.current().kind {
            TokenKind::Punct(p @ ("!" | "-" | "+" | "~")) => Some((*p).to_string()),
            TokenKind::Name(n) if matches!(n.as_str(), "typeof" | "void" | "delete") => Some(n.clone()),
            _ => None,
        };
        if let Some(operator) = operator {
            self.bump();
            let argument = self.parse_unary()?;
            return Ok(self.arena.add(Node::UnaryExpression { operator, argument }));
        }
        if let Some(op @ ("++" | "--")) = self.current_punct() {
            self.bump();
            let argument = self.parse_unary()?;
            return Ok(self.arena.add(Node::UpdateExpression {
                operator: op.to_string(),
                prefix: true,
                argument,
            }));
        }
        let expr = self.parse_call_member()?;
        if let Some(op @ ("++" | "--")) = self.current_punct()
            && !self.current().newline_before
        {
            self.bump();
            return Ok(self.arena.add(Node::UpdateExpression {
                operator: op.to_string(),
                prefix: false,
                argument: expr,
            }));
        }
        Ok(expr)
    }

    fn parse_call_member(&mut self) -> ParseResult<NodeIndex> {
        let mut expr = if self.is_name("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.is_punct(".") || self.is_punct("[") {
                expr = self.parse_member_suffix(expr)?;
            } else if self.is_punct("(") {
                let arguments = self.parse_arguments()?;
                expr = self.arena.add(Node::CallExpression {
                    callee: expr,
                    arguments,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_member_suffix(&mut self, object: NodeIndex) -> ParseResult<NodeIndex> {
        if self.eat_punct(".") {
            let Some(name) = self.current_name() else {
                return self.error("expected property name after `.`");
            };
            self.bump();
            return Ok(self.arena.add_property_access(object, &name));
        }
        self.expect_punct("[")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let property = self.parse_expression();
        self.no_in = saved;
        let property = property?;
        self.expect_punct("]")?;
        Ok(self.arena.add_member(object, property, true))
    }

    fn parse_new(&mut self) -> ParseResult<NodeIndex> {
        self.expect_name("new")?;
        let mut callee = if self.is_name("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        while self.is_punct(".") || self.is_punct("[") {
            callee = self.parse_member_suffix(callee)?;
        }
        let arguments = if self.is_punct("(") {
            self.parse_arguments()?
        } else {
            NodeList::new()
        };
        Ok(self.arena.add(Node::NewExpression { callee, arguments }))
    }

    fn parse_arguments(&mut self) -> ParseResult<NodeList> {
        self.expect_punct("(")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_argument_list();
        self.no_in = saved;
        result
    }

    fn parse_argument_list(&mut self) -> ParseResult<NodeList> {
        let mut arguments = NodeList::new();
        while !self.eat_punct(")") {
            let argument = if self.eat_punct("...") {
                let argument = self.parse_assignment()?;
                self.arena.add(Node::SpreadElement { argument })
            } else {
                self.parse_assignment()?
            };
            arguments.push(argument);
            if !self.is_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> ParseResult<NodeIndex> {
        if self.is_punct("[") {
            return self.parse_array_literal();
        }
        if self.is_punct("{") {
            return self.parse_object_literal();
        }
        if self.eat_punct("(") {
            let saved = std::mem::replace(&mut self.no_in, false);
            let inner = self.parse_expression();
            self.no_in = saved;
            let inner = inner?;
            self.expect_punct(")")?;
            return Ok(inner);
        }
        if self.is_name("function") {
            let data = self.parse_function()?;
            return Ok(self.arena.add(Node::FunctionExpression(data)));
        }
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number { value, raw } => {
                self.bump();
                Ok(self.arena.add(Node::Literal {
                    value: LiteralValue::Number(value),
                    raw: Some(raw),
                }))
            }
            TokenKind::Str { value, raw } => {
                self.bump();
                Ok(self.arena.add(Node::Literal {
                    value: LiteralValue::String(value),
                    raw: Some(raw),
                }))
            }
            TokenKind::Name(name) => {
                let literal = match name.as_str() {
                    "this" => Some(Node::ThisExpression),
                    "null" => Some(raw_literal(LiteralValue::Null, &name)),
                    "true" => Some(raw_literal(LiteralValue::Boolean(true), &name)),
                    "false" => Some(raw_literal(LiteralValue::Boolean(false), &name)),
                    _ => None,
                };
                match literal {
                    Some(node) => {
                        self.bump();
                        Ok(self.arena.add(node))
                    }
                    None => self.parse_identifier(),
                }
            }
            other => self.error(format!("unexpected token {other:?}")),
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        self.expect_punct("[")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_array_elements();
        self.no_in = saved;
        let elements = result?;
        Ok(self.arena.add(Node::ArrayExpression { elements }))
    }

    fn parse_array_elements(&mut self) -> ParseResult<NodeList> {
        let mut elements = NodeList::new();
        while !self.eat_punct("]") {
            if self.eat_punct(",") {
                elements.push(NodeIndex::NONE);
                continue;
            }
            let element = if self.eat_punct("...") {
                let argument = self.parse_assignment()?;
                self.arena.add(Node::SpreadElement { argument })
            } else {
                self.parse_assignment()?
            };
            elements.push(element);
            if !self.is_punct("]") {
                self.expect_punct(",")?;
            }
        }
        Ok(elements)
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        self.expect_punct("{")?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = self.parse_object_members();
        self.no_in = saved;
        let properties = result?;
        Ok(self.arena.add(Node::ObjectExpression { properties }))
    }

    fn parse_object_members(&mut self) -> ParseResult<NodeList> {
        let mut properties = NodeList::new();
        while !self.eat_punct("}") {
            properties.push(self.parse_object_member()?);
            if !self.is_punct("}") {
                self.expect_punct(",")?;
            }
        }
        Ok(properties)
    }

    fn parse_object_member(&mut self) -> ParseResult<NodeIndex> {
        let accessor = match self.current_name().as_deref() {
            Some("get") => Some(PropertyKind::Get),
            Some("set") => Some(PropertyKind::Set),
            _ => None,
        };
        if let Some(kind) = accessor
            && ![",", ":", "(", "}"].iter().any(|p| self.is_punct_at(1, p))
        {
            self.bump();
            let (key, computed) = self.parse_property_key()?;
            let data = self.parse_function_rest(NodeIndex::NONE, false)?;
            let value = self.arena.add(Node::FunctionExpression(data));
            return Ok(self.arena.add(Node::Property {
                key,
                value,
                kind,
                computed,
                shorthand: false,
                method: false,
            }));
        }

        let (key, computed) = self.parse_property_key()?;
        let (value, shorthand, method) = if self.eat_punct(":") {
            (self.parse_assignment()?, false, false)
        } else if self.is_punct("(") {
            let data = self.parse_function_rest(NodeIndex::NONE, false)?;
            (self.arena.add(Node::FunctionExpression(data)), false, true)
        } else {
            (self.shorthand_value(key, computed)?, true, false)
        };
        Ok(self.arena.add(Node::Property {
            key,
            value,
            kind: PropertyKind::Init,
            computed,
            shorthand,
            method,
        }))
    }
}

fn raw_literal(value: LiteralValue, raw: &str) -> Node {
    Node::Literal {
        value,
        raw: Some(raw.to_string()),
    }
}

#[cfg(test)]
#[path = "../tests/source_parser_tests.rs"]
mod tests;
