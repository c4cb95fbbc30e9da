use super::Printer;
use unravel_parser::parser::{FunctionData, LiteralValue, Node, NodeIndex, PropertyKind};

// Precedence levels, loosest first.
const SEQUENCE: u8 = 0;
pub(super) const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const UNARY: u8 = 14;
const POSTFIX: u8 = 15;
const LEFT_HAND_SIDE: u8 = 16;
const CALL: u8 = 17;
const PRIMARY: u8 = 18;

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "??" | "||" => 3,
        "&&" => 4,
        "|" => 5,
        "^" => 6,
        "&" => 7,
        "==" | "!=" | "===" | "!==" => 8,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 9,
        "<<" | ">>" | ">>>" => 10,
        "+" | "-" => 11,
        "*" | "/" | "%" => 12,
        "**" => 13,
        _ => 11,
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl<'a> Printer<'a> {
    // =========================================================================
    // Precedence
    // =========================================================================

    pub(super) fn precedence(&self, idx: NodeIndex) -> u8 {
        match self.arena.get(idx) {
            Some(Node::SequenceExpression { .. }) => SEQUENCE,
            Some(
                Node::AssignmentExpression { .. }
                | Node::YieldExpression { .. }
                | Node::ArrowFunctionExpression(_)
                | Node::SpreadElement { .. },
            ) => ASSIGNMENT,
            Some(Node::ConditionalExpression { .. }) => CONDITIONAL,
            Some(Node::LogicalExpression { operator, .. } | Node::BinaryExpression { operator, .. }) => {
                binary_precedence(operator)
            }
            Some(Node::UnaryExpression { .. }) => UNARY,
            Some(Node::UpdateExpression { prefix, .. }) => {
                if *prefix {
                    UNARY
                } else {
                    POSTFIX
                }
            }
            Some(Node::CallExpression { .. } | Node::NewExpression { .. } | Node::MemberExpression { .. }) => CALL,
            _ => PRIMARY,
        }
    }

    /// Minimum precedence `child` needs to print unparenthesized as the
    /// leftmost operand of `parent`.
    pub(super) fn operand_floor(&self, parent: NodeIndex, child: NodeIndex) -> u8 {
        match self.arena.get(parent) {
            Some(Node::BinaryExpression { operator, .. }) if operator == "**" => binary_precedence(operator) + 1,
            Some(Node::BinaryExpression { operator, .. } | Node::LogicalExpression { operator, .. }) => {
                binary_precedence(operator)
            }
            Some(Node::AssignmentExpression { .. }) => LEFT_HAND_SIDE,
            Some(Node::ConditionalExpression { .. }) => CONDITIONAL + 1,
            Some(Node::CallExpression { .. }) => CALL,
            Some(Node::MemberExpression { computed, .. }) => {
                if !computed && self.is_number_literal(child) {
                    PRIMARY + 1
                } else {
                    CALL
                }
            }
            Some(Node::SequenceExpression { .. }) => ASSIGNMENT,
            Some(Node::UpdateExpression { .. }) => LEFT_HAND_SIDE,
            _ => SEQUENCE,
        }
    }

    fn is_number_literal(&self, idx: NodeIndex) -> bool {
        matches!(
            self.arena.get(idx),
            Some(Node::Literal {
                value: LiteralValue::Number(_),
                ..
            })
        )
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn emit_expression(&mut self, idx: NodeIndex) {
        self.emit_expression_at(idx, SEQUENCE);
    }

    /// Emit `idx`, parenthesized when it binds looser than `min_precedence`.
    pub(super) fn emit_expression_at(&mut self, idx: NodeIndex, min_precedence: u8) {
        if self.precedence(idx) < min_precedence {
            self.write("(");
            self.emit_expression_inner(idx);
            self.write(")");
        } else {
            self.emit_expression_inner(idx);
        }
    }

    fn emit_expression_inner(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match node {
            Node::Identifier { name } => self.write(name),
            Node::Literal { value, raw } => self.emit_literal(value, raw.as_deref()),
            Node::ThisExpression => self.write("this"),
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => self.emit_array(elements),
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                self.emit_object(properties)
            }
            Node::FunctionExpression(data) => self.emit_function(data),
            Node::ArrowFunctionExpression(data) => self.emit_arrow(data),
            Node::UnaryExpression { operator, argument } => {
                self.write(operator);
                if operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.write(" ");
                } else if self.needs_space_after_sign(operator, *argument) {
                    self.write(" ");
                }
                self.emit_expression_at(*argument, UNARY);
            }
            Node::UpdateExpression {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.write(operator);
                    self.emit_expression_at(*argument, UNARY);
                } else {
                    self.emit_expression_at(*argument, LEFT_HAND_SIDE);
                    self.write(operator);
                }
            }
            Node::BinaryExpression {
                operator,
                left,
                right,
            }
            | Node::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let precedence = binary_precedence(operator);
                let (left_floor, right_floor) = if operator == "**" {
                    (precedence + 1, precedence)
                } else {
                    (precedence, precedence + 1)
                };
                self.emit_expression_at(*left, left_floor);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression_at(*right, right_floor);
            }
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                self.emit_expression_at(*left, LEFT_HAND_SIDE);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit_expression_at(*right, ASSIGNMENT);
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.emit_expression_at(*test, CONDITIONAL + 1);
                self.write(" ? ");
                self.emit_expression_at(*consequent, ASSIGNMENT);
                self.write(" : ");
                self.emit_expression_at(*alternate, ASSIGNMENT);
            }
            Node::CallExpression { callee, arguments } => {
                self.emit_expression_at(*callee, CALL);
                self.emit_arguments(arguments);
            }
            Node::NewExpression { callee, arguments } => {
                self.write("new ");
                let floor = if self.contains_call_on_spine(*callee) {
                    PRIMARY + 1
                } else {
                    CALL
                };
                self.emit_expression_at(*callee, floor);
                self.emit_arguments(arguments);
            }
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                let floor = self.operand_floor(idx, *object);
                self.emit_expression_at(*object, floor);
                if *computed {
                    self.write("[");
                    self.emit_expression(*property);
                    self.write("]");
                } else {
                    self.write(".");
                    self.emit_expression_inner(*property);
                }
            }
            Node::SequenceExpression { expressions } => {
                for (i, &expr) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expression_at(expr, ASSIGNMENT);
                }
            }
            Node::YieldExpression { argument, delegate } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if argument.is_some() {
                    self.write(" ");
                    self.emit_expression_at(*argument, ASSIGNMENT);
                }
            }
            Node::SpreadElement { argument } => {
                self.write("...");
                self.emit_expression_at(*argument, ASSIGNMENT);
            }
            Node::Property { .. } => self.emit_property(idx),
            _ => {}
        }
    }

    /// `- -x` and `+ +x` must not fuse into `--x` / `++x`.
    fn needs_space_after_sign(&self, operator: &str, argument: NodeIndex) -> bool {
        let argument_operator = match self.arena.get(argument) {
            Some(Node::UnaryExpression { operator, .. }) => operator.as_str(),
            Some(Node::UpdateExpression {
                operator, prefix: true, ..
            }) => operator.as_str(),
            _ => return false,
        };
        (operator == "-" || operator == "+") && argument_operator.starts_with(operator)
    }

    fn emit_literal(&mut self, value: &LiteralValue, raw: Option<&str>) {
        if let Some(raw) = raw {
            self.write(raw);
            return;
        }
        match value {
            LiteralValue::Null => self.write("null"),
            LiteralValue::Boolean(b) => self.write(if *b { "true" } else { "false" }),
            LiteralValue::Number(n) => {
                let text = format_number(*n);
                self.write(&text);
            }
            LiteralValue::String(s) => self.write_escaped_string(s),
            LiteralValue::RegExp { pattern, flags } => {
                self.write("/");
                self.write(pattern);
                self.write("/");
                self.write(flags);
            }
        }
    }

    fn emit_arguments(&mut self, arguments: &[NodeIndex]) {
        self.write("(");
        for (i, &arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression_at(arg, ASSIGNMENT);
        }
        self.write(")");
    }

    /// Holes print as empty slots; a trailing hole needs an extra comma.
    fn emit_array(&mut self, elements: &[NodeIndex]) {
        self.write("[");
        for (i, &element) in elements.iter().enumerate() {
            if i > 0 {
                self.write(",");
                if element.is_some() || i + 1 == elements.len() {
                    self.write(" ");
                }
            }
            if element.is_some() {
                self.emit_expression_at(element, ASSIGNMENT);
            }
        }
        if elements.last().is_some_and(|last| last.is_none()) {
            self.write(",");
        }
        self.write("]");
    }

    fn emit_object(&mut self, properties: &[NodeIndex]) {
        self.write("{");
        for (i, &property) in properties.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_property(property);
        }
        self.write("}");
    }

    fn emit_property(&mut self, idx: NodeIndex) {
        let Some(Node::Property {
            key,
            value,
            kind,
            computed,
            shorthand,
            method,
        }) = self.arena.get(idx)
        else {
            return;
        };
        if *shorthand && self.same_identifier(*key, *value) {
            self.emit_expression_inner(*value);
            return;
        }
        let accessor = match kind {
            PropertyKind::Get => Some("get "),
            PropertyKind::Set => Some("set "),
            PropertyKind::Init => None,
        };
        if let Some(prefix) = accessor {
            self.write(prefix);
        }
        if *computed {
            self.write("[");
            self.emit_expression_at(*key, ASSIGNMENT);
            self.write("]");
        } else {
            self.emit_expression_inner(*key);
        }
        if accessor.is_some() || *method {
            if let Some(data) = self.arena.function_data(*value) {
                self.emit_function_signature(data);
                self.write(" ");
                self.emit_block(data.body);
            }
            return;
        }
        self.write(": ");
        self.emit_expression_at(*value, ASSIGNMENT);
    }

    fn same_identifier(&self, a: NodeIndex, b: NodeIndex) -> bool {
        match (self.arena.identifier_name(a), self.arena.identifier_name(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `function name(params) { body }`; anonymous functions print as
    /// `function (params) { body }`.
    pub(super) fn emit_function(&mut self, data: &FunctionData) {
        if data.is_async {
            self.write("async ");
        }
        self.write(if data.generator { "function*" } else { "function" });
        if data.id.is_some() {
            self.write(" ");
            self.emit_expression_inner(data.id);
        } else {
            self.write(" ");
        }
        self.emit_function_signature(data);
        self.write(" ");
        self.emit_block(data.body);
    }

    fn emit_function_signature(&mut self, data: &FunctionData) {
        self.write("(");
        for (i, &param) in data.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression_at(param, ASSIGNMENT);
        }
        self.write(")");
    }

    fn emit_arrow(&mut self, data: &FunctionData) {
        if data.is_async {
            self.write("async ");
        }
        self.emit_function_signature(data);
        self.write(" => ");
        if data.expression {
            if self.starts_ambiguously(data.body) {
                self.write("(");
                self.emit_expression(data.body);
                self.write(")");
            } else {
                self.emit_expression_at(data.body, ASSIGNMENT);
            }
        } else {
            self.emit_block(data.body);
        }
    }
}
