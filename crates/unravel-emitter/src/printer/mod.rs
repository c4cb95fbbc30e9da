//! JavaScript printer.
//!
//! Turns a `ProgramTree` back into source text. Formatting is fixed apart
//! from the newline and indentation strings in `GenerateOptions`; the printer
//! never looks at source positions.
//!
//! Parentheses are derived from operator precedence, so synthesized nodes
//! (sequences nested in calls, assignments in conditions) print correctly
//! without the rewrite engine inserting grouping nodes.

mod expressions;
mod statements;

use unravel_common::GenerateOptions;
use unravel_parser::parser::{Node, NodeArena, NodeIndex};
use unravel_parser::ProgramTree;

/// Print `tree` with `options`.
pub fn generate(tree: &ProgramTree, options: &GenerateOptions) -> String {
    let mut printer = Printer::new(&tree.arena, options);
    printer.emit_program(tree.root);
    printer.into_output()
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    options: &'a GenerateOptions,
    output: String,
    indent_level: u32,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, options: &'a GenerateOptions) -> Self {
        Printer {
            arena,
            options,
            output: String::with_capacity(arena.len() * 8),
            indent_level: 0,
        }
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Emit a whole program. Multi-line output ends with a newline.
    pub fn emit_program(&mut self, root: NodeIndex) {
        let Some(body) = self.arena.statements(root) else {
            return;
        };
        for (i, &stmt) in body.iter().enumerate() {
            if i > 0 {
                self.write_line();
            }
            self.write_indent();
            self.emit_statement(stmt);
        }
        if !body.is_empty() && !self.options.new_line.is_single_line() {
            self.write_line();
        }
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_line(&mut self) {
        self.output.push_str(self.options.new_line.as_str());
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_escaped_string(&mut self, value: &str) {
        self.output.push('"');
        for c in value.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                '\u{2028}' => self.output.push_str("\\u2028"),
                '\u{2029}' => self.output.push_str("\\u2029"),
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    self.output.push_str(&format!("\\u{:04X}", c as u32));
                }
                _ => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    // =========================================================================
    // Shape queries
    // =========================================================================

    /// Leftmost node printed for an expression, following operands that
    /// are emitted before their operator (`a` in `a.b()`, `a + b`, `a ? b : c`).
    fn leftmost(&self, mut idx: NodeIndex) -> NodeIndex {
        loop {
            let next = match self.arena.get(idx) {
                Some(
                    Node::BinaryExpression { left, .. }
                    | Node::LogicalExpression { left, .. }
                    | Node::AssignmentExpression { left, .. },
                ) => *left,
                Some(Node::ConditionalExpression { test, .. }) => *test,
                Some(Node::CallExpression { callee, .. }) => *callee,
                Some(Node::MemberExpression { object, .. }) => *object,
                Some(Node::SequenceExpression { expressions }) => match expressions.first() {
                    Some(&first) => first,
                    None => return idx,
                },
                Some(Node::UpdateExpression {
                    prefix: false,
                    argument,
                    ..
                }) => *argument,
                _ => return idx,
            };
            // Operands that print parenthesized start with `(` instead.
            if self.precedence(next) < self.operand_floor(idx, next) {
                return idx;
            }
            idx = next;
        }
    }

    /// An expression statement starting with one of these would be parsed as
    /// a declaration or a block.
    fn starts_ambiguously(&self, expr: NodeIndex) -> bool {
        let first = self.leftmost(expr);
        matches!(
            self.arena.get(first),
            Some(Node::FunctionExpression(_) | Node::ObjectExpression { .. } | Node::ObjectPattern { .. })
        )
    }

    /// True when a `new` callee would swallow a call's argument list.
    fn contains_call_on_spine(&self, mut idx: NodeIndex) -> bool {
        loop {
            match self.arena.get(idx) {
                Some(Node::CallExpression { .. }) => return true,
                Some(Node::MemberExpression { object, .. }) => idx = *object,
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/printer_tests.rs"]
mod tests;
