use super::Printer;
use super::expressions::ASSIGNMENT;
use unravel_parser::parser::{Node, NodeIndex};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub fn emit_statement(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match node {
            Node::ExpressionStatement {
                expression,
                directive,
            } => {
                if directive.is_some() || !self.starts_ambiguously(*expression) {
                    self.emit_expression(*expression);
                } else {
                    self.write("(");
                    self.emit_expression(*expression);
                    self.write(")");
                }
                self.write(";");
            }
            Node::BlockStatement { .. } => self.emit_block(idx),
            Node::EmptyStatement => self.write(";"),
            Node::VariableDeclaration { .. } => {
                self.emit_variable_declaration(idx);
                self.write(";");
            }
            Node::FunctionDeclaration(data) => self.emit_function(data),
            Node::ReturnStatement { argument } => {
                self.write("return");
                if argument.is_some() {
                    self.write(" ");
                    self.emit_expression(*argument);
                }
                self.write(";");
            }
            Node::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.emit_expression(*test);
                self.write(")");
                self.emit_embedded_statement(*consequent);
                if alternate.is_some() {
                    self.write(" else");
                    self.emit_embedded_statement(*alternate);
                }
            }
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                self.emit_for_head_part(*init);
                self.write(";");
                if test.is_some() {
                    self.write(" ");
                    self.emit_expression(*test);
                }
                self.write(";");
                if update.is_some() {
                    self.write(" ");
                    self.emit_expression(*update);
                }
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            Node::ForInStatement { left, right, body } | Node::ForOfStatement { left, right, body } => {
                let keyword = if matches!(node, Node::ForInStatement { .. }) {
                    " in "
                } else {
                    " of "
                };
                self.write("for (");
                self.emit_for_head_part(*left);
                self.write(keyword);
                self.emit_expression(*right);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            Node::WhileStatement { test, body } => {
                self.write("while (");
                self.emit_expression(*test);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            Node::DoWhileStatement { body, test } => {
                self.write("do");
                self.emit_embedded_statement(*body);
                self.write(" while (");
                self.emit_expression(*test);
                self.write(");");
            }
            Node::BreakStatement { label } => self.emit_jump("break", *label),
            Node::ContinueStatement { label } => self.emit_jump("continue", *label),
            Node::ThrowStatement { argument } => {
                self.write("throw ");
                self.emit_expression(*argument);
                self.write(";");
            }
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                self.write("try ");
                self.emit_block(*block);
                if let Some(Node::CatchClause { param, body }) = self.arena.get(*handler) {
                    self.write(" catch ");
                    if param.is_some() {
                        self.write("(");
                        self.emit_expression(*param);
                        self.write(") ");
                    }
                    self.emit_block(*body);
                }
                if finalizer.is_some() {
                    self.write(" finally ");
                    self.emit_block(*finalizer);
                }
            }
            Node::LabeledStatement { label, body } => {
                self.emit_expression(*label);
                self.write(":");
                self.emit_embedded_statement(*body);
            }
            Node::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.write("switch (");
                self.emit_expression(*discriminant);
                self.write(") {");
                self.increase_indent();
                for &case in cases {
                    self.write_line();
                    self.write_indent();
                    self.emit_switch_case(case);
                }
                self.decrease_indent();
                self.write_line();
                self.write_indent();
                self.write("}");
            }
            _ => {}
        }
    }

    /// `{}` when empty, otherwise one statement per line.
    pub(super) fn emit_block(&mut self, idx: NodeIndex) {
        let Some(body) = self.arena.statements(idx) else {
            return;
        };
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.increase_indent();
        for &stmt in body {
            self.write_line();
            self.write_indent();
            self.emit_statement(stmt);
        }
        self.decrease_indent();
        self.write_line();
        self.write_indent();
        self.write("}");
    }

    /// Body of `if`/`for`/`while`/labels: blocks and single statements
    /// both follow on the same line.
    fn emit_embedded_statement(&mut self, idx: NodeIndex) {
        self.write(" ");
        self.emit_statement(idx);
    }

    /// `var a = 1, b` without the trailing semicolon.
    fn emit_variable_declaration(&mut self, idx: NodeIndex) {
        let Some(Node::VariableDeclaration { kind, declarations }) = self.arena.get(idx) else {
            return;
        };
        self.write(kind.as_str());
        self.write(" ");
        for (i, &decl) in declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let Some(Node::VariableDeclarator { id, init }) = self.arena.get(decl) else {
                continue;
            };
            self.emit_expression(*id);
            if init.is_some() {
                self.write(" = ");
                self.emit_expression_at(*init, ASSIGNMENT);
            }
        }
    }

    fn emit_for_head_part(&mut self, idx: NodeIndex) {
        match self.arena.get(idx) {
            None => {}
            Some(Node::VariableDeclaration { .. }) => self.emit_variable_declaration(idx),
            Some(_) => self.emit_expression(idx),
        }
    }

    fn emit_jump(&mut self, keyword: &str, label: NodeIndex) {
        self.write(keyword);
        if label.is_some() {
            self.write(" ");
            self.emit_expression(label);
        }
        self.write(";");
    }

    fn emit_switch_case(&mut self, idx: NodeIndex) {
        let Some(Node::SwitchCase { test, consequent }) = self.arena.get(idx) else {
            return;
        };
        if test.is_some() {
            self.write("case ");
            self.emit_expression(*test);
            self.write(":");
        } else {
            self.write("default:");
        }
        self.increase_indent();
        for &stmt in consequent {
            self.write_line();
            self.write_indent();
            self.emit_statement(stmt);
        }
        self.decrease_indent();
    }
}
