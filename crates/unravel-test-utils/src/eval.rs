//! Tree-walking evaluator for destructuring-free programs.
//!
//! Runs the output of the transform so tests can compare the bindings a
//! program computes instead of only its printed text. Supported: `var`/`let`
//! /`const` with identifier targets (all function scoped), functions,
//! closures and `arguments`, `if`/`for`/`while`/`do`/labels/`try`/`throw`,
//! and the common operators. Patterns, `new` and generators are reported as
//! `EvalError::Unsupported`.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use unravel_parser::parser::{LiteralValue, Node, NodeArena, NodeIndex, VarKind};
use unravel_parser::syntax::transform_utils::collect_bound_names;
use unravel_parser::ProgramTree;

/// Maximum number of evaluation steps before a run is aborted.
const STEP_LIMIT: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("TypeError: {0}")]
    TypeError(String),
    #[error("ReferenceError: {0} is not defined")]
    ReferenceError(String),
    #[error("uncaught exception: {0}")]
    Thrown(Value),
    #[error("unsupported node: {0}")]
    Unsupported(&'static str),
    #[error("step limit exceeded")]
    StepLimit,
}

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Vec<(String, Value)>>>),
    Function(Rc<Closure>),
}

pub struct Closure {
    params: Vec<NodeIndex>,
    body: NodeIndex,
    expression: bool,
    is_arrow: bool,
    env: Rc<Env>,
}

impl Value {
    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Array(_) | Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(_) => "function".to_string(),
        }
    }

    fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
        }
    }

    fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Number(_) | Value::Str(_) | Value::Bool(_))
                if std::mem::discriminant(self) != std::mem::discriminant(other) =>
            {
                self.to_number() == other.to_number()
            }
            _ => self.strict_equals(other),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Literal-like rendering used in assertions: strings are quoted, arrays
/// and objects are expanded.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(props) => {
                write!(f, "{{")?;
                for (i, (key, value)) in props.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key}: {value}")?;
                }
                if props.borrow().is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            other => write!(f, "{}", other.to_js_string()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug)]
pub struct Env {
    vars: RefCell<FxHashMap<String, Value>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    fn new(parent: Option<Rc<Env>>) -> Rc<Env> {
        Rc::new(Env {
            vars: RefCell::new(FxHashMap::default()),
            parent,
        })
    }

    fn declare(&self, name: &str) {
        self.vars
            .borrow_mut()
            .entry(name.to_string())
            .or_insert(Value::Undefined);
    }

    fn define(&self, name: &str, value: Value) {
        self.vars.borrow_mut().insert(name.to_string(), value);
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Assign to the nearest binding; undeclared names become globals.
    fn assign(self: &Rc<Self>, name: &str, value: Value) {
        let mut env = Rc::clone(self);
        loop {
            if let Some(slot) = env.vars.borrow_mut().get_mut(name) {
                *slot = value;
                return;
            }
            let Some(parent) = env.parent.clone() else {
                env.define(name, value);
                return;
            };
            env = parent;
        }
    }
}

/// Global bindings after a run.
#[derive(Debug)]
pub struct Globals {
    env: Rc<Env>,
}

impl Globals {
    /// Value of a global binding, `undefined` when absent.
    pub fn get(&self, name: &str) -> Value {
        self.env.lookup(name).unwrap_or(Value::Undefined)
    }

    /// `get(name)` rendered with `Display`.
    pub fn render(&self, name: &str) -> String {
        self.get(name).to_string()
    }
}

/// Run a program and return its global bindings.
pub fn run_program(tree: &ProgramTree) -> Result<Globals, EvalError> {
    let mut interpreter = Interpreter {
        arena: &tree.arena,
        steps: 0,
        loop_label: None,
    };
    let global = Env::new(None);
    interpreter.run_function_body(tree.root, &global)?;
    Ok(Globals { env: global })
}

enum Completion {
    Normal,
    Return(Value),
    Break(Option<String>),
    Continue(Option<String>),
}

/// What a loop does after its body completes.
enum LoopStep {
    Next,
    Exit,
    Propagate(Completion),
}

/// `label` is the loop's own label, if it has one.
fn loop_step(completion: Completion, label: Option<&str>) -> LoopStep {
    match completion {
        Completion::Normal | Completion::Continue(None) => LoopStep::Next,
        Completion::Break(None) => LoopStep::Exit,
        Completion::Continue(Some(l)) if Some(l.as_str()) == label => LoopStep::Next,
        Completion::Break(Some(l)) if Some(l.as_str()) == label => LoopStep::Exit,
        other => LoopStep::Propagate(other),
    }
}

struct Interpreter<'a> {
    arena: &'a NodeArena,
    steps: u64,
    /// Label of the loop about to run, set by its `LabeledStatement`.
    loop_label: Option<String>,
}

impl<'a> Interpreter<'a> {
    fn node(&self, idx: NodeIndex) -> Result<&'a Node, EvalError> {
        self.arena.get(idx).ok_or(EvalError::Unsupported("missing node"))
    }

    fn tick(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err(EvalError::StepLimit);
        }
        Ok(())
    }

    fn label_name(&self, idx: NodeIndex) -> Option<String> {
        self.arena.identifier_name(idx).map(str::to_string)
    }

    // ---------------------------------------------------------------------
    // Hoisting
    // ---------------------------------------------------------------------

    fn run_function_body(&mut self, body: NodeIndex, env: &Rc<Env>) -> Result<Completion, EvalError> {
        let statements = self.arena.statements(body).cloned().unwrap_or_default();
        for &stmt in &statements {
            self.hoist(stmt, env)?;
        }
        for &stmt in &statements {
            match self.exec(stmt, env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    fn hoist(&mut self, idx: NodeIndex, env: &Rc<Env>) -> Result<(), EvalError> {
        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        match node {
            Node::VariableDeclaration { declarations, .. } => {
                for &decl in declarations {
                    if let Some(Node::VariableDeclarator { id, .. }) = self.arena.get(decl) {
                        let mut names = Vec::new();
                        collect_bound_names(self.arena, *id, &mut names);
                        for name in names {
                            env.declare(&name);
                        }
                    }
                }
            }
            Node::FunctionDeclaration(data) => {
                if let Some(name) = self.arena.identifier_name(data.id) {
                    let closure = self.make_closure(idx, env)?;
                    env.define(name, closure);
                }
            }
            Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_) => {}
            Node::ExpressionStatement { .. } | Node::ReturnStatement { .. } | Node::ThrowStatement { .. } => {}
            _ => {
                for child in self.arena.children(idx) {
                    self.hoist(child, env)?;
                }
            }
        }
        Ok(())
    }

    fn make_closure(&self, idx: NodeIndex, env: &Rc<Env>) -> Result<Value, EvalError> {
        let Some(data) = self.arena.function_data(idx) else {
            return Err(EvalError::Unsupported("function"));
        };
        if data.generator || data.is_async {
            return Err(EvalError::Unsupported("generator function"));
        }
        Ok(Value::Function(Rc::new(Closure {
            params: data.params.clone(),
            body: data.body,
            expression: data.expression,
            is_arrow: matches!(self.arena.get(idx), Some(Node::ArrowFunctionExpression(_))),
            env: Rc::clone(env),
        })))
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn exec_block(&mut self, statements: &[NodeIndex], env: &Rc<Env>) -> Result<Completion, EvalError> {
        for &stmt in statements {
            match self.exec(stmt, env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec(&mut self, idx: NodeIndex, env: &Rc<Env>) -> Result<Completion, EvalError> {
        self.tick()?;
        let node = self.node(idx)?;
        match node {
            Node::BlockStatement { body } => self.exec_block(body, env),
            Node::EmptyStatement | Node::FunctionDeclaration(_) => Ok(Completion::Normal),
            Node::ExpressionStatement { expression, .. } => {
                self.eval(*expression, env)?;
                Ok(Completion::Normal)
            }
            Node::VariableDeclaration { kind, declarations } => {
                for &decl in declarations {
                    let Some(Node::VariableDeclarator { id, init }) = self.arena.get(decl) else {
                        continue;
                    };
                    let Some(name) = self.arena.identifier_name(*id) else {
                        return Err(EvalError::Unsupported("binding pattern"));
                    };
                    if init.is_some() {
                        let value = self.eval(*init, env)?;
                        env.assign(name, value);
                    } else if *kind != VarKind::Var {
                        env.assign(name, Value::Undefined);
                    }
                }
                Ok(Completion::Normal)
            }
            Node::ReturnStatement { argument } => {
                let value = if argument.is_some() {
                    self.eval(*argument, env)?
                } else {
                    Value::Undefined
                };
                Ok(Completion::Return(value))
            }
            Node::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(*test, env)?.truthy() {
                    self.exec(*consequent, env)
                } else if alternate.is_some() {
                    self.exec(*alternate, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Node::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let label = self.loop_label.take();
                if init.is_some() {
                    if matches!(self.arena.get(*init), Some(Node::VariableDeclaration { .. })) {
                        self.exec(*init, env)?;
                    } else {
                        self.eval(*init, env)?;
                    }
                }
                loop {
                    if test.is_some() && !self.eval(*test, env)?.truthy() {
                        break;
                    }
                    match loop_step(self.exec(*body, env)?, label.as_deref()) {
                        LoopStep::Next => {}
                        LoopStep::Exit => break,
                        LoopStep::Propagate(completion) => return Ok(completion),
                    }
                    if update.is_some() {
                        self.eval(*update, env)?;
                    }
                }
                Ok(Completion::Normal)
            }
            Node::WhileStatement { test, body } => {
                let label = self.loop_label.take();
                while self.eval(*test, env)?.truthy() {
                    match loop_step(self.exec(*body, env)?, label.as_deref()) {
                        LoopStep::Next => {}
                        LoopStep::Exit => break,
                        LoopStep::Propagate(completion) => return Ok(completion),
                    }
                }
                Ok(Completion::Normal)
            }
            Node::DoWhileStatement { body, test } => {
                let label = self.loop_label.take();
                loop {
                    match loop_step(self.exec(*body, env)?, label.as_deref()) {
                        LoopStep::Next => {}
                        LoopStep::Exit => break,
                        LoopStep::Propagate(completion) => return Ok(completion),
                    }
                    if !self.eval(*test, env)?.truthy() {
                        break;
                    }
                }
                Ok(Completion::Normal)
            }
            Node::BreakStatement { label } => Ok(Completion::Break(self.label_name(*label))),
            Node::ContinueStatement { label } => Ok(Completion::Continue(self.label_name(*label))),
            Node::LabeledStatement { label, body } => {
                let name = self.label_name(*label);
                if matches!(
                    self.arena.get(*body),
                    Some(Node::ForStatement { .. } | Node::WhileStatement { .. } | Node::DoWhileStatement { .. })
                ) {
                    self.loop_label.clone_from(&name);
                }
                match self.exec(*body, env)? {
                    Completion::Break(Some(l)) | Completion::Continue(Some(l)) if Some(&l) == name.as_ref() => {
                        Ok(Completion::Normal)
                    }
                    other => Ok(other),
                }
            }
            Node::ThrowStatement { argument } => {
                let value = self.eval(*argument, env)?;
                Err(EvalError::Thrown(value))
            }
            Node::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                let mut result = self.exec(*block, env);
                if handler.is_some()
                    && let Err(err) = &result
                    && !matches!(err, EvalError::StepLimit | EvalError::Unsupported(_))
                {
                    let thrown = match err {
                        EvalError::Thrown(value) => value.clone(),
                        other => Value::string(&other.to_string()),
                    };
                    let Some(Node::CatchClause { param, body }) = self.arena.get(*handler) else {
                        return Err(EvalError::Unsupported("catch clause"));
                    };
                    if let Some(name) = self.arena.identifier_name(*param) {
                        env.define(name, thrown);
                    }
                    result = self.exec(*body, env);
                }
                if finalizer.is_some() {
                    match self.exec(*finalizer, env)? {
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                }
                result
            }
            other => Err(EvalError::Unsupported(other.kind_name())),
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn eval(&mut self, idx: NodeIndex, env: &Rc<Env>) -> Result<Value, EvalError> {
        self.tick()?;
        let node = self.node(idx)?;
        match node {
            Node::Identifier { name } => match env.lookup(name) {
                Some(value) => Ok(value),
                None if name == "undefined" => Ok(Value::Undefined),
                None => Err(EvalError::ReferenceError(name.clone())),
            },
            Node::Literal { value, .. } => Ok(match value {
                LiteralValue::Null => Value::Null,
                LiteralValue::Boolean(b) => Value::Bool(*b),
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::String(s) => Value::string(s),
                LiteralValue::RegExp { .. } => return Err(EvalError::Unsupported("regular expression")),
            }),
            Node::ThisExpression => Ok(Value::Undefined),
            Node::ArrayExpression { elements } => {
                let mut items = Vec::with_capacity(elements.len());
                for &element in elements {
                    if element.is_none() {
                        items.push(Value::Undefined);
                    } else if let Some(Node::SpreadElement { argument }) = self.arena.get(element) {
                        match self.eval(*argument, env)? {
                            Value::Array(spread) => items.extend(spread.borrow().iter().cloned()),
                            _ => return Err(EvalError::TypeError("spread of non-array".into())),
                        }
                    } else {
                        items.push(self.eval(element, env)?);
                    }
                }
                Ok(Value::array(items))
            }
            Node::ObjectExpression { properties } => {
                let object = Rc::new(RefCell::new(Vec::new()));
                for &property in properties {
                    let Some(Node::Property {
                        key, value, computed, ..
                    }) = self.arena.get(property)
                    else {
                        continue;
                    };
                    let key = self.property_key(*key, *computed, env)?;
                    let value = self.eval(*value, env)?;
                    set_object_property(&object, key, value);
                }
                Ok(Value::Object(object))
            }
            Node::FunctionExpression(_) | Node::ArrowFunctionExpression(_) => self.make_closure(idx, env),
            Node::UnaryExpression { operator, argument } => {
                if operator == "typeof"
                    && let Some(name) = self.arena.identifier_name(*argument)
                    && env.lookup(name).is_none()
                {
                    return Ok(Value::string("undefined"));
                }
                let value = self.eval(*argument, env)?;
                Ok(match operator.as_str() {
                    "!" => Value::Bool(!value.truthy()),
                    "-" => Value::Number(-value.to_number()),
                    "+" => Value::Number(value.to_number()),
                    "void" => Value::Undefined,
                    "typeof" => Value::string(value.type_of()),
                    _ => return Err(EvalError::Unsupported("unary operator")),
                })
            }
            Node::UpdateExpression {
                operator,
                prefix,
                argument,
            } => {
                let old = self.eval(*argument, env)?.to_number();
                let new = if operator == "++" { old + 1.0 } else { old - 1.0 };
                self.assign_to(*argument, Value::Number(new), env)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Node::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let left = self.eval(*left, env)?;
                let right = self.eval(*right, env)?;
                binary(operator, &left, &right)
            }
            Node::LogicalExpression {
                operator,
                left,
                right,
            } => {
                let left_value = self.eval(*left, env)?;
                let short_circuit = match operator.as_str() {
                    "&&" => !left_value.truthy(),
                    "||" => left_value.truthy(),
                    _ => !matches!(left_value, Value::Undefined | Value::Null),
                };
                if short_circuit {
                    Ok(left_value)
                } else {
                    self.eval(*right, env)
                }
            }
            Node::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                if self.arena.get(*left).is_some_and(Node::is_pattern) {
                    return Err(EvalError::Unsupported("destructuring assignment"));
                }
                let value = if operator == "=" {
                    self.eval(*right, env)?
                } else {
                    let current = self.eval(*left, env)?;
                    let rhs = self.eval(*right, env)?;
                    binary(operator.trim_end_matches('='), &current, &rhs)?
                };
                self.assign_to(*left, value.clone(), env)?;
                Ok(value)
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(*test, env)?.truthy() {
                    self.eval(*consequent, env)
                } else {
                    self.eval(*alternate, env)
                }
            }
            Node::CallExpression { callee, arguments } => {
                let function = self.eval(*callee, env)?;
                let mut args = Vec::with_capacity(arguments.len());
                for &argument in arguments {
                    args.push(self.eval(argument, env)?);
                }
                self.call(function, args)
            }
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                let target = self.eval(*object, env)?;
                let key = self.property_key(*property, *computed, env)?;
                get_property(&target, &key)
            }
            Node::SequenceExpression { expressions } => {
                let mut last = Value::Undefined;
                for &expression in expressions {
                    last = self.eval(expression, env)?;
                }
                Ok(last)
            }
            other => Err(EvalError::Unsupported(other.kind_name())),
        }
    }

    fn property_key(&mut self, key: NodeIndex, computed: bool, env: &Rc<Env>) -> Result<String, EvalError> {
        if computed {
            return Ok(self.eval(key, env)?.to_js_string());
        }
        match self.node(key)? {
            Node::Identifier { name } => Ok(name.clone()),
            Node::Literal { value, .. } => Ok(match value {
                LiteralValue::String(s) => s.clone(),
                LiteralValue::Number(n) => format_number(*n),
                _ => return Err(EvalError::Unsupported("literal key")),
            }),
            _ => Err(EvalError::Unsupported("property key")),
        }
    }

    fn assign_to(&mut self, target: NodeIndex, value: Value, env: &Rc<Env>) -> Result<(), EvalError> {
        match self.node(target)? {
            Node::Identifier { name } => {
                env.assign(name, value);
                Ok(())
            }
            Node::MemberExpression {
                object,
                property,
                computed,
            } => {
                let target = self.eval(*object, env)?;
                let key = self.property_key(*property, *computed, env)?;
                set_property(&target, key, value)
            }
            _ => Err(EvalError::Unsupported("assignment target")),
        }
    }

    fn call(&mut self, function: Value, args: Vec<Value>) -> Result<Value, EvalError> {
        let Value::Function(closure) = function else {
            return Err(EvalError::TypeError(format!("{function} is not a function")));
        };
        let env = Env::new(Some(Rc::clone(&closure.env)));
        for (i, &param) in closure.params.iter().enumerate() {
            let Some(name) = self.arena.identifier_name(param) else {
                return Err(EvalError::Unsupported("pattern parameter"));
            };
            env.define(name, args.get(i).cloned().unwrap_or(Value::Undefined));
        }
        if !closure.is_arrow {
            env.define("arguments", Value::array(args));
        }
        if closure.expression {
            return self.eval(closure.body, &env);
        }
        match self.run_function_body(closure.body, &env)? {
            Completion::Return(value) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }
}

fn binary(operator: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    Ok(match operator {
        "+" => {
            if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
                Value::string(&format!("{}{}", left.to_js_string(), right.to_js_string()))
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        "-" => Value::Number(left.to_number() - right.to_number()),
        "*" => Value::Number(left.to_number() * right.to_number()),
        "/" => Value::Number(left.to_number() / right.to_number()),
        "%" => Value::Number(left.to_number() % right.to_number()),
        "**" => Value::Number(left.to_number().powf(right.to_number())),
        "===" => Value::Bool(left.strict_equals(right)),
        "!==" => Value::Bool(!left.strict_equals(right)),
        "==" => Value::Bool(left.loose_equals(right)),
        "!=" => Value::Bool(!left.loose_equals(right)),
        "<" => Value::Bool(left.to_number() < right.to_number()),
        ">" => Value::Bool(left.to_number() > right.to_number()),
        "<=" => Value::Bool(left.to_number() <= right.to_number()),
        ">=" => Value::Bool(left.to_number() >= right.to_number()),
        _ => return Err(EvalError::Unsupported("binary operator")),
    })
}

fn get_property(target: &Value, key: &str) -> Result<Value, EvalError> {
    match target {
        Value::Undefined | Value::Null => Err(EvalError::TypeError(format!(
            "Cannot read properties of {target} (reading '{key}')"
        ))),
        Value::Array(items) => {
            let items = items.borrow();
            if key == "length" {
                return Ok(Value::Number(items.len() as f64));
            }
            Ok(key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(Value::Undefined))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            if key == "length" {
                return Ok(Value::Number(chars.len() as f64));
            }
            Ok(key
                .parse::<usize>()
                .ok()
                .and_then(|i| chars.get(i))
                .map(|c| Value::string(&c.to_string()))
                .unwrap_or(Value::Undefined))
        }
        Value::Object(props) => Ok(props
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Undefined)),
        Value::Bool(_) | Value::Number(_) | Value::Function(_) => Ok(Value::Undefined),
    }
}

fn set_property(target: &Value, key: String, value: Value) -> Result<(), EvalError> {
    match target {
        Value::Undefined | Value::Null => Err(EvalError::TypeError(format!(
            "Cannot set properties of {target} (setting '{key}')"
        ))),
        Value::Array(items) => {
            if let Ok(index) = key.parse::<usize>() {
                let mut items = items.borrow_mut();
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
            }
            Ok(())
        }
        Value::Object(props) => {
            set_object_property(props, key, value);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn set_object_property(object: &Rc<RefCell<Vec<(String, Value)>>>, key: String, value: Value) {
    let mut props = object.borrow_mut();
    if let Some(slot) = props.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        props.push((key, value));
    }
}

#[cfg(test)]
#[path = "../tests/eval_tests.rs"]
mod tests;
