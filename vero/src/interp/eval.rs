//! Tree-walking evaluator

use super::builtins::register_globals;
use super::console::{Console, StdConsole};
use super::context::{Context, Frame};
use super::env::{child_env, EnvRef, Environment};
use super::error::{Flow, InterpResult, RuntimeError, RuntimeResult};
use super::value::{Closure, Value, ValueKind};
use crate::ast::{BinOp, IfCase, Node, NodeKind, SourceMap, Span, UnaryOp};
use crate::config::Config;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::parser::parse;
use std::rc::Rc;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
///
/// Owns the global scope, which persists across calls to [`Interpreter::run`],
/// and every source text it has seen so errors can be rendered later.
pub struct Interpreter {
    /// Global environment
    globals: EnvRef,
    /// Every source run so far
    sources: SourceMap,
    pub(super) console: Box<dyn Console>,
    config: Config,
    /// Current call depth
    depth: usize,
}

impl Interpreter {
    /// Create a new interpreter on stdin/stdout
    pub fn new() -> Self {
        Self::with_console(Box::new(StdConsole))
    }

    pub fn with_console(console: Box<dyn Console>) -> Self {
        let globals = Environment::new().into_ref();
        register_globals(&globals);
        Interpreter {
            globals,
            sources: SourceMap::new(),
            console,
            config: Config::default(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    /// Sources seen so far, for rendering errors
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Tokenize, parse and evaluate `text` in the global scope
    ///
    /// A program evaluates to the list of its statement values, unless a
    /// top-level `return` ends it early with its own value.
    pub fn run(&mut self, name: &str, text: &str) -> Result<Value> {
        let file = self.sources.add(name, text);
        let tokens = tokenize(file, text)?;
        let program = parse(tokens)?;

        tracing::debug!(source = name, "run");
        let ctx = Context::new(Frame::root(), Rc::clone(&self.globals));
        let value = match self.eval(&program, &ctx) {
            Ok(value) | Err(Flow::Return(value)) => value,
            Err(Flow::Error(err)) => return Err(err.into()),
            Err(Flow::Break(span)) => {
                return Err(RuntimeError::control_flow_escape("break", span, &ctx.frame).into());
            }
            Err(Flow::Continue(span)) => {
                return Err(RuntimeError::control_flow_escape("continue", span, &ctx.frame).into());
            }
        };
        Ok(value)
    }

    /// Evaluate a node with automatic stack growth for deep recursion
    fn eval(&mut self, node: &Node, ctx: &Context) -> RuntimeResult {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(node, ctx))
    }

    fn eval_inner(&mut self, node: &Node, ctx: &Context) -> RuntimeResult {
        let span = node.span;
        let stamp = |kind: ValueKind| Value::new(kind).stamped(span, &ctx.frame);

        match &node.kind {
            NodeKind::Int(n) => Ok(stamp(ValueKind::Int(*n))),
            NodeKind::Float(x) => Ok(stamp(ValueKind::Float(*x))),
            NodeKind::Str(s) => Ok(stamp(ValueKind::Str(s.clone()))),

            NodeKind::List(elements) => {
                let items = self.eval_all(elements, ctx)?;
                Ok(stamp(ValueKind::List(items)))
            }

            NodeKind::Block(statements) => {
                let values = self.eval_all(statements, ctx)?;
                Ok(stamp(ValueKind::List(values)))
            }

            NodeKind::VarAccess(name) => {
                let value = ctx.env.borrow().get(name);
                match value {
                    Some(value) => Ok(value.stamped(span, &ctx.frame)),
                    None => Err(RuntimeError::undefined_name(name, span, &ctx.frame).into()),
                }
            }

            NodeKind::VarAssign { name, value } => {
                let value = self.eval(value, ctx)?.stamped(span, &ctx.frame);
                ctx.env.borrow_mut().define(name.clone(), value.clone());
                Ok(value)
            }

            NodeKind::BinOp { op, left, right } => {
                let left = self.eval(left, ctx)?;
                let right = self.eval(right, ctx)?;
                Ok(self.binary(*op, &left, &right)?.stamped(span, &ctx.frame))
            }

            NodeKind::UnaryOp { op, operand } => {
                let operand = self.eval(operand, ctx)?;
                let value = match op {
                    UnaryOp::Plus => operand,
                    UnaryOp::Minus => operand.negated()?,
                    UnaryOp::Not => operand.logical_not()?,
                };
                Ok(value.stamped(span, &ctx.frame))
            }

            NodeKind::If { cases } => self.eval_if(cases, span, ctx),

            NodeKind::For {
                var,
                start,
                end,
                step,
                body,
                returns_null,
            } => {
                let start = self.eval(start, ctx)?;
                let end = self.eval(end, ctx)?;
                let step = match step {
                    Some(step) => self.eval(step, ctx)?,
                    None => Value::int(1).stamped(span, &ctx.frame),
                };
                let counter = Counter::new(&start, &end, &step, &ctx.frame)?;

                let mut results = Vec::new();
                for current in counter {
                    ctx.env
                        .borrow_mut()
                        .define(var.clone(), stamp(current));
                    match self.eval(body, ctx) {
                        Ok(value) => results.push(value),
                        Err(Flow::Continue(_)) => {}
                        Err(Flow::Break(_)) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(self.loop_result(results, *returns_null, span, ctx))
            }

            NodeKind::While {
                condition,
                body,
                returns_null,
            } => {
                let mut results = Vec::new();
                loop {
                    if !self.eval(condition, ctx)?.is_true() {
                        break;
                    }
                    match self.eval(body, ctx) {
                        Ok(value) => results.push(value),
                        Err(Flow::Continue(_)) => {}
                        Err(Flow::Break(_)) => break,
                        Err(other) => return Err(other),
                    }
                }
                Ok(self.loop_result(results, *returns_null, span, ctx))
            }

            NodeKind::FuncDef {
                name,
                params,
                body,
                auto_return,
            } => {
                let closure = Closure {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::clone(body),
                    env: Rc::clone(&ctx.env),
                    auto_return: *auto_return,
                };
                let value = stamp(ValueKind::Function(Rc::new(closure)));
                if let Some(name) = name {
                    // First definition wins
                    let bound = ctx.env.borrow().contains(name);
                    if !bound {
                        ctx.env.borrow_mut().define(name.clone(), value.clone());
                    }
                }
                Ok(value)
            }

            NodeKind::Call { callee, args } => {
                let target = self.eval(callee, ctx)?;
                let args = self.eval_all(args, ctx)?;
                let value = self.call(&target, args, callee, span, ctx)?;
                Ok(value.stamped(span, &ctx.frame))
            }

            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value, ctx)?,
                    None => stamp(ValueKind::Int(0)),
                };
                Err(Flow::Return(value))
            }
            NodeKind::Continue => Err(Flow::Continue(span)),
            NodeKind::Break => Err(Flow::Break(span)),
        }
    }

    /// Evaluate nodes in order, stopping at the first pending signal
    fn eval_all(&mut self, nodes: &[Node], ctx: &Context) -> std::result::Result<Vec<Value>, Flow> {
        nodes.iter().map(|node| self.eval(node, ctx)).collect()
    }

    fn binary(&self, op: BinOp, left: &Value, right: &Value) -> InterpResult<Value> {
        tracing::trace!(%op, left = left.type_name(), right = right.type_name(), "binary op");
        left.binary_op(op, right)
    }

    fn eval_if(&mut self, cases: &[IfCase], span: Span, ctx: &Context) -> RuntimeResult {
        for case in cases {
            if self.eval(&case.condition, ctx)?.is_true() {
                let value = self.eval(&case.body, ctx)?;
                if case.returns_null {
                    break;
                }
                return Ok(value);
            }
        }
        Ok(Value::null().stamped(span, &ctx.frame))
    }

    fn loop_result(&self, results: Vec<Value>, returns_null: bool, span: Span, ctx: &Context) -> Value {
        let kind = if returns_null {
            ValueKind::Int(0)
        } else {
            ValueKind::List(results)
        };
        Value::new(kind).stamped(span, &ctx.frame)
    }

    /// Call `target` from the call site `span`
    fn call(
        &mut self,
        target: &Value,
        args: Vec<Value>,
        callee: &Node,
        span: Span,
        ctx: &Context,
    ) -> InterpResult<Value> {
        match &target.kind {
            ValueKind::Function(closure) => self.call_closure(closure, args, callee, span, ctx),
            ValueKind::Builtin(builtin) => self.call_builtin(*builtin, args, span, ctx),
            _ => Err(RuntimeError::not_callable(span, &ctx.frame)),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Rc<Closure>,
        args: Vec<Value>,
        callee: &Node,
        span: Span,
        ctx: &Context,
    ) -> InterpResult<Value> {
        // Check arity
        if closure.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                closure.params.len(),
                args.len(),
                span,
                &ctx.frame,
            ));
        }

        // Check recursion depth
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::stack_overflow(span, &ctx.frame));
        }

        let frame = Frame::child(display_name(closure, callee), &ctx.frame, span);
        tracing::debug!(function = %frame.display_name, depth = self.depth + 1, "call");

        // Locals chain to the defining scope, not the caller's
        let env = child_env(&closure.env);
        {
            let mut scope = env.borrow_mut();
            for (param, arg) in closure.params.iter().zip(args) {
                let arg = arg.stamped(span, &frame);
                scope.define(param.clone(), arg);
            }
        }
        let inner = Context::new(frame, env);

        self.depth += 1;
        let outcome = self.eval(&closure.body, &inner);
        self.depth -= 1;

        match outcome {
            Ok(value) if closure.auto_return => Ok(value),
            Ok(_) => Ok(Value::null()),
            Err(Flow::Return(value)) => Ok(value),
            Err(Flow::Error(err)) => Err(err.at(span)),
            Err(Flow::Break(at)) => {
                Err(RuntimeError::control_flow_escape("break", at, &inner.frame).at(span))
            }
            Err(Flow::Continue(at)) => {
                Err(RuntimeError::control_flow_escape("continue", at, &inner.frame).at(span))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Name shown in tracebacks for a call of `closure` through `callee`
fn display_name(closure: &Closure, callee: &Node) -> String {
    match (&closure.name, &callee.kind) {
        (Some(name), _) => name.clone(),
        (None, NodeKind::VarAccess(var)) => format!("<{var}>"),
        (None, _) => "<anonymous>".to_string(),
    }
}

/// Values taken by a `for` counter
///
/// The counter runs while it is below the end. A step that is not positive
/// yields nothing, and an integer counter stops instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Counter {
    Int { current: i64, end: i64, step: i64 },
    Float { current: f64, end: f64, step: f64 },
    Done,
}

impl Counter {
    /// Check the loop bounds are numbers; any float among them makes the loop a float loop
    fn new(start: &Value, end: &Value, step: &Value, frame: &Rc<Frame>) -> InterpResult<Self> {
        for bound in [start, end, step] {
            if !bound.is_number() {
                return Err(RuntimeError::invalid_argument(
                    format!("Loop bounds must be numbers, not {}", bound.type_name()),
                    bound.span,
                    frame,
                ));
            }
        }

        let counter = match (&start.kind, &end.kind, &step.kind) {
            (ValueKind::Int(current), ValueKind::Int(end), ValueKind::Int(step)) => {
                Counter::Int { current: *current, end: *end, step: *step }
            }
            _ => {
                let float = |value: &Value| match value.kind {
                    ValueKind::Int(n) => n as f64,
                    ValueKind::Float(x) => x,
                    _ => f64::NAN,
                };
                Counter::Float { current: float(start), end: float(end), step: float(step) }
            }
        };
        Ok(counter)
    }
}

impl Iterator for Counter {
    type Item = ValueKind;

    fn next(&mut self) -> Option<ValueKind> {
        match *self {
            Counter::Int { current, end, step } if step > 0 && current < end => {
                *self = match current.checked_add(step) {
                    Some(next) => Counter::Int { current: next, end, step },
                    None => Counter::Done,
                };
                Some(ValueKind::Int(current))
            }
            Counter::Float { current, end, step } if step > 0.0 && current < end => {
                let next = current + step;
                // A step lost to rounding would never reach the end
                *self = if next > current {
                    Counter::Float { current: next, end, step }
                } else {
                    Counter::Done
                };
                Some(ValueKind::Float(current))
            }
            _ => {
                *self = Counter::Done;
                None
            }
        }
    }
}
