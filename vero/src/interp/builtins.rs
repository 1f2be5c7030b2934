//! Native functions and the global constants

use super::context::{Context, Frame};
use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::value::{Value, ValueKind};
use crate::ast::{BinOp, Builtin, Span};
use std::rc::Rc;

/// Bind the constants and every builtin in `globals`
pub fn register_globals(globals: &EnvRef) {
    let mut scope = globals.borrow_mut();
    scope.define("null", Value::null());
    scope.define("true", Value::boolean(true));
    scope.define("false", Value::boolean(false));
    scope.define("pi", Value::float(std::f64::consts::PI));
    for builtin in Builtin::ALL {
        scope.define(builtin.name(), Value::new(ValueKind::Builtin(builtin)));
    }
}

impl Interpreter {
    /// Call a builtin from the call site `span`
    pub(super) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: Vec<Value>,
        span: Span,
        ctx: &Context,
    ) -> InterpResult<Value> {
        if let Some(params) = builtin.params()
            && params.len() != args.len()
        {
            return Err(RuntimeError::arity_mismatch(
                params.len(),
                args.len(),
                span,
                &ctx.frame,
            ));
        }

        tracing::debug!(builtin = %builtin, args = args.len(), "builtin call");
        let frame = Frame::child(builtin.name(), &ctx.frame, span);
        let call = BuiltinCall { span, frame: &frame };

        match builtin {
            Builtin::Print => self.builtin_print(&args, &call),
            Builtin::Input => self.builtin_input(&call),
            Builtin::InputInt => self.builtin_input_int(&call),
            Builtin::Clear => self.builtin_clear(&call),
            Builtin::IsNumber => Ok(Value::boolean(args[0].is_number())),
            Builtin::IsString => Ok(Value::boolean(matches!(args[0].kind, ValueKind::Str(_)))),
            Builtin::IsList => Ok(Value::boolean(matches!(args[0].kind, ValueKind::List(_)))),
            Builtin::IsFunction => Ok(Value::boolean(matches!(
                args[0].kind,
                ValueKind::Function(_) | ValueKind::Builtin(_)
            ))),
            Builtin::Append => builtin_append(args, &call),
            Builtin::Pop => builtin_pop(&args, &call),
            Builtin::Extend => builtin_extend(args, &call),
            Builtin::Len => builtin_len(&args[0], &call),
            Builtin::Run => self.builtin_run(&args[0], &call),
        }
    }

    fn builtin_print(&mut self, args: &[Value], call: &BuiltinCall<'_>) -> InterpResult<Value> {
        let line: String = args.iter().map(ToString::to_string).collect();
        self.console
            .write_line(&line)
            .map_err(|err| call.io(&err))?;
        Ok(Value::null())
    }

    fn builtin_input(&mut self, call: &BuiltinCall<'_>) -> InterpResult<Value> {
        let line = self.console.read_line().map_err(|err| call.io(&err))?;
        Ok(Value::string(line.unwrap_or_default()))
    }

    fn builtin_input_int(&mut self, call: &BuiltinCall<'_>) -> InterpResult<Value> {
        let line = self
            .console
            .read_line()
            .map_err(|err| call.io(&err))?
            .unwrap_or_default();
        match line.trim().parse::<i64>() {
            Ok(n) => Ok(Value::int(n)),
            Err(_) => Err(RuntimeError::invalid_input(&line, call.span, call.frame)),
        }
    }

    fn builtin_clear(&mut self, call: &BuiltinCall<'_>) -> InterpResult<Value> {
        self.console.clear().map_err(|err| call.io(&err))?;
        Ok(Value::null())
    }

    /// Run a script file in the shared global scope
    fn builtin_run(&mut self, path: &Value, call: &BuiltinCall<'_>) -> InterpResult<Value> {
        let ValueKind::Str(path) = &path.kind else {
            return Err(call.invalid("Filename must be a string"));
        };
        let text = std::fs::read_to_string(path)
            .map_err(|_| RuntimeError::file_not_found(path, call.span, call.frame))?;

        tracing::debug!(path = %path, "running nested script");
        self.run(path, &text)
            .map(|_| Value::null())
            .map_err(|err| {
                let rendered = err.render(self.sources());
                RuntimeError::script_failed(path, &rendered, call.span, call.frame)
            })
    }
}

/// Location of a builtin call, for raising errors
struct BuiltinCall<'a> {
    span: Span,
    frame: &'a Rc<Frame>,
}

impl BuiltinCall<'_> {
    fn invalid(&self, message: &str) -> RuntimeError {
        RuntimeError::invalid_argument(message, self.span, self.frame)
    }

    fn io(&self, err: &std::io::Error) -> RuntimeError {
        RuntimeError::io(err, self.span, self.frame)
    }
}

fn builtin_append(mut args: Vec<Value>, call: &BuiltinCall<'_>) -> InterpResult<Value> {
    let value = args.pop();
    match (args.pop(), value) {
        (
            Some(Value {
                kind: ValueKind::List(mut items),
                ..
            }),
            Some(value),
        ) => {
            items.push(value);
            Ok(Value::list(items))
        }
        _ => Err(call.invalid("First argument must be a list")),
    }
}

fn builtin_pop(args: &[Value], call: &BuiltinCall<'_>) -> InterpResult<Value> {
    let (list, index) = (&args[0], &args[1]);
    if !matches!(list.kind, ValueKind::List(_)) {
        return Err(call.invalid("First argument must be a list"));
    }
    if !matches!(index.kind, ValueKind::Int(_)) {
        return Err(call.invalid("Index must be an integer"));
    }
    list.binary_op(BinOp::Sub, index).map_err(|err| err.at(call.span))
}

fn builtin_extend(args: Vec<Value>, call: &BuiltinCall<'_>) -> InterpResult<Value> {
    let mut args = args.into_iter();
    match (args.next().map(|v| v.kind), args.next().map(|v| v.kind)) {
        (Some(ValueKind::List(mut items)), Some(ValueKind::List(more))) => {
            items.extend(more);
            Ok(Value::list(items))
        }
        (Some(ValueKind::List(_)), _) => Err(call.invalid("Second argument must be a list")),
        _ => Err(call.invalid("First argument must be a list")),
    }
}

fn builtin_len(value: &Value, call: &BuiltinCall<'_>) -> InterpResult<Value> {
    let len = match &value.kind {
        ValueKind::List(items) => items.len(),
        ValueKind::Str(s) => s.len(),
        _ => return Err(call.invalid("Argument must be a list or a string")),
    };
    Ok(Value::int(len as i64))
}
