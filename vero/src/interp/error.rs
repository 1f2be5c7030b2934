//! Runtime errors and non-local control flow

use super::context::Frame;
use super::Value;
use crate::ast::Span;
use std::rc::Rc;
use thiserror::Error;

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name not bound anywhere on the scope chain
    UndefinedName,
    /// Operator not defined for the operand types
    IllegalOperation,
    /// Division or remainder by zero
    DivisionByZero,
    /// Argument count mismatch
    ArityMismatch,
    /// List index outside the list
    IndexOutOfRange,
    /// Call of a value that is not a function
    NotCallable,
    /// `run` could not read its file
    FileNotFound,
    /// Builtin argument of the wrong type
    InvalidArgument,
    /// `input_int` read something that is not an integer
    InvalidInput,
    /// A script loaded by `run` failed
    ScriptFailed,
    /// Call depth limit exceeded
    StackOverflow,
    /// `break` or `continue` outside a loop
    ControlFlowEscape,
    /// Repetition result above the size limit
    ResultTooLarge,
    /// Console failure
    Io,
}

/// One traceback line: where a context was executing and its name
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub span: Span,
    pub context: String,
}

/// Runtime error during interpretation
#[derive(Debug, Clone, Error)]
#[error("Runtime Error: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Primary location; moved to the call site each time the error leaves a call
    pub span: Span,
    /// Outermost context first
    pub traceback: Vec<TraceFrame>,
}

/// Build the traceback of an error raised at `span` while executing `frame`
fn capture_traceback(span: Span, frame: Option<&Rc<Frame>>) -> Vec<TraceFrame> {
    let Some(frame) = frame else {
        return Vec::new();
    };
    let mut traceback = Vec::new();
    let mut at = Some(span);
    for fr in frame.ancestors() {
        let Some(span) = at else { break };
        traceback.push(TraceFrame {
            span,
            context: fr.display_name.clone(),
        });
        at = fr.entry;
    }
    traceback.reverse();
    traceback
}

impl RuntimeError {
    /// Error raised at `span` while executing `frame`
    pub fn raise(
        kind: ErrorKind,
        message: impl Into<String>,
        span: Span,
        frame: Option<&Rc<Frame>>,
    ) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
            span,
            traceback: capture_traceback(span, frame),
        }
    }

    pub fn undefined_name(name: &str, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::UndefinedName,
            format!("Variable '{name}' is not defined"),
            span,
            Some(frame),
        )
    }

    pub fn illegal_operation(span: Span, frame: Option<&Rc<Frame>>) -> Self {
        Self::raise(ErrorKind::IllegalOperation, "Illegal operation", span, frame)
    }

    pub fn division_by_zero(span: Span, frame: Option<&Rc<Frame>>) -> Self {
        Self::raise(ErrorKind::DivisionByZero, "Division by zero", span, frame)
    }

    pub fn index_out_of_range(span: Span, frame: Option<&Rc<Frame>>) -> Self {
        Self::raise(ErrorKind::IndexOutOfRange, "Index out of range", span, frame)
    }

    pub fn arity_mismatch(expected: usize, got: usize, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::ArityMismatch,
            format!("Expected {expected} arguments, but got {got}"),
            span,
            Some(frame),
        )
    }

    pub fn not_callable(span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::NotCallable,
            "Cannot call a non-function value",
            span,
            Some(frame),
        )
    }

    pub fn file_not_found(path: &str, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::FileNotFound,
            format!("File: '{path}' not found"),
            span,
            Some(frame),
        )
    }

    pub fn invalid_argument(message: impl Into<String>, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(ErrorKind::InvalidArgument, message, span, Some(frame))
    }

    pub fn invalid_input(line: &str, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::InvalidInput,
            format!("Invalid input '{line}': expected an integer"),
            span,
            Some(frame),
        )
    }

    /// Wrap the rendering of an error raised by a nested script
    pub fn script_failed(path: &str, rendered: &str, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::ScriptFailed,
            format!("Error while executing script: '{path}'\n{rendered}"),
            span,
            Some(frame),
        )
    }

    pub fn stack_overflow(span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::StackOverflow,
            "Maximum recursion depth exceeded",
            span,
            Some(frame),
        )
    }

    /// `what` is "break" or "continue"
    pub fn control_flow_escape(what: &str, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(
            ErrorKind::ControlFlowEscape,
            format!("'{what}' outside of a loop"),
            span,
            Some(frame),
        )
    }

    pub fn result_too_large(span: Span, frame: Option<&Rc<Frame>>) -> Self {
        Self::raise(ErrorKind::ResultTooLarge, "Result too large", span, frame)
    }

    pub fn io(err: &std::io::Error, span: Span, frame: &Rc<Frame>) -> Self {
        Self::raise(ErrorKind::Io, format!("IO error: {err}"), span, Some(frame))
    }

    /// Move the primary location, keeping the traceback
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Why an evaluation stopped before producing a value
///
/// Every composite evaluation checks for one of these after each
/// sub-evaluation and propagates it with `?`.
#[derive(Debug, Clone)]
pub enum Flow {
    Error(RuntimeError),
    Return(Value),
    Break(Span),
    Continue(Span),
}

impl From<RuntimeError> for Flow {
    fn from(err: RuntimeError) -> Self {
        Flow::Error(err)
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

/// Result of evaluating a node
pub type RuntimeResult = Result<Value, Flow>;
