//! Tree-walking interpreter
//!
//! Evaluation threads a [`RuntimeResult`] through every node: a value, or a
//! [`Flow`] carrying an error or a pending `return`/`break`/`continue` that
//! each composite node propagates with `?`.

mod builtins;
mod console;
mod context;
mod env;
mod error;
mod eval;
mod value;

pub use builtins::register_globals;
pub use console::{BufferConsole, Console, StdConsole};
pub use context::{Context, Frame, PROGRAM_CONTEXT};
pub use env::{child_env, EnvRef, Environment};
pub use error::{ErrorKind, Flow, InterpResult, RuntimeError, RuntimeResult, TraceFrame};
pub use eval::Interpreter;
pub use value::{Closure, Value, ValueKind};
