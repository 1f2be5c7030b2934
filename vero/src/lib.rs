//! Vero Interpreter Library
//!
//! A small dynamically typed scripting language: source text is tokenized,
//! parsed into a syntax tree and evaluated directly by a tree-walking
//! interpreter.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use ast::Span;
pub use config::Config;
pub use error::{Result, VeroError};
pub use interp::Interpreter;
