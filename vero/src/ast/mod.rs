//! Abstract Syntax Tree definitions

mod builtin;
mod node;
mod source;
mod span;

pub use builtin::*;
pub use node::*;
pub use source::*;
pub use span::*;
