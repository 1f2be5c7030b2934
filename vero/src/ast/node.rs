//! Syntax tree nodes

use super::Span;
use serde::Serialize;
use std::rc::Rc;

/// A syntax tree node with the span enclosing all of its children
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Node variants
#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (escapes already resolved)
    Str(String),
    /// List literal: [a, b, c]
    List(Vec<Node>),

    /// Variable reference
    VarAccess(String),
    /// Binding: let name = value
    VarAssign { name: String, value: Box<Node> },

    /// Binary operation
    BinOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Unary operation
    UnaryOp { op: UnaryOp, operand: Box<Node> },

    /// if / elif / else chain; `else` is stored as an arm with condition 1
    If { cases: Vec<IfCase> },

    /// for var = start to end [step step] { body }
    For {
        var: String,
        start: Box<Node>,
        end: Box<Node>,
        step: Option<Box<Node>>,
        body: Box<Node>,
        /// Block-form loops evaluate to null instead of a list
        returns_null: bool,
    },

    /// while condition { body }
    While {
        condition: Box<Node>,
        body: Box<Node>,
        returns_null: bool,
    },

    /// Function definition, named or anonymous
    FuncDef {
        name: Option<String>,
        params: Vec<String>,
        /// Shared with every closure created from this definition
        body: Rc<Node>,
        /// Inline bodies yield their value without an explicit `return`
        auto_return: bool,
    },

    /// Call: callee(args...)
    Call { callee: Box<Node>, args: Vec<Node> },

    Return(Option<Box<Node>>),
    Continue,
    Break,

    /// Statement sequence; evaluates to the list of statement values
    Block(Vec<Node>),
}

/// One arm of an if chain
#[derive(Debug, Clone, Serialize)]
pub struct IfCase {
    pub condition: Node,
    pub body: Node,
    /// Block-form arms evaluate to null
    pub returns_null: bool,
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Logical
    And,
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Pow => write!(f, "^"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "and"),
            BinOp::Or => write!(f, "or"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Identity (+)
    Plus,
    /// Negation (-)
    Minus,
    /// Logical not
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}
