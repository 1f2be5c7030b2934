//! Runtime values for the interpreter
//!
//! Every value carries the span and frame it was last stamped with. Both are
//! used for diagnostics only, never for lookup.

use super::context::Frame;
use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use crate::ast::{BinOp, Builtin, Node, Span};
use std::fmt;
use std::rc::Rc;

/// Largest string (in bytes) or list (in elements) `*` may build
const MAX_REPEAT_LEN: usize = 1 << 26;

/// A user-defined function together with its defining scope
pub struct Closure {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Node>,
    /// Scope the function was defined in; calls chain their locals to it
    pub env: EnvRef,
    pub auto_return: bool,
}

impl fmt::Debug for Closure {
    // The captured scope may contain this closure, so it is left out
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("auto_return", &self.auto_return)
            .finish_non_exhaustive()
    }
}

/// Runtime value variants
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// 64-bit integer; also used for null and booleans
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    Str(String),
    /// Owned elements; cloning a list copies it
    List(Vec<Value>),
    Function(Rc<Closure>),
    Builtin(Builtin),
}

impl ValueKind {
    fn as_f64(&self) -> Option<f64> {
        match self {
            ValueKind::Int(n) => Some(*n as f64),
            ValueKind::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Repetition count for `*` on strings and lists
    fn as_count(&self) -> Option<i64> {
        match self {
            ValueKind::Int(n) => Some(*n),
            ValueKind::Float(x) => Some(*x as i64),
            _ => None,
        }
    }
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueKind::Int(a), ValueKind::Int(b)) => a == b,
            (ValueKind::Float(a), ValueKind::Float(b)) => a == b,
            (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
            (ValueKind::List(a), ValueKind::List(b)) => a == b,
            (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Builtin(a), ValueKind::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

/// Runtime value
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Span,
    pub frame: Option<Rc<Frame>>,
}

/// Structural equality; positions are ignored
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Value {
            kind,
            span: Span::default(),
            frame: None,
        }
    }

    pub fn int(n: i64) -> Self {
        Self::new(ValueKind::Int(n))
    }

    pub fn float(x: f64) -> Self {
        Self::new(ValueKind::Float(x))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new(ValueKind::Str(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::new(ValueKind::List(items))
    }

    pub fn null() -> Self {
        Self::int(0)
    }

    pub fn boolean(b: bool) -> Self {
        Self::int(i64::from(b))
    }

    /// Re-stamp with a new span and attribution frame
    pub fn stamped(mut self, span: Span, frame: &Rc<Frame>) -> Self {
        self.span = span;
        self.frame = Some(Rc::clone(frame));
        self
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, ValueKind::Int(_) | ValueKind::Float(_))
    }

    /// Numbers are true when nonzero, strings when non-empty; lists and
    /// functions are always true
    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Int(n) => *n != 0,
            ValueKind::Float(x) => *x != 0.0,
            ValueKind::Str(s) => !s.is_empty(),
            ValueKind::List(_) | ValueKind::Function(_) | ValueKind::Builtin(_) => true,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Int(_) => "integer",
            ValueKind::Float(_) => "float",
            ValueKind::Str(_) => "string",
            ValueKind::List(_) => "list",
            ValueKind::Function(_) => "function",
            ValueKind::Builtin(_) => "built-in function",
        }
    }

    // ====================================================================
    // Helpers
    // ====================================================================

    fn illegal(&self, other: Option<&Value>) -> RuntimeError {
        let span = other.map_or(self.span, |o| self.span.merge(o.span));
        RuntimeError::illegal_operation(span, self.frame.as_ref())
    }

    /// Result of an operation on `self` (and `other`)
    fn derived(&self, other: Option<&Value>, kind: ValueKind) -> Value {
        Value {
            kind,
            span: other.map_or(self.span, |o| self.span.merge(o.span)),
            frame: self.frame.clone(),
        }
    }

    /// Apply a numeric operation; integers stay integers unless either side is a float
    fn numeric(
        &self,
        other: &Value,
        on_int: impl FnOnce(i64, i64) -> InterpResult<ValueKind>,
        on_float: impl FnOnce(f64, f64) -> InterpResult<ValueKind>,
    ) -> InterpResult<Value> {
        let kind = match (&self.kind, &other.kind) {
            (ValueKind::Int(a), ValueKind::Int(b)) => on_int(*a, *b)?,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => on_float(a, b)?,
                _ => return Err(self.illegal(Some(other))),
            },
        };
        Ok(self.derived(Some(other), kind))
    }

    fn compare(&self, other: &Value, test: fn(f64, f64) -> bool) -> InterpResult<Value> {
        match (self.kind.as_f64(), other.kind.as_f64()) {
            (Some(a), Some(b)) => Ok(self.derived(Some(other), ValueKind::Int(i64::from(test(a, b))))),
            _ => Err(self.illegal(Some(other))),
        }
    }

    fn zero_check(&self, divisor: &Value) -> InterpResult<()> {
        if divisor.kind.as_f64() == Some(0.0) {
            Err(RuntimeError::division_by_zero(divisor.span, self.frame.as_ref()))
        } else {
            Ok(())
        }
    }

    /// Copies of a `len`-sized string or list that `count` asks for
    fn repeat_count(&self, other: &Value, len: usize, count: i64) -> InterpResult<usize> {
        let count = usize::try_from(count).unwrap_or(0);
        if len == 0 {
            return Ok(0);
        }
        match len.checked_mul(count) {
            Some(total) if total <= MAX_REPEAT_LEN => Ok(count),
            _ => Err(RuntimeError::result_too_large(
                self.span.merge(other.span),
                self.frame.as_ref(),
            )),
        }
    }

    /// Resolve a possibly negative index into `items`
    fn list_index(&self, len: usize, index: &Value) -> InterpResult<usize> {
        let ValueKind::Int(i) = index.kind else {
            return Err(self.illegal(Some(index)));
        };
        let len = len as i64;
        let i = if i < 0 { i + len } else { i };
        if (0..len).contains(&i) {
            Ok(i as usize)
        } else {
            Err(RuntimeError::index_out_of_range(index.span, self.frame.as_ref()))
        }
    }

    // ====================================================================
    // Operations
    // ====================================================================

    fn plus(&self, other: &Value) -> InterpResult<Value> {
        match (&self.kind, &other.kind) {
            (ValueKind::Str(a), ValueKind::Str(b)) => {
                Ok(self.derived(Some(other), ValueKind::Str(format!("{a}{b}"))))
            }
            (ValueKind::List(a), ValueKind::List(b)) => {
                let items = a.iter().chain(b).cloned().collect();
                Ok(self.derived(Some(other), ValueKind::List(items)))
            }
            _ if self.is_number() => self.numeric(
                other,
                |a, b| Ok(ValueKind::Int(a.wrapping_add(b))),
                |a, b| Ok(ValueKind::Float(a + b)),
            ),
            _ => Err(self.illegal(Some(other))),
        }
    }

    /// Numbers subtract; `list - index` removes an element
    fn minus(&self, other: &Value) -> InterpResult<Value> {
        match &self.kind {
            ValueKind::List(items) if other.is_number() => {
                let index = self.list_index(items.len(), other)?;
                let mut items = items.clone();
                items.remove(index);
                Ok(self.derived(Some(other), ValueKind::List(items)))
            }
            _ if self.is_number() => self.numeric(
                other,
                |a, b| Ok(ValueKind::Int(a.wrapping_sub(b))),
                |a, b| Ok(ValueKind::Float(a - b)),
            ),
            _ => Err(self.illegal(Some(other))),
        }
    }

    /// Numbers multiply; strings and lists repeat
    fn times(&self, other: &Value) -> InterpResult<Value> {
        match (&self.kind, other.kind.as_count()) {
            (ValueKind::Str(s), Some(count)) => {
                let count = self.repeat_count(other, s.len(), count)?;
                Ok(self.derived(Some(other), ValueKind::Str(s.repeat(count))))
            }
            (ValueKind::List(items), Some(count)) => {
                let count = self.repeat_count(other, items.len(), count)?;
                let mut repeated = Vec::new();
                repeated
                    .try_reserve_exact(items.len() * count)
                    .map_err(|_| RuntimeError::result_too_large(self.span, self.frame.as_ref()))?;
                for _ in 0..count {
                    repeated.extend(items.iter().cloned());
                }
                Ok(self.derived(Some(other), ValueKind::List(repeated)))
            }
            _ if self.is_number() => self.numeric(
                other,
                |a, b| Ok(ValueKind::Int(a.wrapping_mul(b))),
                |a, b| Ok(ValueKind::Float(a * b)),
            ),
            _ => Err(self.illegal(Some(other))),
        }
    }

    /// Numbers divide (integers truncate); `list / index` reads an element
    fn over(&self, other: &Value) -> InterpResult<Value> {
        match &self.kind {
            ValueKind::List(items) if other.is_number() => {
                let index = self.list_index(items.len(), other)?;
                Ok(items[index].clone())
            }
            _ if self.is_number() => {
                if other.is_number() {
                    self.zero_check(other)?;
                }
                self.numeric(
                    other,
                    |a, b| Ok(ValueKind::Int(a.wrapping_div(b))),
                    |a, b| Ok(ValueKind::Float(a / b)),
                )
            }
            _ => Err(self.illegal(Some(other))),
        }
    }

    /// Remainder with the sign of the dividend
    fn modulo(&self, other: &Value) -> InterpResult<Value> {
        if !self.is_number() {
            return Err(self.illegal(Some(other)));
        }
        if other.is_number() {
            self.zero_check(other)?;
        }
        self.numeric(
            other,
            |a, b| Ok(ValueKind::Int(a.wrapping_rem(b))),
            |a, b| Ok(ValueKind::Float(a % b)),
        )
    }

    /// Integer powers stay integral while they fit; negative exponents give floats
    fn power(&self, other: &Value) -> InterpResult<Value> {
        if !self.is_number() {
            return Err(self.illegal(Some(other)));
        }
        self.numeric(
            other,
            |a, b| {
                let exact = u32::try_from(b).ok().and_then(|e| a.checked_pow(e));
                Ok(match exact {
                    Some(n) => ValueKind::Int(n),
                    None => ValueKind::Float((a as f64).powf(b as f64)),
                })
            },
            |a, b| Ok(ValueKind::Float(a.powf(b))),
        )
    }

    fn equal(&self, other: &Value) -> InterpResult<Value> {
        match (&self.kind, &other.kind) {
            (ValueKind::Str(a), ValueKind::Str(b)) => {
                Ok(self.derived(Some(other), ValueKind::Int(i64::from(a == b))))
            }
            _ => self.compare(other, |a, b| a == b),
        }
    }

    fn not_equal(&self, other: &Value) -> InterpResult<Value> {
        match (&self.kind, &other.kind) {
            (ValueKind::Str(a), ValueKind::Str(b)) => {
                Ok(self.derived(Some(other), ValueKind::Int(i64::from(a != b))))
            }
            _ => self.compare(other, |a, b| a != b),
        }
    }

    fn less(&self, other: &Value) -> InterpResult<Value> {
        self.compare(other, |a, b| a < b)
    }

    fn greater(&self, other: &Value) -> InterpResult<Value> {
        self.compare(other, |a, b| a > b)
    }

    fn less_equal(&self, other: &Value) -> InterpResult<Value> {
        self.compare(other, |a, b| a <= b)
    }

    fn greater_equal(&self, other: &Value) -> InterpResult<Value> {
        self.compare(other, |a, b| a >= b)
    }

    fn both(&self, other: &Value) -> InterpResult<Value> {
        if self.is_number() && other.is_number() {
            let both = self.is_true() && other.is_true();
            Ok(self.derived(Some(other), ValueKind::Int(i64::from(both))))
        } else {
            Err(self.illegal(Some(other)))
        }
    }

    fn either(&self, other: &Value) -> InterpResult<Value> {
        if self.is_number() && other.is_number() {
            let either = self.is_true() || other.is_true();
            Ok(self.derived(Some(other), ValueKind::Int(i64::from(either))))
        } else {
            Err(self.illegal(Some(other)))
        }
    }

    /// Apply a binary operator; the result spans both operands
    pub fn binary_op(&self, op: BinOp, other: &Value) -> InterpResult<Value> {
        match op {
            BinOp::Add => self.plus(other),
            BinOp::Sub => self.minus(other),
            BinOp::Mul => self.times(other),
            BinOp::Div => self.over(other),
            BinOp::Mod => self.modulo(other),
            BinOp::Pow => self.power(other),
            BinOp::Eq => self.equal(other),
            BinOp::Ne => self.not_equal(other),
            BinOp::Lt => self.less(other),
            BinOp::Gt => self.greater(other),
            BinOp::Le => self.less_equal(other),
            BinOp::Ge => self.greater_equal(other),
            BinOp::And => self.both(other),
            BinOp::Or => self.either(other),
        }
    }

    pub fn logical_not(&self) -> InterpResult<Value> {
        if self.is_number() {
            Ok(self.derived(None, ValueKind::Int(i64::from(!self.is_true()))))
        } else {
            Err(self.illegal(None))
        }
    }

    /// Unary minus; defined for numbers only
    pub fn negated(&self) -> InterpResult<Value> {
        if !self.is_number() {
            return Err(self.illegal(None));
        }
        let minus_one = Value {
            kind: ValueKind::Int(-1),
            span: self.span,
            frame: self.frame.clone(),
        };
        self.times(&minus_one)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int(n) => write!(f, "{n}"),
            // Debug keeps the fractional part: 2.0, not 2
            ValueKind::Float(x) => write!(f, "{x:?}"),
            ValueKind::Str(s) => f.write_str(s),
            ValueKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ValueKind::Function(closure) => {
                write!(f, "<function {}>", closure.name.as_deref().unwrap_or("<anonymous>"))
            }
            ValueKind::Builtin(builtin) => write!(f, "<built-in function {builtin}>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;

    fn ints(ns: &[i64]) -> Value {
        Value::list(ns.iter().copied().map(Value::int).collect())
    }

    // ====================================================================
    // Display
    // ====================================================================

    #[test]
    fn test_value_display() {
        assert_eq!(Value::int(42).to_string(), "42");
        assert_eq!(Value::float(3.25).to_string(), "3.25");
        assert_eq!(Value::float(2.0).to_string(), "2.0");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(ints(&[1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(
            Value::list(vec![Value::string("a"), ints(&[])]).to_string(),
            "[a, []]"
        );
        assert_eq!(
            Value::new(ValueKind::Builtin(Builtin::Len)).to_string(),
            "<built-in function len>"
        );
    }

    // ====================================================================
    // Truthiness
    // ====================================================================

    #[test]
    fn test_value_truthy() {
        assert!(Value::int(1).is_true());
        assert!(!Value::int(0).is_true());
        assert!(!Value::float(0.0).is_true());
        assert!(Value::float(0.5).is_true());
        assert!(Value::string("x").is_true());
        assert!(!Value::string("").is_true());
        // Lists are always true, even when empty
        assert!(ints(&[]).is_true());
    }

    // ====================================================================
    // Numbers
    // ====================================================================

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(Value::int(7).plus(&Value::int(3)).unwrap(), Value::int(10));
        assert_eq!(Value::int(7).minus(&Value::int(3)).unwrap(), Value::int(4));
        assert_eq!(Value::int(7).times(&Value::int(3)).unwrap(), Value::int(21));
        assert_eq!(Value::int(7).over(&Value::int(2)).unwrap(), Value::int(3));
        assert_eq!(Value::int(-7).over(&Value::int(2)).unwrap(), Value::int(-3));
        assert_eq!(Value::int(-7).modulo(&Value::int(3)).unwrap(), Value::int(-1));
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        assert_eq!(Value::int(1).plus(&Value::float(0.5)).unwrap(), Value::float(1.5));
        assert_eq!(Value::float(1.0).times(&Value::int(3)).unwrap(), Value::float(3.0));
        assert_eq!(Value::int(7).over(&Value::float(2.0)).unwrap(), Value::float(3.5));
    }

    #[test]
    fn test_int_overflow_wraps() {
        let max = Value::int(i64::MAX);
        assert_eq!(max.plus(&Value::int(1)).unwrap(), Value::int(i64::MIN));
    }

    #[test]
    fn test_division_by_zero() {
        let err = Value::int(1).over(&Value::int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = Value::float(1.0).over(&Value::float(0.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = Value::int(1).modulo(&Value::int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_pow() {
        assert_eq!(Value::int(2).power(&Value::int(10)).unwrap(), Value::int(1024));
        assert_eq!(Value::int(2).power(&Value::int(-1)).unwrap(), Value::float(0.5));
        assert_eq!(Value::float(4.0).power(&Value::float(0.5)).unwrap(), Value::float(2.0));
        // Too large for i64: promotes instead of wrapping
        assert!(matches!(
            Value::int(10).power(&Value::int(30)).unwrap().kind,
            ValueKind::Float(_)
        ));
    }

    #[test]
    fn test_comparisons_cross_subtype() {
        assert_eq!(Value::int(1).equal(&Value::float(1.0)).unwrap(), Value::int(1));
        assert_eq!(Value::int(1).less(&Value::float(1.5)).unwrap(), Value::int(1));
        assert_eq!(Value::int(2).greater_equal(&Value::int(3)).unwrap(), Value::int(0));
        assert_eq!(Value::int(2).not_equal(&Value::int(3)).unwrap(), Value::int(1));
    }

    #[test]
    fn test_logic() {
        assert_eq!(Value::int(1).both(&Value::int(0)).unwrap(), Value::int(0));
        assert_eq!(Value::int(1).either(&Value::int(0)).unwrap(), Value::int(1));
        assert_eq!(Value::int(0).logical_not().unwrap(), Value::int(1));
        assert_eq!(Value::float(2.5).logical_not().unwrap(), Value::int(0));
    }

    #[test]
    fn test_negated() {
        assert_eq!(Value::int(5).negated().unwrap(), Value::int(-5));
        assert_eq!(Value::float(1.5).negated().unwrap(), Value::float(-1.5));
        assert_eq!(Value::int(i64::MIN).negated().unwrap(), Value::int(i64::MIN));
    }

    #[test]
    fn test_negated_rejects_non_numbers() {
        let err = Value::string("ab").negated().unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalOperation);
        assert_eq!(ints(&[1, 2]).negated().unwrap_err().kind, ErrorKind::IllegalOperation);
    }

    // ====================================================================
    // Strings
    // ====================================================================

    #[test]
    fn test_string_ops() {
        let s = Value::string("ab");
        assert_eq!(s.plus(&Value::string("c")).unwrap(), Value::string("abc"));
        assert_eq!(s.times(&Value::int(3)).unwrap(), Value::string("ababab"));
        assert_eq!(s.times(&Value::int(-1)).unwrap(), Value::string(""));
        assert_eq!(s.equal(&Value::string("ab")).unwrap(), Value::int(1));
        assert_eq!(s.not_equal(&Value::string("ab")).unwrap(), Value::int(0));
    }

    #[test]
    fn test_repeat_size_limit() {
        let err = Value::string("ab").times(&Value::int(i64::MAX)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ResultTooLarge);
        assert_eq!(err.message, "Result too large");
        let err = ints(&[1]).times(&Value::int(i64::MAX)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ResultTooLarge);
        let over = Value::int(MAX_REPEAT_LEN as i64 + 1);
        assert_eq!(Value::string("a").times(&over).unwrap_err().kind, ErrorKind::ResultTooLarge);
        // Empty operands never grow
        assert_eq!(Value::string("").times(&Value::int(i64::MAX)).unwrap(), Value::string(""));
        assert_eq!(ints(&[]).times(&Value::int(i64::MAX)).unwrap(), ints(&[]));
        assert_eq!(Value::string("ab").times(&Value::float(2.9)).unwrap(), Value::string("abab"));
    }

    #[test]
    fn test_string_illegal_ops() {
        let s = Value::string("ab");
        assert_eq!(s.minus(&Value::int(1)).unwrap_err().kind, ErrorKind::IllegalOperation);
        assert_eq!(s.plus(&Value::int(1)).unwrap_err().kind, ErrorKind::IllegalOperation);
        assert_eq!(Value::int(1).plus(&s).unwrap_err().kind, ErrorKind::IllegalOperation);
        assert_eq!(s.logical_not().unwrap_err().kind, ErrorKind::IllegalOperation);
        assert_eq!(s.less(&Value::string("b")).unwrap_err().kind, ErrorKind::IllegalOperation);
    }

    // ====================================================================
    // Lists
    // ====================================================================

    #[test]
    fn test_list_index() {
        let l = ints(&[1, 2, 3]);
        assert_eq!(l.over(&Value::int(1)).unwrap(), Value::int(2));
        assert_eq!(l.over(&Value::int(-1)).unwrap(), Value::int(3));
        assert_eq!(l.over(&Value::int(5)).unwrap_err().kind, ErrorKind::IndexOutOfRange);
        assert_eq!(l.over(&Value::int(-4)).unwrap_err().kind, ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_list_remove() {
        let l = ints(&[1, 2, 3]);
        assert_eq!(l.minus(&Value::int(0)).unwrap(), ints(&[2, 3]));
        assert_eq!(l.minus(&Value::int(-1)).unwrap(), ints(&[1, 2]));
        // The original is untouched
        assert_eq!(l, ints(&[1, 2, 3]));
        assert_eq!(ints(&[]).minus(&Value::int(0)).unwrap_err().kind, ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_list_concat_and_repeat() {
        assert_eq!(ints(&[1]).plus(&ints(&[2, 3])).unwrap(), ints(&[1, 2, 3]));
        assert_eq!(ints(&[1, 2]).times(&Value::int(2)).unwrap(), ints(&[1, 2, 1, 2]));
        assert_eq!(
            ints(&[1]).plus(&Value::int(2)).unwrap_err().kind,
            ErrorKind::IllegalOperation
        );
    }

    #[test]
    fn test_illegal_operation_span_covers_both_operands() {
        use crate::ast::{FileId, Position};
        let mut left = Value::string("a");
        left.span = Span::new(FileId(0), Position::new(0, 0, 0), Position::new(3, 0, 3));
        let mut right = Value::int(1);
        right.span = Span::new(FileId(0), Position::new(6, 0, 6), Position::new(7, 0, 7));
        let err = left.minus(&right).unwrap_err();
        assert_eq!(err.span.start.index, 0);
        assert_eq!(err.span.end.index, 7);
    }
}
