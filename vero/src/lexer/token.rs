//! Token definitions

use crate::ast::{Builtin, Span};
use logos::Logos;
use serde::Serialize;

/// Resolve `\n` and `\t`; any other escaped character stands for itself
fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some(other) => result.push(other),
                None => {}
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Vero token kind
#[derive(Logos, Debug, Clone, PartialEq, Serialize)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("let")]
    Let,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("to")]
    To,
    #[token("step")]
    Step,
    #[token("while")]
    While,
    #[token("func")]
    Func,
    #[token("end")]
    End,
    #[token("return")]
    Return,
    #[token("continue")]
    Continue,
    #[token("break")]
    Break,

    // Builtin-call keywords; must be followed by '('
    #[token("print", |_| Builtin::Print)]
    #[token("input", |_| Builtin::Input)]
    #[token("input_int", |_| Builtin::InputInt)]
    #[token("clear", |_| Builtin::Clear)]
    #[token("is_number", |_| Builtin::IsNumber)]
    #[token("is_string", |_| Builtin::IsString)]
    #[token("is_list", |_| Builtin::IsList)]
    #[token("is_function", |_| Builtin::IsFunction)]
    #[token("append", |_| Builtin::Append)]
    #[token("pop", |_| Builtin::Pop)]
    #[token("extend", |_| Builtin::Extend)]
    #[token("len", |_| Builtin::Len)]
    #[token("run", |_| Builtin::Run)]
    Builtin(Builtin),

    // Literals
    #[regex(r"[0-9]+\.[0-9]*", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len() - 1])
    })]
    Str(String),

    /// A string literal that runs into the end of input
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Symbols
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    /// A `!` not followed by `=`
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    /// Statement terminator: newline or ';'
    #[token("\n")]
    #[token(";")]
    Newline,

    /// End of input, appended by [`tokenize`](super::tokenize)
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Let => write!(f, "let"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Then => write!(f, "then"),
            TokenKind::Elif => write!(f, "elif"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::For => write!(f, "for"),
            TokenKind::To => write!(f, "to"),
            TokenKind::Step => write!(f, "step"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Func => write!(f, "func"),
            TokenKind::End => write!(f, "end"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Continue => write!(f, "continue"),
            TokenKind::Break => write!(f, "break"),
            TokenKind::Builtin(b) => write!(f, "{b}"),
            TokenKind::Float(x) => write!(f, "FLOAT:{x}"),
            TokenKind::Int(n) => write!(f, "INT:{n}"),
            TokenKind::Str(s) => write!(f, "STRING:{s:?}"),
            TokenKind::UnterminatedStr => write!(f, "UNTERMINATED_STRING"),
            TokenKind::Ident(name) => write!(f, "IDENTIFIER:{name}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eq => write!(f, "="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenKind::lexer(source).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_keyword_beats_identifier() {
        assert_eq!(kinds("let"), vec![TokenKind::Let]);
        assert_eq!(kinds("letter"), vec![TokenKind::Ident("letter".to_string())]);
    }

    #[test]
    fn test_builtin_keywords() {
        assert_eq!(kinds("input"), vec![TokenKind::Builtin(Builtin::Input)]);
        assert_eq!(kinds("input_int"), vec![TokenKind::Builtin(Builtin::InputInt)]);
        assert_eq!(kinds("inputs"), vec![TokenKind::Ident("inputs".to_string())]);
    }

    #[test]
    fn test_constants_are_identifiers() {
        assert_eq!(
            kinds("null true"),
            vec![
                TokenKind::Ident("null".to_string()),
                TokenKind::Ident("true".to_string())
            ]
        );
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(kinds("1.5"), vec![TokenKind::Float(1.5)]);
        assert_eq!(kinds("2."), vec![TokenKind::Float(2.0)]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"\t"), "\t");
        assert_eq!(unescape(r#"\"q\""#), "\"q\"");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"\x"), "x");
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("== != <= >= = < >"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LBrace.to_string(), "{");
        assert_eq!(TokenKind::Builtin(Builtin::Len).to_string(), "len");
        assert_eq!(TokenKind::Int(3).to_string(), "INT:3");
    }
}
