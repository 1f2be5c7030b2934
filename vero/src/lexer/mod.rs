//! Lexer implementation using logos

mod token;

pub use token::{Token, TokenKind};

use crate::ast::{FileId, Position, Span};
use crate::error::{Result, VeroError};
use logos::Logos;

/// Tracks line/column while walking forward through the text
struct LineTracker<'a> {
    text: &'a str,
    index: usize,
    line: usize,
    line_start: usize,
}

impl<'a> LineTracker<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            index: 0,
            line: 0,
            line_start: 0,
        }
    }

    /// Position of `target`, which must not precede the last queried offset
    fn position(&mut self, target: usize) -> Position {
        let target = target.min(self.text.len());
        for (offset, byte) in self.text.as_bytes()[self.index..target].iter().enumerate() {
            if *byte == b'\n' {
                self.line += 1;
                self.line_start = self.index + offset + 1;
            }
        }
        self.index = target;
        Position::new(target, self.line, target - self.line_start)
    }
}

/// Tokenize source code
///
/// The returned stream always ends with an [`TokenKind::Eof`] token.
pub fn tokenize(file: FileId, source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut lines = LineTracker::new(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let start = lines.position(range.start);
        let end = lines.position(range.end);
        let span = Span::new(file, start, end);

        match result {
            Ok(TokenKind::Bang) => {
                return Err(VeroError::expected_char("'=' (after '!')", span));
            }
            Ok(TokenKind::UnterminatedStr) => {
                return Err(VeroError::expected_char("'\"' (unterminated string)", span));
            }
            Ok(kind) => tokens.push(Token::new(kind, span)),
            Err(_) => {
                let slice = lexer.slice();
                if slice.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(VeroError::invalid_syntax(
                        format!("Number literal '{slice}' is out of range"),
                        span,
                    ));
                }
                return Err(VeroError::illegal_char(format!("'{slice}'"), span));
            }
        }
    }

    let end = lines.position(source.len());
    tokens.push(Token::new(TokenKind::Eof, Span::new(file, end, end)));
    tracing::trace!(count = tokens.len(), "tokenized source");

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Builtin;

    fn lex(source: &str) -> Vec<TokenKind> {
        tokenize(FileId(0), source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_tokenize_let_statement() {
        assert_eq!(
            lex("let x = 42"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Int(42),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_terminators() {
        assert_eq!(
            lex("1;2\n3"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Int(3),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(
            lex("1 # one\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_string_with_escapes() {
        assert_eq!(
            lex(r#""a\tb\n""#),
            vec![TokenKind::Str("a\tb\n".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_builtin_call() {
        assert_eq!(
            lex("print(1)"),
            vec![
                TokenKind::Builtin(Builtin::Print),
                TokenKind::LParen,
                TokenKind::Int(1),
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_spans_track_lines() {
        let tokens = tokenize(FileId(3), "a\n  bc").unwrap();
        assert_eq!(tokens[0].span.start, Position::new(0, 0, 0));
        assert_eq!(tokens[2].span.start, Position::new(4, 1, 2));
        assert_eq!(tokens[2].span.end, Position::new(6, 1, 4));
        assert_eq!(tokens[2].span.file, FileId(3));
        // Eof sits at the end of the text
        assert_eq!(tokens[3].span.start, Position::new(6, 1, 4));
    }

    #[test]
    fn test_tokenize_illegal_character() {
        let err = tokenize(FileId(0), "1 $ 2").unwrap_err();
        assert!(matches!(err, VeroError::IllegalChar { .. }));
        assert_eq!(err.message(), "'$'");
        assert_eq!(err.span().start.col, 2);
    }

    #[test]
    fn test_tokenize_lone_bang() {
        let err = tokenize(FileId(0), "!x").unwrap_err();
        assert!(matches!(err, VeroError::ExpectedChar { .. }));
        assert_eq!(err.message(), "'=' (after '!')");
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = tokenize(FileId(0), "\"abc").unwrap_err();
        assert!(matches!(err, VeroError::ExpectedChar { .. }));
    }

    #[test]
    fn test_tokenize_integer_overflow() {
        let err = tokenize(FileId(0), "99999999999999999999").unwrap_err();
        assert!(matches!(err, VeroError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_tokenize_power_and_modulo() {
        assert_eq!(
            lex("2 ^ 3 % 4"),
            vec![
                TokenKind::Int(2),
                TokenKind::Caret,
                TokenKind::Int(3),
                TokenKind::Percent,
                TokenKind::Int(4),
                TokenKind::Eof
            ]
        );
    }
}
