//! Error types and reporting

use crate::ast::{SourceMap, Span};
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, VeroError>;

/// Any error a program can produce, from lexing to evaluation
#[derive(Debug, Clone, Error)]
pub enum VeroError {
    #[error("Illegal Character: {details}")]
    IllegalChar { details: String, span: Span },

    #[error("Invalid Syntax: {details}")]
    InvalidSyntax { details: String, span: Span },

    #[error("Expected Character: {details}")]
    ExpectedChar { details: String, span: Span },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl VeroError {
    pub fn illegal_char(details: impl Into<String>, span: Span) -> Self {
        Self::IllegalChar {
            details: details.into(),
            span,
        }
    }

    pub fn invalid_syntax(details: impl Into<String>, span: Span) -> Self {
        Self::InvalidSyntax {
            details: details.into(),
            span,
        }
    }

    pub fn expected_char(details: impl Into<String>, span: Span) -> Self {
        Self::ExpectedChar {
            details: details.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::IllegalChar { span, .. }
            | Self::InvalidSyntax { span, .. }
            | Self::ExpectedChar { span, .. } => *span,
            Self::Runtime(err) => err.span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::IllegalChar { details, .. }
            | Self::InvalidSyntax { details, .. }
            | Self::ExpectedChar { details, .. } => details,
            Self::Runtime(err) => &err.message,
        }
    }

    /// Human-readable error kind, as printed before the message
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::IllegalChar { .. } => "Illegal Character",
            Self::InvalidSyntax { .. } => "Invalid Syntax",
            Self::ExpectedChar { .. } => "Expected Character",
            Self::Runtime(_) => "Runtime Error",
        }
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }

    /// Plain-text rendering used by the REPL and nested script errors
    ///
    /// ```text
    /// Invalid Syntax: Expected ')'
    /// File: '<stdin>', Line: 1
    ///
    /// (1 + 2
    ///       ^
    /// ```
    pub fn render(&self, sources: &SourceMap) -> String {
        let span = self.span();
        let mut out = String::new();

        match self {
            Self::Runtime(err) => {
                out.push_str(&render_traceback(err, sources));
                out.push_str(&format!("{}: {}", self.kind_name(), self.message()));
            }
            _ => {
                out.push_str(&format!("{}: {}", self.kind_name(), self.message()));
                out.push_str(&format!(
                    "\nFile: '{}', Line: {}",
                    sources.name(span.file),
                    span.start.line + 1
                ));
            }
        }

        let line = sources.line_of(span);
        out.push_str("\n\n");
        out.push_str(line);
        out.push('\n');
        out.push_str(&caret_line(span, line));
        out
    }
}

fn render_traceback(err: &RuntimeError, sources: &SourceMap) -> String {
    let mut out = String::from("Traceback (most recent call last):\n");
    for frame in &err.traceback {
        out.push_str(&format!(
            "  File '{}', line {}, in {}\n",
            sources.name(frame.span.file),
            frame.span.start.line + 1,
            frame.context
        ));
    }
    out
}

/// Spaces up to the span's column, then one caret per covered character
fn caret_line(span: Span, line: &str) -> String {
    let col = span.start.col.min(line.len());
    let end = if span.start.line == span.end.line {
        col.saturating_add(span.len()).min(line.len())
    } else {
        line.len()
    };
    let indent = char_offset(line, col);
    let width = char_offset(line, end).saturating_sub(indent);
    format!("{}{}", " ".repeat(indent), "^".repeat(width.max(1)))
}

/// Convert a byte offset into the char offset ariadne indexes by
fn char_offset(text: &str, byte: usize) -> usize {
    let byte = byte.min(text.len());
    text.char_indices().take_while(|(i, _)| *i < byte).count()
}

/// Report error with ariadne
pub fn report_error(sources: &SourceMap, error: &VeroError) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span();
    let filename = sources.name(span.file).to_string();
    let text = sources
        .get(span.file)
        .map(|f| f.text.clone())
        .unwrap_or_default();

    let start = char_offset(&text, span.start.index);
    let end = char_offset(&text, span.end.index).max(start);

    let mut report = Report::build(ReportKind::Error, (filename.as_str(), start..end))
        .with_message(error.kind_name())
        .with_label(
            Label::new((filename.as_str(), start..end))
                .with_message(error.message())
                .with_color(Color::Red),
        );

    if let VeroError::Runtime(err) = error {
        for frame in &err.traceback {
            report = report.with_note(format!(
                "in {} at '{}', line {}",
                frame.context,
                sources.name(frame.span.file),
                frame.span.start.line + 1
            ));
        }
    }

    report
        .finish()
        .eprint((filename.as_str(), Source::from(text.as_str())))
}
