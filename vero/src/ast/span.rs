//! Source location tracking

use serde::{Deserialize, Serialize};

/// Index of a source text inside a [`SourceMap`](super::SourceMap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// A single point in a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the text
    pub index: usize,
    /// 0-based line
    pub line: usize,
    /// 0-based byte column within the line
    pub col: usize,
}

impl Position {
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        Self { index, line, col }
    }
}

/// A span in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub file: FileId,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(file: FileId, start: Position, end: Position) -> Self {
        Self { file, start, end }
    }

    /// Smallest span covering both. Spans from different files keep `self`'s file.
    pub fn merge(self, other: Span) -> Span {
        let start = if other.start.index < self.start.index {
            other.start
        } else {
            self.start
        };
        let end = if other.end.index > self.end.index {
            other.end
        } else {
            self.end
        };
        Span {
            file: self.file,
            start,
            end,
        }
    }

    /// Byte length of the span (0 for inverted spans)
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start.line + 1,
            self.start.col + 1,
            self.end.line + 1,
            self.end.col + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(FileId(0), Position::new(start, 0, start), Position::new(end, 0, end))
    }

    // ====================================================================
    // Span tests
    // ====================================================================

    #[test]
    fn test_span_merge_non_overlapping() {
        let merged = span(0, 5).merge(span(10, 15));
        assert_eq!(merged, span(0, 15));
    }

    #[test]
    fn test_span_merge_contained() {
        let merged = span(0, 100).merge(span(20, 30));
        assert_eq!(merged, span(0, 100));
    }

    #[test]
    fn test_span_merge_commutative() {
        let a = span(10, 20);
        let b = span(5, 15);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn test_span_merge_keeps_line_info() {
        let a = Span::new(FileId(1), Position::new(0, 0, 0), Position::new(3, 0, 3));
        let b = Span::new(FileId(1), Position::new(10, 2, 4), Position::new(12, 2, 6));
        let merged = a.merge(b);
        assert_eq!(merged.start, Position::new(0, 0, 0));
        assert_eq!(merged.end, Position::new(12, 2, 6));
        assert_eq!(merged.file, FileId(1));
    }

    #[test]
    fn test_span_display_is_one_based() {
        let s = Span::new(FileId(0), Position::new(4, 1, 2), Position::new(6, 1, 4));
        assert_eq!(format!("{s}"), "2:3..2:5");
    }

    #[test]
    fn test_span_len() {
        assert_eq!(span(3, 7).len(), 4);
        assert!(span(5, 5).is_empty());
        // Inverted spans saturate instead of underflowing
        assert_eq!(span(10, 5).len(), 0);
    }
}
