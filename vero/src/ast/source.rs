//! Registry of every source text the interpreter has seen

use super::{FileId, Span};

/// A named source text
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    fn new(name: String, text: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            name,
            text,
            line_starts,
        }
    }

    /// Text of a 0-based line without its line ending
    pub fn line(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        self.text
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches('\r')
    }
}

/// Source texts indexed by [`FileId`]
///
/// Texts are never removed, so spans captured by long-lived closures stay
/// renderable after the REPL line or script that defined them is gone.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source text and return its id
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(name.into(), text.into()));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// Display name of a file, `<unknown>` for foreign ids
    pub fn name(&self, id: FileId) -> &str {
        self.get(id).map_or("<unknown>", |f| f.name.as_str())
    }

    /// The source line a span starts on
    pub fn line_of(&self, span: Span) -> &str {
        self.get(span.file)
            .map_or("", |f| f.line(span.start.line))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let mut map = SourceMap::new();
        let id = map.add("a", "first\r\nsecond\nthird");
        let file = map.get(id).unwrap();
        assert_eq!(file.line(0), "first");
        assert_eq!(file.line(1), "second");
        assert_eq!(file.line(2), "third");
        assert_eq!(file.line(3), "");
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut map = SourceMap::new();
        assert_eq!(map.add("a", ""), FileId(0));
        assert_eq!(map.add("b", ""), FileId(1));
        assert_eq!(map.name(FileId(1)), "b");
        assert_eq!(map.name(FileId(7)), "<unknown>");
        assert_eq!(map.len(), 2);
    }
}
