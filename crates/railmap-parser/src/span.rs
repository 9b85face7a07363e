use std::{fmt, ops::Range};

/// A byte range in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Converts a 1-based line and column, as reported by serde_json, into a
    /// single-character span.
    ///
    /// Positions past the end of the source are clamped to it, and positions
    /// inside a multibyte character move back to its first byte.
    pub fn from_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let mut offset = (line_start + column.saturating_sub(1)).min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let end = source[offset..]
            .chars()
            .next()
            .map_or(offset, |c| offset + c.len_utf8());
        Self::new(offset..end)
    }

    /// Finds the first occurrence of `key` as a quoted JSON string.
    ///
    /// The span covers the quotes. Returns `None` if the key is not found.
    pub fn locate_key(source: &str, key: &str) -> Option<Self> {
        let needle = format!("\"{key}\"");
        source
            .find(&needle)
            .map(|start| Self::new(start..start + needle.len()))
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(4..10);
        assert_eq!(span.start(), 4);
        assert_eq!(span.end(), 10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_from_line_column() {
        let source = "{\n  \"graph\": oops\n}";
        let span = Span::from_line_column(source, 2, 12);

        assert_eq!(&source[span.start()..span.end()], "o");
    }

    #[test]
    fn test_from_line_column_clamps() {
        let source = "{}";
        let span = Span::from_line_column(source, 9, 9);
        assert_eq!(span, Span::new(2..2));
    }

    #[test]
    fn test_from_line_column_multibyte() {
        // serde_json reports column 7 here, the last byte of '文'
        let source = "{\"中文";
        let span = Span::from_line_column(source, 1, 7);

        assert_eq!(span, Span::new(5..8));
        assert_eq!(&source[span.start()..span.end()], "文");
    }

    #[test]
    fn test_locate_key() {
        let source = r#"{"key": "stn_a", "other": "stn_ab"}"#;
        let span = Span::locate_key(source, "stn_a").unwrap();

        assert_eq!(&source[span.start()..span.end()], "\"stn_a\"");
        assert!(Span::locate_key(source, "stn_z").is_none());
    }
}
