//! Source location tracking

use serde::{Deserialize, Serialize};

/// Columns a tab advances the diagnostic cursor by
pub const TAB_WIDTH: usize = 2;

/// A span in the source code (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// One-byte span directly after this one
    pub fn after(self) -> Span {
        Span::new(self.end, self.end + 1)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A value with source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Human-facing source position, both fields 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to line/column positions.
///
/// Columns count characters, except that a tab advances the column by
/// [`TAB_WIDTH`].
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { source, line_starts }
    }

    /// Position of a byte offset; offsets past the end clamp to the end
    pub fn position(&self, offset: usize) -> Position {
        let offset = self.clamp(offset);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = 1 + display_width(&self.source[line_start..offset]);
        Position { line, column }
    }

    /// Text of a 1-based line, without its newline
    pub fn line_text(&self, line: usize) -> &'a str {
        let Some(&start) = self.line_starts.get(line.saturating_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map_or(self.source.len(), |next| next - 1);
        self.source[start..end].trim_end_matches('\r')
    }

    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

/// Column width of a run of text on one line
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ====================================================================
    // Span tests
    // ====================================================================

    #[test]
    fn test_span_merge_non_overlapping() {
        let merged = Span::new(0, 5).merge(Span::new(10, 15));
        assert_eq!(merged, Span::new(0, 15));
    }

    #[test]
    fn test_span_merge_commutative() {
        let a = Span::new(10, 20);
        let b = Span::new(5, 15);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn test_span_after() {
        assert_eq!(Span::new(3, 7).after(), Span::new(7, 8));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(42, 99)), "42..99");
    }

    #[test]
    fn test_span_range_conversions() {
        let span = Span::from(3..7);
        assert_eq!(span, Span::new(3, 7));
        assert_eq!(std::ops::Range::from(span), 3..7);
    }

    // ====================================================================
    // LineIndex tests
    // ====================================================================

    #[test]
    fn test_position_first_line() {
        let index = LineIndex::new("i64 x = 1;");
        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(4), Position { line: 1, column: 5 });
    }

    #[test]
    fn test_position_after_newline() {
        let index = LineIndex::new("a;\nbb;\nc;");
        assert_eq!(index.position(3), Position { line: 2, column: 1 });
        assert_eq!(index.position(4), Position { line: 2, column: 2 });
        assert_eq!(index.position(7), Position { line: 3, column: 1 });
    }

    #[test]
    fn test_position_tab_counts_two_columns() {
        let index = LineIndex::new("\tx;");
        assert_eq!(index.position(1), Position { line: 1, column: 3 });
    }

    #[test]
    fn test_position_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(100), Position { line: 1, column: 3 });
    }

    #[test]
    fn test_position_multibyte_boundary() {
        // 'é' is two bytes; offset 1 falls inside it
        let index = LineIndex::new("é;");
        assert_eq!(index.position(1), Position { line: 1, column: 1 });
        assert_eq!(index.position(2), Position { line: 1, column: 2 });
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new("first;\r\nsecond;\nthird;");
        assert_eq!(index.line_text(1), "first;");
        assert_eq!(index.line_text(2), "second;");
        assert_eq!(index.line_text(3), "third;");
        assert_eq!(index.line_text(9), "");
    }
}
