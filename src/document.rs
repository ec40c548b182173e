//! Text access for the renderer.
//!
//! All offsets are byte offsets into the document text and always fall on
//! `char` boundaries.

use std::ops::Range;

/// A borrowed run of document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment<'a> {
    /// Backing text; the segment may be a slice of a larger string.
    pub text: &'a str,
    /// Start of the requested range, relative to `text`.
    pub offset: usize,
    /// Length of the requested range in bytes.
    pub count: usize,
}

impl<'a> TextSegment<'a> {
    pub fn as_str(&self) -> &'a str {
        &self.text[self.offset..self.offset + self.count]
    }
}

/// Read access to document text.
pub trait TextSource {
    /// Total length of the document in bytes.
    fn text_length(&self) -> usize;

    /// Returns the text of `[offset, offset + length)`, clamped to the document.
    fn get_text(&self, offset: usize, length: usize) -> TextSegment<'_>;
}

fn clamped_segment(text: &str, offset: usize, length: usize) -> TextSegment<'_> {
    let offset = offset.min(text.len());
    let count = length.min(text.len() - offset);
    TextSegment {
        text,
        offset,
        count,
    }
}

impl TextSource for String {
    fn text_length(&self) -> usize {
        self.len()
    }

    fn get_text(&self, offset: usize, length: usize) -> TextSegment<'_> {
        clamped_segment(self, offset, length)
    }
}

/// Immutable text with a precomputed line index.
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    /// Start offsets of every line; the first entry is always 0.
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a 0-indexed line, excluding its line terminator.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.line_starts.get(line)?;
        let mut end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some(start..end)
    }

    /// The terminator that ends a 0-indexed line: `"\n"`, `"\r\n"`, or empty
    /// for the last line.
    pub fn line_terminator(&self, line: usize) -> Option<&str> {
        let content = self.line_range(line)?;
        let next = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        Some(&self.text[content.end..next])
    }

    /// One visual line per document line.
    pub fn visual_lines(&self) -> impl Iterator<Item = VisualLine> + '_ {
        (0..self.line_count()).filter_map(|line| self.line_range(line).map(VisualLine::from))
    }
}

impl TextSource for TextDocument {
    fn text_length(&self) -> usize {
        self.text.len()
    }

    fn get_text(&self, offset: usize, length: usize) -> TextSegment<'_> {
        clamped_segment(&self.text, offset, length)
    }
}

/// Bounds of one rendered line within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    pub start_offset: usize,
    /// End offset of the last document line covered by this visual line.
    pub end_offset: usize,
}

impl VisualLine {
    pub fn new(start_offset: usize, end_offset: usize) -> Self {
        debug_assert!(start_offset <= end_offset);
        Self {
            start_offset,
            end_offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

impl From<Range<usize>> for VisualLine {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ranges() {
        let doc = TextDocument::new("first\r\nsecond\n\nlast");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_range(0), Some(0..5));
        assert_eq!(doc.line_range(1), Some(7..13));
        assert_eq!(doc.line_range(2), Some(14..14));
        assert_eq!(doc.line_range(3), Some(15..19));
        assert_eq!(doc.line_range(4), None);
    }

    #[test]
    fn test_line_terminators() {
        let doc = TextDocument::new("first\r\nsecond\n\nlast\r");
        assert_eq!(doc.line_terminator(0), Some("\r\n"));
        assert_eq!(doc.line_terminator(1), Some("\n"));
        assert_eq!(doc.line_terminator(2), Some("\n"));
        assert_eq!(doc.line_terminator(3), Some("\r"));
        assert_eq!(doc.line_terminator(4), None);

        let rebuilt: String = (0..doc.line_count())
            .filter_map(|line| {
                let range = doc.line_range(line)?;
                Some(format!("{}{}", &doc.text()[range], doc.line_terminator(line)?))
            })
            .collect();
        assert_eq!(rebuilt, doc.text());
    }

    #[test]
    fn test_get_text_is_clamped() {
        let doc = TextDocument::new("hello");
        let segment = doc.get_text(3, 10);
        assert_eq!(segment.as_str(), "lo");
        assert_eq!(segment.offset, 3);
        assert_eq!(segment.count, 2);
        assert_eq!(doc.get_text(9, 1).as_str(), "");
    }

    #[test]
    fn test_string_source() {
        let text = String::from("abc");
        assert_eq!(text.text_length(), 3);
        assert_eq!(text.get_text(1, 1).as_str(), "b");
    }

    #[test]
    fn test_visual_lines_cover_every_line() {
        let doc = TextDocument::new("a\nbc\n");
        let lines: Vec<_> = doc.visual_lines().collect();
        assert_eq!(
            lines,
            vec![
                VisualLine::new(0, 1),
                VisualLine::new(2, 4),
                VisualLine::new(5, 5)
            ]
        );
        assert!(lines[2].is_empty());
    }
}
