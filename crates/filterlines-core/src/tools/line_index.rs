use crate::tools::model::ByteSpan;
use memchr::memchr_iter;

/// Byte offsets of every line start in a text.
///
/// Lines are 0-based. A text always has at least one line, and a trailing
/// `\n` opens a final empty line, matching how editors count lines.
#[derive(Debug, Clone)]
pub struct LineIndex {
    // strictly increasing, first is 0
    line_starts: Vec<usize>,
    total_bytes: usize,
}

impl LineIndex {
    /// Only `\n` starts a line; a `\r` before it belongs to the break.
    pub fn build(bytes: &[u8]) -> Self {
        let mut starts = Vec::with_capacity(16);
        starts.push(0);
        starts.extend(memchr_iter(b'\n', bytes).map(|nl| nl + 1));
        Self {
            line_starts: starts,
            total_bytes: bytes.len(),
        }
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn end_of(&self, line: usize) -> Option<usize> {
        match self.line_starts.get(line + 1) {
            Some(&next) => Some(next),
            None if line < self.line_starts.len() => Some(self.total_bytes),
            None => None,
        }
    }

    /// Byte span of `line` including its line break (if any).
    /// Returns `None` if the line is out of range.
    #[inline]
    pub fn span_of_line(&self, line: usize) -> Option<ByteSpan> {
        Some(ByteSpan {
            start: *self.line_starts.get(line)?,
            end: self.end_of(line)?,
        })
    }

    /// Byte span of `line` without its trailing `\n` / `\r\n`.
    #[inline]
    pub fn content_span_of_line(&self, bytes: &[u8], line: usize) -> Option<ByteSpan> {
        let ByteSpan { start, mut end } = self.span_of_line(line)?;
        if end > start && bytes[end - 1] == b'\n' {
            end -= 1;
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }
        Some(ByteSpan { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_like_an_editor() {
        assert_eq!(LineIndex::build(b"").line_count(), 1);
        assert_eq!(LineIndex::build(b"a").line_count(), 1);
        assert_eq!(LineIndex::build(b"a\n").line_count(), 2);
        assert_eq!(LineIndex::build(b"a\nb").line_count(), 2);
        assert_eq!(LineIndex::build(b"\n\n").line_count(), 3);
    }

    #[test]
    fn spans_include_line_break() {
        let text = b"ab\ncd\n";
        let idx = LineIndex::build(text);
        assert_eq!(idx.span_of_line(0), Some(ByteSpan { start: 0, end: 3 }));
        assert_eq!(idx.span_of_line(1), Some(ByteSpan { start: 3, end: 6 }));
        assert_eq!(idx.span_of_line(2), Some(ByteSpan { start: 6, end: 6 }));
        assert_eq!(idx.span_of_line(3), None);
    }

    #[test]
    fn content_span_strips_crlf() {
        let text = b"ab\r\ncd";
        let idx = LineIndex::build(text);
        let first = idx.content_span_of_line(text, 0).unwrap();
        assert_eq!(&text[first.to_range()], b"ab");
        let last = idx.content_span_of_line(text, 1).unwrap();
        assert_eq!(&text[last.to_range()], b"cd");
    }
}
