//! Small value types shared by selection, rendering and the text buffer.

use std::ops::Range;

/// Byte range `[start, end)` into a document's text. An empty span marks
/// an insertion point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    #[inline]
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Two edits conflict when their ranges share a byte. Insertion points
    /// on either boundary of a range do not.
    #[inline]
    #[must_use]
    pub fn overlaps(self, other: &ByteSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    #[must_use]
    pub fn to_range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Why a line is part of a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// The effective predicate holds for this line.
    Anchor,
    /// Retained only because it lies near an anchor.
    Context,
}

impl LineRole {
    #[inline]
    pub fn is_anchor(self) -> bool {
        matches!(self, LineRole::Anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_points_at_line_boundaries_do_not_conflict() {
        let line = ByteSpan { start: 2, end: 6 };
        assert!(!ByteSpan::point(2).overlaps(&line));
        assert!(!ByteSpan::point(6).overlaps(&line));
        assert!(ByteSpan::point(4).overlaps(&line));
        assert!(line.overlaps(&ByteSpan { start: 5, end: 9 }));
        assert!(!line.overlaps(&ByteSpan { start: 6, end: 9 }));
        assert_eq!(line.len(), 4);
        assert!(ByteSpan::point(3).is_empty());
    }

    #[test]
    fn only_predicate_lines_are_anchors() {
        assert!(LineRole::Anchor.is_anchor());
        assert!(!LineRole::Context.is_anchor());
    }
}
