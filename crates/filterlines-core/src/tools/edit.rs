//! Line-addressed edits issued against a host document

/// One edit against the original document's line numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Remove the line together with its line break.
    DeleteLine {
        line: usize, // 0-based
    },
    /// Insert `text` at a byte column of the line's content.
    InsertText {
        line: usize,   // 0-based
        column: usize, // bytes, at most the content length
        text: String,
    },
}

/// Write side of the host document.
///
/// Edits are addressed against the original line numbering and applied by
/// the host as one atomic batch after the caller has finished issuing them.
pub trait EditSink {
    fn delete_line_including_break(&mut self, line: usize);
    fn insert_text_at(&mut self, line: usize, column: usize, text: &str);
}

/// An ordered list of edits, in the order they were issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<LineEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn edits(&self) -> &[LineEdit] {
        &self.edits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of whole lines this batch deletes.
    pub fn lines_deleted(&self) -> usize {
        self.edits
            .iter()
            .filter(|e| matches!(e, LineEdit::DeleteLine { .. }))
            .count()
    }

    pub fn into_edits(self) -> Vec<LineEdit> {
        self.edits
    }

    /// Re-issue every edit, in order, to another sink.
    pub fn replay_into<S: EditSink + ?Sized>(self, sink: &mut S) {
        for edit in self.edits {
            match edit {
                LineEdit::DeleteLine { line } => sink.delete_line_including_break(line),
                LineEdit::InsertText { line, column, text } => {
                    sink.insert_text_at(line, column, &text)
                }
            }
        }
    }
}

impl EditSink for EditBatch {
    fn delete_line_including_break(&mut self, line: usize) {
        self.edits.push(LineEdit::DeleteLine { line });
    }

    fn insert_text_at(&mut self, line: usize, column: usize, text: &str) {
        self.edits.push(LineEdit::InsertText {
            line,
            column,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keeps_issue_order() {
        let mut batch = EditBatch::new();
        batch.delete_line_including_break(4);
        batch.insert_text_at(2, 0, "    2: ");
        batch.delete_line_including_break(1);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.lines_deleted(), 2);
        assert_eq!(batch.edits()[0], LineEdit::DeleteLine { line: 4 });
        assert_eq!(batch.edits()[2], LineEdit::DeleteLine { line: 1 });
        assert_eq!(
            batch.edits()[1],
            LineEdit::InsertText {
                line: 2,
                column: 0,
                text: "    2: ".to_string()
            }
        );
    }

    #[test]
    fn replay_preserves_order() {
        let mut batch = EditBatch::new();
        batch.delete_line_including_break(3);
        batch.insert_text_at(1, 2, "x");
        let expected = batch.clone();

        let mut copy = EditBatch::new();
        batch.replay_into(&mut copy);
        assert_eq!(copy, expected);
    }

    #[test]
    fn new_batch_is_empty() {
        let batch = EditBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.lines_deleted(), 0);
        assert!(batch.into_edits().is_empty());
    }
}
