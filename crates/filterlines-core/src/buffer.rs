//! buffer.rs: in-memory host document that accepts line edit batches.

use crate::document::{DocumentSource, LineEnding};
use crate::error::{Error, Result};
use crate::tools::edit::{EditBatch, EditSink, LineEdit};
use crate::tools::line_index::LineIndex;
use crate::tools::model::ByteSpan;

/// One concrete edit to apply to the text.
#[derive(Debug, Clone)]
pub struct EditOp {
    /// Absolute byte range to replace (half-open).
    pub span: ByteSpan,
    /// Replacement text for this span.
    pub replacement: String,
}

/// A set of non-overlapping, start-sorted edits.
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    pub ops: Vec<EditOp>,
}

impl EditPlan {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Apply a plan to `text` in a single pass.
///
/// If the plan is empty, returns a clone of the input.
pub fn apply_plan(text: &str, plan: &EditPlan) -> String {
    if plan.ops.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());

    let mut cursor = 0usize;
    for op in &plan.ops {
        if op.span.start > cursor {
            out.push_str(&text[cursor..op.span.start]);
        }
        out.push_str(&op.replacement);
        cursor = cursor.max(op.span.end);
    }

    if cursor < text.len() {
        out.push_str(&text[cursor..]);
    }
    out
}

/// Document text plus a queue of pending line edits.
///
/// Reads always see the committed text; queued edits take effect together
/// on [`TextBuffer::commit`].
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    index: LineIndex,
    line_ending: LineEnding,
    pending: EditBatch,
}

impl TextBuffer {
    /// Line breaks are normalized to the style of the first one, as an
    /// editor does when it loads a file.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_ending = LineEnding::detect(&text);
        let text = line_ending.normalize(text);
        let index = LineIndex::build(text.as_bytes());
        Self {
            text,
            index,
            line_ending,
            pending: EditBatch::new(),
        }
    }

    /// Join `lines` with `\n`.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let joined: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        Self::new(joined.join("\n"))
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    #[inline]
    pub fn pending(&self) -> &EditBatch {
        &self.pending
    }

    /// Apply every queued edit as one batch.
    ///
    /// Edits are addressed against the text as it was before the batch.
    /// If any edit is out of range nothing is applied and the queue is
    /// cleared. Returns the number of edits applied.
    pub fn commit(&mut self) -> Result<usize> {
        let edits = std::mem::take(&mut self.pending).into_edits();
        if edits.is_empty() {
            return Ok(0);
        }

        let plan = self.plan(&edits)?;
        self.text = apply_plan(&self.text, &plan);
        self.index = LineIndex::build(self.text.as_bytes());
        tracing::debug!(
            edits = edits.len(),
            line_count = self.index.line_count(),
            "committed edit batch"
        );
        Ok(edits.len())
    }

    fn plan(&self, edits: &[LineEdit]) -> Result<EditPlan> {
        let mut ops = edits
            .iter()
            .map(|edit| self.resolve(edit))
            .collect::<Result<Vec<_>>>()?;
        // stable: inserts at one offset keep their issue order
        ops.sort_by_key(|op| op.span.start);

        #[cfg(debug_assertions)]
        for pair in ops.windows(2) {
            debug_assert!(
                !pair[0].span.overlaps(&pair[1].span),
                "overlapping edits: {:?} and {:?}",
                pair[0].span,
                pair[1].span
            );
        }

        Ok(EditPlan { ops })
    }

    fn resolve(&self, edit: &LineEdit) -> Result<EditOp> {
        let line_count = self.index.line_count();
        match edit {
            LineEdit::DeleteLine { line } => {
                let span = self
                    .index
                    .span_of_line(*line)
                    .ok_or(Error::InvalidRange(*line, line_count))?;
                Ok(EditOp {
                    span,
                    replacement: String::new(),
                })
            }
            LineEdit::InsertText { line, column, text } => {
                let content = self
                    .index
                    .content_span_of_line(self.text.as_bytes(), *line)
                    .ok_or(Error::InvalidRange(*line, line_count))?;
                let at = content.start + column;
                if at > content.end || !self.text.is_char_boundary(at) {
                    return Err(Error::InvalidRange(*column, content.len()));
                }
                Ok(EditOp {
                    span: ByteSpan::point(at),
                    replacement: text.clone(),
                })
            }
        }
    }
}

impl DocumentSource for TextBuffer {
    fn line_count(&self) -> usize {
        self.index.line_count()
    }

    fn line_text(&self, index: usize) -> &str {
        self.index
            .content_span_of_line(self.text.as_bytes(), index)
            .map(|span| &self.text[span.to_range()])
            .unwrap_or("")
    }

    fn line_break_style(&self) -> LineEnding {
        self.line_ending
    }
}

impl EditSink for TextBuffer {
    fn delete_line_including_break(&mut self, line: usize) {
        self.pending.delete_line_including_break(line);
    }

    fn insert_text_at(&mut self, line: usize, column: usize, text: &str) {
        self.pending.insert_text_at(line, column, text);
    }
}
