//! Turning a selection into text: either a fresh document, or a batch of
//! destructive edits against the original.
//!
//! Both strategies produce the same text for the same selection and config.
//! The in-place result additionally keeps the line break that followed the
//! last retained line, if that line was not the document's last line.

use crate::config::{
    Configuration, CreateNewTab, FoldIndentedContext, IndentContext, LineNumbers, Settings,
};
use crate::document::DocumentSource;
use crate::tools::edit::EditSink;
use crate::tools::select::{SelectedLine, Selection, SelectionMode};

/// Rendering switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Prefix each emitted line with its original 0-based index.
    pub line_numbers: bool,
    /// New-document strategy when true, in-place edits otherwise.
    pub create_new_tab: bool,
    /// Render context as an indented block under its anchor.
    pub indent_context: bool,
    /// Literal indentation prepended to context lines.
    pub indentation_unit: String,
    /// Ask the host to collapse indented blocks afterwards.
    pub fold_indented_context: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            create_new_tab: true,
            indent_context: false,
            indentation_unit: "  ".to_string(),
            fold_indented_context: true,
        }
    }
}

impl RenderConfig {
    pub fn from_configuration(config: &impl Configuration) -> Self {
        Self {
            line_numbers: config.get::<LineNumbers>(),
            create_new_tab: config.get::<CreateNewTab>(),
            indent_context: config.get::<IndentContext>(),
            indentation_unit: Settings::indentation_unit_of(config),
            fold_indented_context: config.get::<FoldIndentedContext>(),
        }
    }

    /// Selection mode implied by `indent_context`.
    #[inline]
    pub fn selection_mode(&self) -> SelectionMode {
        if self.indent_context {
            SelectionMode::Indented
        } else {
            SelectionMode::Flattened
        }
    }

    #[inline]
    fn wants_fold(&self) -> bool {
        self.indent_context && self.fold_indented_context
    }
}

/// Folding the host should perform once the result is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldRequest {
    /// Collapse every indented block of the new document.
    AllIndented,
    /// Collapse the edited document to the given fold level.
    Level(u8),
}

/// Content of a newly created document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content: String,
    pub fold: Option<FoldRequest>,
}

/// What a filter run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    NewDocument(RenderedDocument),
    InPlace {
        /// Number of edits committed to the original document.
        edits: usize,
        fold: Option<FoldRequest>,
    },
}

impl RenderOutput {
    pub fn fold(&self) -> Option<FoldRequest> {
        match self {
            RenderOutput::NewDocument(doc) => doc.fold,
            RenderOutput::InPlace { fold, .. } => *fold,
        }
    }
}

/// Right-aligned index in a 5-wide field followed by `": "`.
///
/// Wider indices widen the field.
#[inline]
pub fn format_line_number(lineno: usize) -> String {
    format!("{lineno:>5}: ")
}

fn push_line(out: &mut String, config: &RenderConfig, indent: bool, lineno: usize, text: &str) {
    if indent {
        out.push_str(&config.indentation_unit);
    }
    if config.line_numbers {
        out.push_str(&format_line_number(lineno));
    }
    out.push_str(text);
}

/// Build the content of a new document from `selection`.
///
/// Lines are joined with the source's line break; the last emitted line has
/// none. The source is not modified.
pub fn render_new_document<D>(doc: &D, selection: &Selection, config: &RenderConfig) -> RenderedDocument
where
    D: DocumentSource + ?Sized,
{
    let eol = doc.line_break_style().as_str();
    let mut content = String::new();

    for line in selection.lines() {
        push_line(&mut content, config, false, line.index, doc.line_text(line.index));
        content.push_str(eol);

        if let Some(block) = line.context_block() {
            for ctx in block {
                push_line(&mut content, config, true, ctx, doc.line_text(ctx));
                content.push_str(eol);
            }
        }
    }
    if content.ends_with(eol) {
        content.truncate(content.len() - eol.len());
    }

    RenderedDocument {
        content,
        fold: config.wants_fold().then_some(FoldRequest::AllIndented),
    }
}

/// Issue the edits that turn `doc` into the rendered selection.
///
/// Lines are walked from last to first so every edit is addressed against
/// the original numbering. Returns the fold request for the host.
pub fn render_in_place<D, S>(
    doc: &D,
    selection: &Selection,
    config: &RenderConfig,
    sink: &mut S,
) -> Option<FoldRequest>
where
    D: DocumentSource + ?Sized,
    S: EditSink + ?Sized,
{
    debug_assert_eq!(doc.line_count(), selection.line_count());
    let eol = doc.line_break_style().as_str();
    let mut kept = selection.lines().iter().rev().peekable();

    for lineno in (0..doc.line_count()).rev() {
        match kept.next_if(|l| l.index == lineno) {
            Some(line) => annotate_kept_line(doc, line, config, eol, sink),
            None => sink.delete_line_including_break(lineno),
        }
    }

    config.wants_fold().then_some(FoldRequest::Level(1))
}

fn annotate_kept_line<D, S>(doc: &D, line: &SelectedLine, config: &RenderConfig, eol: &str, sink: &mut S)
where
    D: DocumentSource + ?Sized,
    S: EditSink + ?Sized,
{
    let text = doc.line_text(line.index);

    // column 0 first: on an empty line both inserts land on the same spot
    if config.line_numbers {
        sink.insert_text_at(line.index, 0, &format_line_number(line.index));
    }

    if let Some(block) = line.context_block() {
        let mut inserted = String::new();
        for ctx in block {
            inserted.push_str(eol);
            push_line(&mut inserted, config, true, ctx, doc.line_text(ctx));
        }
        sink.insert_text_at(line.index, text.len(), &inserted);
    }
}
