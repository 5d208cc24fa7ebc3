//! Line selection: which lines survive a filter, and which context windows
//! travel with them.

use std::ops::Range;

use crate::document::DocumentSource;
use crate::error::Result;
use crate::tools::context::ContextSpec;
use crate::tools::matcher::LineMatcher;
use crate::tools::model::LineRole;

/// How context lines are attached to anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Context merged into one ascending, duplicate-free run of lines.
    #[default]
    Flattened,
    /// Anchors only at top level; each carries its own context window.
    Indented,
}

/// One retained line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLine {
    /// 0-based index into the source document.
    pub index: usize,
    pub role: LineRole,
    /// Indented mode only: the anchor's own half-open context window,
    /// computed without regard to neighbouring anchors.
    pub window: Option<Range<usize>>,
}

impl SelectedLine {
    /// The attached window when it holds more than the anchor itself.
    #[inline]
    pub fn context_block(&self) -> Option<Range<usize>> {
        self.window.clone().filter(|w| w.len() > 1)
    }
}

/// Ordered set of retained lines.
///
/// Invariants:
/// - indices are strictly increasing and lie in `[0, line_count)`;
/// - every anchor appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    lines: Vec<SelectedLine>,
    line_count: usize,
}

impl Selection {
    #[inline]
    pub fn lines(&self) -> &[SelectedLine] {
        &self.lines
    }

    /// Line count of the document the selection was built from.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Evaluate the effective predicate on every line of `doc`.
pub fn scan_anchors<D>(doc: &D, matcher: &LineMatcher) -> Result<Vec<bool>>
where
    D: DocumentSource + ?Sized,
{
    (0..doc.line_count())
        .map(|lineno| matcher.includes(doc.line_text(lineno)))
        .collect()
}

/// Scan `doc` and build the selection for `context` in `mode`.
pub fn select_lines<D>(
    doc: &D,
    matcher: &LineMatcher,
    context: ContextSpec,
    mode: SelectionMode,
) -> Result<Selection>
where
    D: DocumentSource + ?Sized,
{
    let anchors = scan_anchors(doc, matcher)?;
    Ok(select_anchors(&anchors, context, mode))
}

/// Build a selection from per-line anchor flags.
///
/// `anchors[i]` tells whether line `i` satisfies the effective predicate;
/// its length is the document's line count.
pub fn select_anchors(anchors: &[bool], context: ContextSpec, mode: SelectionMode) -> Selection {
    let line_count = anchors.len();
    let lines = match mode {
        SelectionMode::Flattened => flattened(anchors, context),
        SelectionMode::Indented => indented(anchors, context),
    };

    tracing::debug!(
        ?mode,
        line_count,
        anchors = anchors.iter().filter(|a| **a).count(),
        retained = lines.len(),
        "selected lines"
    );

    Selection { lines, line_count }
}

/// Clamp `[lineno - before, lineno + after + 1)` into `[floor, line_count)`.
#[inline]
fn window(lineno: usize, context: ContextSpec, floor: usize, line_count: usize) -> Range<usize> {
    let start = lineno.saturating_sub(context.before).max(floor);
    let end = lineno
        .saturating_add(context.after)
        .saturating_add(1)
        .min(line_count);
    start..end
}

fn role_of(anchors: &[bool], index: usize) -> LineRole {
    if anchors[index] {
        LineRole::Anchor
    } else {
        LineRole::Context
    }
}

fn flattened(anchors: &[bool], context: ContextSpec) -> Vec<SelectedLine> {
    let line_count = anchors.len();
    let mut out = Vec::new();
    // smallest index not yet claimed by an earlier window
    let mut next_free = 0usize;

    for lineno in (0..line_count).filter(|&i| anchors[i]) {
        let w = window(lineno, context, next_free, line_count);
        tracing::trace!(lineno, start = w.start, end = w.end, "anchor window");
        if w.end <= next_free {
            continue;
        }
        out.extend(w.clone().map(|index| SelectedLine {
            index,
            role: role_of(anchors, index),
            window: None,
        }));
        next_free = w.end;
    }
    out
}

fn indented(anchors: &[bool], context: ContextSpec) -> Vec<SelectedLine> {
    let line_count = anchors.len();
    (0..line_count)
        .filter(|&i| anchors[i])
        .map(|lineno| {
            let w = window(lineno, context, 0, line_count);
            tracing::trace!(lineno, start = w.start, end = w.end, "anchor window");
            SelectedLine {
                index: lineno,
                role: LineRole::Anchor,
                window: Some(w),
            }
        })
        .collect()
}
