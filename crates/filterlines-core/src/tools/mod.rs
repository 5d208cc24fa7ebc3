pub mod context;
pub mod edit;
pub mod line_index;
pub mod matcher;
pub mod model;
pub mod render;
pub mod select;

pub use context::{parse_context, ContextSpec};
pub use edit::{EditBatch, EditSink, LineEdit};
pub use line_index::LineIndex;
pub use matcher::{LineMatcher, MatchOptions, SearchType};
pub use model::{ByteSpan, LineRole};
pub use render::{
    format_line_number, render_in_place, render_new_document, FoldRequest, RenderConfig,
    RenderOutput, RenderedDocument,
};
pub use select::{select_anchors, select_lines, SelectedLine, Selection, SelectionMode};
