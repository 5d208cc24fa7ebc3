//! Line filtering for text documents.
//!
//! Given a document's lines, a literal or regex search, an invert flag and
//! optional leading/trailing context, compute which lines to keep and
//! render them either as a new document or as in-place edits of the
//! original, with optional line numbers and indented context blocks.

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod session;
pub mod storage;
pub mod tools;

pub use buffer::TextBuffer;
pub use config::{Configuration, GivenConfiguration, Settings, TomlConfiguration};
pub use document::{DocumentSource, LineEnding};
pub use error::{Error, Result, CONTEXT_PARSE_MESSAGE};
pub use session::{
    filter_lines, filter_lines_in_place, run_filter, word_at, ContextInput, FilterCommand,
    FilterRequest, PromptDefaults,
};
pub use storage::{JsonFileStorage, MemoryStorage, StateKey, Storage};
pub use tools::{
    format_line_number, parse_context, ContextSpec, EditBatch, EditSink, FoldRequest, LineEdit,
    LineMatcher, LineRole, MatchOptions, RenderConfig, RenderOutput, RenderedDocument,
    SearchType, Selection, SelectionMode,
};

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        filter_lines, filter_lines_in_place, run_filter, Configuration, ContextInput,
        ContextSpec, DocumentSource, EditSink, Error, FilterCommand, FilterRequest, FoldRequest,
        GivenConfiguration, PromptDefaults, RenderOutput, Result, SearchType, Settings, Storage,
        TextBuffer,
    };
}
