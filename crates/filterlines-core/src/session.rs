//! Commands, the prompt protocol, and the filter entry points.
//!
//! A host runs a filter in two steps. First it resolves the search text and
//! (optionally) a context string, using [`PromptDefaults`] to prefill its
//! prompts. Then it calls [`filter_lines`] or [`filter_lines_in_place`] with
//! the resolved [`FilterRequest`]. Nothing in the second step touches
//! storage.

use crate::buffer::TextBuffer;
use crate::config::{Configuration, PreserveSearch};
use crate::document::DocumentSource;
use crate::error::Result;
use crate::storage::{StateKey, Storage};
use crate::tools::context::{parse_context, ContextSpec};
use crate::tools::edit::{EditBatch, EditSink};
use crate::tools::matcher::{LineMatcher, MatchOptions, SearchType};
use crate::tools::render::{
    render_in_place, render_new_document, FoldRequest, RenderConfig, RenderOutput,
    RenderedDocument,
};
use crate::tools::select::{select_lines, Selection};

/// The user-facing filter commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCommand {
    IncludeLinesWithRegex,
    IncludeLinesWithString,
    ExcludeLinesWithRegex,
    ExcludeLinesWithString,
}

impl FilterCommand {
    pub fn search_type(self) -> SearchType {
        match self {
            FilterCommand::IncludeLinesWithRegex | FilterCommand::ExcludeLinesWithRegex => {
                SearchType::Regex
            }
            FilterCommand::IncludeLinesWithString | FilterCommand::ExcludeLinesWithString => {
                SearchType::String
            }
        }
    }

    pub fn invert(self) -> bool {
        matches!(
            self,
            FilterCommand::ExcludeLinesWithRegex | FilterCommand::ExcludeLinesWithString
        )
    }

    /// Command identifier.
    pub fn id(self) -> &'static str {
        match self {
            FilterCommand::IncludeLinesWithRegex => "filterlines.includeLinesWithRegex",
            FilterCommand::IncludeLinesWithString => "filterlines.includeLinesWithString",
            FilterCommand::ExcludeLinesWithRegex => "filterlines.excludeLinesWithRegex",
            FilterCommand::ExcludeLinesWithString => "filterlines.excludeLinesWithString",
        }
    }

    /// Text of the search prompt, e.g. `Filter to lines not containing: `.
    pub fn prompt(self) -> String {
        format!(
            "Filter to lines {}{}: ",
            if self.invert() { "not " } else { "" },
            match self.search_type() {
                SearchType::String => "containing",
                SearchType::Regex => "matching",
            }
        )
    }

    /// Build a request for `needle` with this command's search settings.
    pub fn request(self, needle: impl Into<String>) -> FilterRequest {
        FilterRequest {
            needle: needle.into(),
            search_type: self.search_type(),
            invert: self.invert(),
            context: ContextInput::None,
        }
    }
}

/// How much context was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextInput {
    /// No context lines.
    #[default]
    None,
    /// A context string to be parsed.
    Text(String),
    /// Counts given directly.
    Counts(ContextSpec),
}

impl ContextInput {
    pub fn resolve(&self) -> Result<ContextSpec> {
        match self {
            ContextInput::None => Ok(ContextSpec::NONE),
            ContextInput::Text(s) => parse_context(s),
            ContextInput::Counts(spec) => Ok(*spec),
        }
    }
}

/// Fully resolved parameters of one filter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub needle: String,
    pub search_type: SearchType,
    pub invert: bool,
    pub context: ContextInput,
}

impl FilterRequest {
    /// Attach context (builder-style; consumes `self`).
    #[must_use]
    pub fn with_context(mut self, context: ContextInput) -> Self {
        self.context = context;
        self
    }
}

/// Everything computed before the document is touched.
struct Prepared {
    selection: Selection,
    render: RenderConfig,
}

fn prepare<D>(doc: &D, request: &FilterRequest, config: &impl Configuration) -> Result<Prepared>
where
    D: DocumentSource + ?Sized,
{
    let context = request.context.resolve()?;
    let matcher = LineMatcher::compile(
        &request.needle,
        request.search_type,
        &MatchOptions::from_configuration(config),
    )?
    .inverted(request.invert);
    let render = RenderConfig::from_configuration(config);
    let selection = select_lines(doc, &matcher, context, render.selection_mode())?;
    Ok(Prepared { selection, render })
}

/// Run a filter and render the result as a new document.
///
/// `doc` is only read.
pub fn filter_lines<D>(
    doc: &D,
    request: &FilterRequest,
    config: &impl Configuration,
) -> Result<RenderedDocument>
where
    D: DocumentSource + ?Sized,
{
    let Prepared { selection, render } = prepare(doc, request, config)?;
    let out = render_new_document(doc, &selection, &render);
    tracing::info!(
        retained = selection.len(),
        bytes = out.content.len(),
        "rendered new document"
    );
    Ok(out)
}

/// Run a filter and issue in-place edits to `host`.
///
/// All edits are issued only after the pattern and context have been
/// parsed and the selection computed; on error nothing is issued. The host
/// is responsible for applying the batch.
pub fn filter_lines_in_place<H>(
    host: &mut H,
    request: &FilterRequest,
    config: &impl Configuration,
) -> Result<(usize, Option<FoldRequest>)>
where
    H: DocumentSource + EditSink + ?Sized,
{
    let Prepared { selection, render } = prepare(&*host, request, config)?;
    let mut batch = EditBatch::new();
    let fold = render_in_place(&*host, &selection, &render, &mut batch);
    let issued = batch.len();
    tracing::info!(
        retained = selection.len(),
        deleted = batch.lines_deleted(),
        edits = issued,
        "issued in-place edits"
    );
    batch.replay_into(host);
    Ok((issued, fold))
}

/// Run a filter against an in-memory buffer using the `createNewTab`
/// setting to pick the strategy. In-place edits are committed before
/// returning.
pub fn run_filter(
    buffer: &mut TextBuffer,
    request: &FilterRequest,
    config: &impl Configuration,
) -> Result<RenderOutput> {
    if RenderConfig::from_configuration(config).create_new_tab {
        return filter_lines(&*buffer, request, config).map(RenderOutput::NewDocument);
    }
    let (_, fold) = filter_lines_in_place(buffer, request, config)?;
    let edits = buffer.commit()?;
    Ok(RenderOutput::InPlace { edits, fold })
}

/// Prefill values for the search and context prompts.
pub struct PromptDefaults<'a, C: ?Sized, S: ?Sized> {
    config: &'a C,
    storage: &'a S,
}

impl<'a, C, S> PromptDefaults<'a, C, S>
where
    C: Configuration,
    S: Storage + ?Sized,
{
    pub fn new(config: &'a C, storage: &'a S) -> Self {
        Self { config, storage }
    }

    /// Previous search when preserved, else the word under the cursor.
    pub fn search(&self, word_under_cursor: Option<&str>) -> String {
        let preserved = if self.config.get::<PreserveSearch>() {
            self.storage.get(StateKey::LatestSearch)
        } else {
            String::new()
        };
        if preserved.is_empty() {
            word_under_cursor.unwrap_or_default().to_string()
        } else {
            preserved
        }
    }

    /// Previous context string, shared by every command.
    pub fn context(&self) -> String {
        self.storage.get(StateKey::LatestContext)
    }

    /// Record a successful run.
    ///
    /// The search is kept only when `preserveSearch` is on; a context string
    /// is always kept.
    pub fn remember(&self, request: &FilterRequest) -> Result<()> {
        if self.config.get::<PreserveSearch>() {
            self.storage.set(StateKey::LatestSearch, &request.needle)?;
        }
        if let ContextInput::Text(s) = &request.context {
            self.storage.set(StateKey::LatestContext, s)?;
        }
        Ok(())
    }
}

/// The word touching `column` (in chars) of `line`, if any.
///
/// Words are runs of alphanumeric characters and `_`.
pub fn word_at(line: &str, column: usize) -> Option<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let col = column.min(chars.len());

    let mut start = col;
    while start > 0 && is_word(chars[start - 1].1) {
        start -= 1;
    }
    let mut end = col;
    while end < chars.len() && is_word(chars[end].1) {
        end += 1;
    }
    if start == end {
        return None;
    }

    let from = chars[start].0;
    let to = chars.get(end).map_or(line.len(), |(b, _)| *b);
    Some(&line[from..to])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GivenConfiguration, Settings};
    use crate::error::Error;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    const NUMBERS: &str = "1\n2\n3\n2\n4";

    fn config(f: impl FnOnce(&mut Settings)) -> GivenConfiguration {
        let mut settings = Settings::default();
        f(&mut settings);
        GivenConfiguration::new(settings)
    }

    #[test]
    fn command_prompts() {
        let prompts: Vec<String> = [
            FilterCommand::IncludeLinesWithRegex,
            FilterCommand::IncludeLinesWithString,
            FilterCommand::ExcludeLinesWithRegex,
            FilterCommand::ExcludeLinesWithString,
        ]
        .iter()
        .map(|c| c.prompt())
        .collect();
        assert_eq!(
            prompts,
            vec![
                "Filter to lines matching: ",
                "Filter to lines containing: ",
                "Filter to lines not matching: ",
                "Filter to lines not containing: ",
            ]
        );
        assert_eq!(
            FilterCommand::ExcludeLinesWithString.id(),
            "filterlines.excludeLinesWithString"
        );
    }

    #[test]
    fn commands_filter_numbers() {
        let cases = [
            (FilterCommand::IncludeLinesWithRegex, "[23]", "2\n3\n2"),
            (FilterCommand::IncludeLinesWithString, "2", "2\n2"),
            (FilterCommand::ExcludeLinesWithRegex, "[14]", "2\n3\n2"),
            (FilterCommand::ExcludeLinesWithString, "2", "1\n3\n4"),
        ];
        let doc = TextBuffer::new(NUMBERS);
        for (command, needle, expected) in cases {
            let out = filter_lines(&doc, &command.request(needle), &GivenConfiguration::default())
                .unwrap();
            assert_eq!(out.content, expected, "{}", command.id());
        }
    }

    #[test]
    fn run_filter_honours_create_new_tab() {
        let mut buffer = TextBuffer::new(NUMBERS);
        let request = FilterCommand::IncludeLinesWithString.request("2");

        let out = run_filter(&mut buffer, &request, &GivenConfiguration::default()).unwrap();
        assert!(matches!(out, RenderOutput::NewDocument(ref d) if d.content == "2\n2"));
        assert_eq!(buffer.text(), NUMBERS);

        let in_place = config(|s| s.create_new_tab = false);
        let out = run_filter(&mut buffer, &request, &in_place).unwrap();
        assert_eq!(out, RenderOutput::InPlace { edits: 3, fold: None });
        // the kept line 3 keeps its own break
        assert_eq!(buffer.text(), "2\n2\n");
    }

    #[test]
    fn errors_leave_document_untouched() {
        let mut buffer = TextBuffer::new(NUMBERS);
        let in_place = config(|s| s.create_new_tab = false);

        let bad_context = FilterCommand::IncludeLinesWithString
            .request("2")
            .with_context(ContextInput::Text("1:".to_string()));
        let err = run_filter(&mut buffer, &bad_context, &in_place).unwrap_err();
        assert!(matches!(err, Error::ContextParse(_)));

        let bad_pattern = FilterCommand::IncludeLinesWithRegex.request("(");
        let err = run_filter(&mut buffer, &bad_pattern, &in_place).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));

        assert_eq!(buffer.text(), NUMBERS);
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn numeric_context_skips_parsing() {
        let doc = TextBuffer::new("a\nb\nc\nd");
        let request = FilterCommand::IncludeLinesWithString
            .request("c")
            .with_context(ContextInput::Counts(ContextSpec::new(1, 0)));
        let out = filter_lines(&doc, &request, &GivenConfiguration::default()).unwrap();
        assert_eq!(out.content, "b\nc");
    }

    #[test]
    fn search_prefill_prefers_preserved_search() {
        let storage = MemoryStorage::new();
        let preserve = GivenConfiguration::default();
        let defaults = PromptDefaults::new(&preserve, &storage);

        assert_eq!(defaults.search(Some("feugiat")), "feugiat");
        defaults
            .remember(&FilterCommand::IncludeLinesWithRegex.request("feugiat"))
            .unwrap();
        assert_eq!(defaults.search(Some("consectetur")), "feugiat");
        assert_eq!(defaults.search(None), "feugiat");
    }

    #[test]
    fn search_prefill_without_preservation() {
        let storage = MemoryStorage::new().with(StateKey::LatestSearch, "old");
        let no_preserve = config(|s| s.preserve_search = false);
        let defaults = PromptDefaults::new(&no_preserve, &storage);

        assert_eq!(defaults.search(Some("consectetur")), "consectetur");
        assert_eq!(defaults.search(None), "");

        defaults
            .remember(&FilterCommand::IncludeLinesWithRegex.request("new"))
            .unwrap();
        assert_eq!(storage.get(StateKey::LatestSearch), "old");
    }

    #[test]
    fn context_is_remembered_regardless_of_preserve_search() {
        let storage = MemoryStorage::new();
        let no_preserve = config(|s| s.preserve_search = false);
        let defaults = PromptDefaults::new(&no_preserve, &storage);

        let request = FilterCommand::IncludeLinesWithRegex
            .request("ipsum")
            .with_context(ContextInput::Text("1".to_string()));
        defaults.remember(&request).unwrap();
        assert_eq!(defaults.context(), "1");

        // numeric context is not a context string and is not stored
        let request = FilterCommand::ExcludeLinesWithString
            .request("ipsum")
            .with_context(ContextInput::Counts(ContextSpec::symmetric(4)));
        defaults.remember(&request).unwrap();
        assert_eq!(defaults.context(), "1");
    }

    #[test]
    fn word_under_cursor() {
        let line = "Vivamus et feugiat libero.";
        assert_eq!(word_at(line, 13), Some("feugiat"));
        assert_eq!(word_at(line, 11), Some("feugiat"));
        assert_eq!(word_at(line, 18), Some("feugiat"));
        assert_eq!(word_at(line, 25), Some("libero"));
        assert_eq!(word_at(line, 26), None);
        assert_eq!(word_at("a  b", 2), None);
        assert_eq!(word_at("snake_case", 99), Some("snake_case"));
        assert_eq!(word_at("día feliz", 1), Some("día"));
        assert_eq!(word_at("", 0), None);
    }
}
