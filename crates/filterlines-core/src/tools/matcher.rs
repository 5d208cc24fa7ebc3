use crate::config::{CaseSensitiveRegexSearch, CaseSensitiveStringSearch, Configuration};
use crate::error::Result;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher as GrepMatcher, RegexMatcherBuilder};

/// How the search text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// Verbatim substring; metacharacters have no special meaning.
    String,
    /// Regular expression.
    #[default]
    Regex,
}

/// Case-sensitivity switches, one per search type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub case_sensitive_string: bool,
    pub case_sensitive_regex: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive_string: false,
            case_sensitive_regex: true,
        }
    }
}

impl MatchOptions {
    pub fn from_configuration(config: &impl Configuration) -> Self {
        Self {
            case_sensitive_string: config.get::<CaseSensitiveStringSearch>(),
            case_sensitive_regex: config.get::<CaseSensitiveRegexSearch>(),
        }
    }

    /// Whether a search of `search_type` ignores case.
    #[inline]
    pub fn case_insensitive(&self, search_type: SearchType) -> bool {
        match search_type {
            SearchType::String => !self.case_sensitive_string,
            SearchType::Regex => !self.case_sensitive_regex,
        }
    }
}

/// Per-line predicate built on `grep_regex::RegexMatcher`.
///
/// Every test runs against the whole line from offset zero, so no match
/// position carries over between lines.
pub struct LineMatcher {
    inner: GrepMatcher,
    invert: bool,
}

impl LineMatcher {
    /// Compile `search_text` into a matcher.
    ///
    /// String searches are escaped first so the text matches verbatim.
    /// An invalid regular expression is returned as `Error::Pattern`.
    pub fn compile(search_text: &str, search_type: SearchType, opts: &MatchOptions) -> Result<Self> {
        let pattern = match search_type {
            SearchType::String => regex::escape(search_text),
            SearchType::Regex => search_text.to_string(),
        };

        let mut b = RegexMatcherBuilder::new();
        b.case_insensitive(opts.case_insensitive(search_type));

        let matcher = b.build(&pattern)?;
        tracing::debug!(?search_type, pattern = %pattern, "compiled line matcher");
        Ok(Self {
            inner: matcher,
            invert: false,
        })
    }

    /// Flip the effective predicate (builder-style; consumes `self`).
    #[inline]
    #[must_use]
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Raw match test, ignoring the invert flag.
    #[inline]
    pub fn is_match(&self, line: &str) -> Result<bool> {
        Ok(self.inner.is_match(line.as_bytes())?)
    }

    /// Effective inclusion predicate: `is_match(line) != invert`.
    #[inline]
    pub fn includes(&self, line: &str) -> Result<bool> {
        Ok(self.is_match(line)? != self.invert)
    }
}
