use thiserror::Error;

/// Text shown to the user when a context string cannot be parsed.
pub const CONTEXT_PARSE_MESSAGE: &str = "Expected a single number or before_context:after_context";

/// Canonical errors for filterlines core
#[derive(Error, Debug)]
pub enum Error {
    // -------- Search / Context --------
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] grep_regex::Error),

    #[error("invalid context string: {0:?}")]
    ContextParse(String),

    // -------- Document / Edits --------
    #[error("invalid range: [{0}, {1})")]
    InvalidRange(usize, usize),

    // -------- Settings / State --------
    #[error("invalid settings: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid state file: {0}")]
    Storage(String),

    // -------- Wrapped sources --------
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    GrepMatcher(#[from] grep_matcher::NoError),
}

impl Error {
    /// Message suitable for the host's "show error message" surface.
    pub fn user_message(&self) -> String {
        match self {
            Error::ContextParse(_) => CONTEXT_PARSE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
