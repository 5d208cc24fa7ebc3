//! Context string parsing: `"n"`, `"before:after"`, or blank.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([0-9]+)\s*$").expect("valid regex"));
static PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+)\s*:\s*([0-9]+)\s*$").expect("valid regex"));
static BLANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*$").expect("valid regex"));

/// Number of lines kept before and after each anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextSpec {
    pub before: usize,
    pub after: usize,
}

impl ContextSpec {
    pub const NONE: ContextSpec = ContextSpec {
        before: 0,
        after: 0,
    };

    #[inline]
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Same count on both sides.
    #[inline]
    pub fn symmetric(n: usize) -> Self {
        Self {
            before: n,
            after: n,
        }
    }

    /// True when no context lines are requested.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.before == 0 && self.after == 0
    }
}

impl FromStr for ContextSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_context(s)
    }
}

/// Parse a free-form context string.
///
/// Accepted forms, tried in order: a single non-negative integer `n`
/// (giving `(n, n)`), `before:after` with optional whitespace around each
/// part, or an all-whitespace string (giving `(0, 0)`). Anything else is
/// `Error::ContextParse` carrying the input.
pub fn parse_context(s: &str) -> Result<ContextSpec> {
    let fail = || Error::ContextParse(s.to_string());

    if let Some(caps) = SINGLE.captures(s) {
        let n = caps[1].parse::<usize>().map_err(|_| fail())?;
        return Ok(ContextSpec::symmetric(n));
    }
    if let Some(caps) = PAIR.captures(s) {
        let before = caps[1].parse::<usize>().map_err(|_| fail())?;
        let after = caps[2].parse::<usize>().map_err(|_| fail())?;
        return Ok(ContextSpec::new(before, after));
    }
    if BLANK.is_match(s) {
        return Ok(ContextSpec::NONE);
    }
    Err(fail())
}
