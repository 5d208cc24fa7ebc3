//! Read side of the host document.

/// Line break sequence used by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Style of the first line break in `text`; `Lf` when there is none.
    pub fn detect(text: &str) -> Self {
        match memchr::memchr(b'\n', text.as_bytes()) {
            Some(nl) if nl > 0 && text.as_bytes()[nl - 1] == b'\r' => LineEnding::Crlf,
            _ => LineEnding::Lf,
        }
    }

    /// Rewrite every line break in `text` to this style.
    pub fn normalize(self, text: String) -> String {
        let bytes = text.as_bytes();
        let crlf = self == LineEnding::Crlf;
        let uniform = memchr::memchr_iter(b'\n', bytes)
            .all(|nl| (nl > 0 && bytes[nl - 1] == b'\r') == crlf);
        if uniform {
            return text;
        }

        let mut out = String::with_capacity(text.len() + text.len() / 16);
        for piece in text.split_inclusive('\n') {
            match piece.strip_suffix('\n') {
                Some(body) => {
                    out.push_str(body.strip_suffix('\r').unwrap_or(body));
                    out.push_str(self.as_str());
                }
                None => out.push_str(piece),
            }
        }
        out
    }
}

/// A stable, read-only snapshot of a document's lines.
///
/// Indices passed to `line_text` are always in `[0, line_count())`.
pub trait DocumentSource {
    fn line_count(&self) -> usize;

    /// Text of line `index` without its line break.
    fn line_text(&self, index: usize) -> &str;

    fn line_break_style(&self) -> LineEnding {
        LineEnding::Lf
    }
}

impl<S: AsRef<str>> DocumentSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_first_line_break() {
        assert_eq!(LineEnding::detect("a\r\nb\nc"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect("a\nb\r\nc"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("abc"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("\n"), LineEnding::Lf);
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
    }

    #[test]
    fn normalize_rewrites_mixed_breaks() {
        assert_eq!(LineEnding::Crlf.normalize("a\r\nb\nc\n".into()), "a\r\nb\r\nc\r\n");
        assert_eq!(LineEnding::Lf.normalize("a\nb\r\nc".into()), "a\nb\nc");
        assert_eq!(LineEnding::Crlf.normalize("a\r\nb".into()), "a\r\nb");
        assert_eq!(LineEnding::Lf.normalize(String::new()), "");
    }

    #[test]
    fn slices_are_documents() {
        let lines = ["1", "2"];
        let doc: &[&str] = &lines;
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_text(1), "2");
        assert_eq!(doc.line_break_style(), LineEnding::Lf);
    }
}
