//! Icon-name token scanning.
//!
//! Finds every `icon(-word)+` token in a document, line by line. Matching is
//! ASCII case-insensitive, non-overlapping, and limited to the first
//! [`MAX_SCAN_COLUMNS`] columns of each line.
//!
//! Columns are UTF-16 code units, the unit editor hosts address positions in.
//! A character outside the Basic Multilingual Plane occupies two columns.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::OnceLock;

use crate::host::{TextDocument, TokenRange};

/// UTF-16 columns per line that are considered; anything beyond is never matched.
pub const MAX_SCAN_COLUMNS: usize = 1000;

static ICON_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled icon-name pattern
fn icon_regex() -> &'static Regex {
    ICON_REGEX.get_or_init(|| {
        RegexBuilder::new(r"icon(?:-[a-z]+)+")
            .case_insensitive(true)
            // ASCII-only folding: [a-z] must not pick up the Kelvin sign or long s
            .unicode(false)
            .build()
            .expect("Failed to compile icon name regex")
    })
}

/// One icon-name token found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenOccurrence {
    pub line: usize,
    /// Start column (UTF-16 units, inclusive)
    pub start: usize,
    /// End column (UTF-16 units, exclusive)
    pub end: usize,
    /// Matched text exactly as written
    pub text: String,
}

impl TokenOccurrence {
    pub fn range(&self) -> TokenRange {
        TokenRange {
            line: self.line,
            start: self.start,
            end: self.end,
        }
    }
}

/// Cut `text` after `MAX_SCAN_COLUMNS` UTF-16 units.
///
/// A surrogate pair straddling the bound is dropped whole.
fn bounded(text: &str) -> &str {
    let mut columns = 0;
    for (idx, ch) in text.char_indices() {
        columns += ch.len_utf16();
        if columns > MAX_SCAN_COLUMNS {
            return &text[..idx];
        }
    }
    text
}

/// Scan a single line.
pub fn scan_line(line: usize, text: &str) -> Vec<TokenOccurrence> {
    let text = bounded(text);
    let mut found = Vec::new();

    // Byte offsets are walked forward once to produce UTF-16 columns
    let mut byte_cursor = 0;
    let mut column = 0;
    for mat in icon_regex().find_iter(text) {
        column += text[byte_cursor..mat.start()].encode_utf16().count();
        let start = column;
        // The pattern is ASCII-only, so the match length in columns equals its bytes
        let end = start + mat.len();
        byte_cursor = mat.end();
        column = end;

        found.push(TokenOccurrence {
            line,
            start,
            end,
            text: mat.as_str().to_string(),
        });
    }
    found
}

/// Scan a whole document, in line order then column order.
pub fn scan(document: &dyn TextDocument) -> Vec<TokenOccurrence> {
    let mut found = Vec::new();
    for line in 0..document.line_count() {
        if let Some(text) = document.line_text(line) {
            found.extend(scan_line(line, text));
        }
    }
    log::trace!("Scanned {}: {} icon tokens", document.uri(), found.len());
    found
}
