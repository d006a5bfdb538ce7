//! Edit planning and text patching.
//!
//! This is the only place source text is mutated. Every component that wants
//! to change the file produces [`EditSpan`]s against the original text; an
//! [`EditPlan`] validates them and splices them in back-to-front so earlier
//! offsets stay valid while later ones are rewritten.
//!
//! - `comment`: the comment-out transformation for dead statements
//! - `blank_lines`: collapsing blank-line runs left behind by removals

pub mod blank_lines;
pub mod comment;

pub use blank_lines::collapse_blank_lines;
pub use comment::{comment_out, FUNCTION_MARKER, VARIABLE_MARKER};

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeadbindError, DeadbindResult};

/// A `{start, end, replacement}` instruction over the original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditSpan {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl EditSpan {
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, "")
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether this span lies entirely within `outer`.
    pub fn is_within(&self, outer: &Range<usize>) -> bool {
        outer.start <= self.start && self.end <= outer.end
    }

    /// Spans conflict when their ranges intersect, or when both start at the
    /// same offset (their relative order would be undefined).
    fn conflicts_with(&self, next: &EditSpan) -> bool {
        next.start < self.end || next.start == self.start
    }
}

/// An ordered set of edits. The empty plan means "no change".
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    spans: Vec<EditSpan>,
}

impl EditPlan {
    pub fn new(spans: Vec<EditSpan>) -> Self {
        Self { spans }
    }

    pub fn push(&mut self, span: EditSpan) {
        self.spans.push(span);
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn spans(&self) -> &[EditSpan] {
        &self.spans
    }

    /// Drops every span that lies inside one of `ranges`.
    pub fn drop_within(&mut self, ranges: &[Range<usize>]) {
        self.spans
            .retain(|span| !ranges.iter().any(|outer| span.range() != *outer && span.is_within(outer)));
    }

    /// Sorts by position and removes exact duplicates.
    fn normalized(&self) -> Vec<EditSpan> {
        let mut spans = self.spans.clone();
        spans.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
        spans.dedup();
        spans
    }

    /// Checks bounds and non-overlap against `source`.
    pub fn validate(&self, source: &str) -> DeadbindResult<()> {
        let spans = self.normalized();
        for span in &spans {
            if span.start > span.end
                || span.end > source.len()
                || !source.is_char_boundary(span.start)
                || !source.is_char_boundary(span.end)
            {
                return Err(DeadbindError::invalid(format!(
                    "edit {}..{} is outside the {}-byte source",
                    span.start,
                    span.end,
                    source.len()
                )));
            }
        }
        for pair in spans.windows(2) {
            if pair[0].conflicts_with(&pair[1]) {
                return Err(DeadbindError::overlap(
                    (pair[0].start, pair[0].end),
                    (pair[1].start, pair[1].end),
                ));
            }
        }
        Ok(())
    }

    /// Applies the plan to `source`. Either every span is applied or, when
    /// validation fails, none is.
    pub fn apply(&self, source: &str) -> DeadbindResult<String> {
        self.validate(source)?;

        let mut spans = self.normalized();
        spans.sort_by(|a, b| b.start.cmp(&a.start));

        let mut text = source.to_string();
        for span in &spans {
            text.replace_range(span.start..span.end, &span.replacement);
        }
        debug!(edits = spans.len(), "applied edit plan");
        Ok(text)
    }
}

impl From<Vec<EditSpan>> for EditPlan {
    fn from(spans: Vec<EditSpan>) -> Self {
        Self::new(spans)
    }
}

impl Extend<EditSpan> for EditPlan {
    fn extend<I: IntoIterator<Item = EditSpan>>(&mut self, iter: I) {
        self.spans.extend(iter);
    }
}

/// Extends a statement range over a directly adjacent `;`.
pub(crate) fn include_semicolon(source: &str, range: Range<usize>) -> Range<usize> {
    if source[..range.end].ends_with(';') {
        return range;
    }
    if source[range.end..].starts_with(';') {
        return range.start..range.end + 1;
    }
    range
}

/// Extends a range to whole lines when nothing but whitespace shares its
/// lines, so removing it does not leave an empty line behind.
pub(crate) fn whole_lines(source: &str, range: Range<usize>) -> Range<usize> {
    // A byte order mark belongs to the file, not to the first line.
    let first_line = source.strip_prefix('\u{feff}').map_or(0, |body| source.len() - body.len());
    let line_start = source[..range.start].rfind('\n').map_or(first_line, |i| i + 1);
    if !source[line_start..range.start].trim().is_empty() {
        return range;
    }
    let rest = &source[range.end..];
    let newline = rest.find('\n');
    let tail = &rest[..newline.unwrap_or(rest.len())];
    if !tail.trim().is_empty() {
        return range;
    }
    let end = range.end + newline.map_or(rest.len(), |i| i + 1);
    line_start..end
}
