//! Comment-out transformation for dead statements.
//!
//! The replaced range becomes a marker line followed by the original text,
//! line by line, behind `// `. Internal line breaks are preserved.

use std::ops::Range;

use super::EditSpan;

/// Marker placed above a commented-out variable statement.
pub const VARIABLE_MARKER: &str = "// TODO: Unused variable";

/// Marker placed above a commented-out function declaration.
pub const FUNCTION_MARKER: &str = "// TODO: Unused function";

fn push_commented(out: &mut String, line: &str) {
    let body = line.trim_start();
    out.push_str(&line[..line.len() - body.len()]);
    if body.is_empty() {
        out.push_str("//");
    } else {
        out.push_str("// ");
        out.push_str(body);
    }
}

/// Builds the edit that comments out `range` under `marker`.
///
/// The first commented line takes the indentation of the statement. When
/// code follows the range on the same line, it is moved onto a new line so
/// it does not end up inside the comment.
pub fn comment_out(source: &str, range: Range<usize>, marker: &str) -> EditSpan {
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let lead = &source[line_start..range.start];
    let indent = if lead.trim().is_empty() { lead } else { "" };

    let text = &source[range.clone()];
    let mut out = String::with_capacity(marker.len() + text.len() * 2);
    out.push_str(marker);
    for (i, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        out.push_str(newline);
        if i == 0 {
            out.push_str(indent);
        }
        push_commented(&mut out, line);
    }

    let mut end = range.end;
    let rest = &source[range.end..];
    let tail = &rest[..rest.find('\n').unwrap_or(rest.len())];
    if !tail.trim().is_empty() {
        end += tail.len() - tail.trim_start().len();
        out.push_str(newline);
        out.push_str(indent);
    }

    EditSpan::replace(range.start..end, out)
}
