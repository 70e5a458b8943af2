//! Rendering failures for people.
//!
//! ```text
//! error: undefined variable: nope
//!  --> demo.kn:2:5
//!   |
//! 2 | 1 + nope
//!   |     ^^^^
//! ```

use std::fmt::Write;

use kiln_ir::Span;

use crate::KilnError;

/// 1-based line and column of a byte offset. Columns count characters.
pub fn offset_to_line_col(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// The text of a 1-based line, without its newline.
fn line_text(source: &str, line: usize) -> &str {
    source
        .split('\n')
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .trim_end_matches('\r')
}

/// Number of carets under `span`, clipped to the first line it touches.
fn caret_width(source: &str, span: Span, col: usize, text: &str) -> usize {
    let covered = source
        .get(span.to_range())
        .map_or(0, |s| s.split('\n').next().unwrap_or("").chars().count());
    let remaining = text.chars().count().saturating_sub(col - 1);
    covered.min(remaining).max(1)
}

/// Format `error` against the source it came from.
pub fn render(error: &KilnError, source: &str, path: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "error: {}", error.message());

    let Some(span) = error.span() else {
        let _ = writeln!(out, " --> {path}");
        return out;
    };

    let (line, col) = offset_to_line_col(source, span.start);
    let text = line_text(source, line);
    let pad = " ".repeat(line.to_string().len());
    let width = caret_width(source, span, col, text);

    let _ = writeln!(out, "{pad}--> {path}:{line}:{col}");
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{line} | {text}");
    let _ = writeln!(
        out,
        "{pad} | {}{}",
        " ".repeat(col - 1),
        "^".repeat(width)
    );
    out
}
