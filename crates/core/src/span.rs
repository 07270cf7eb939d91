// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte spans and diagnostic rendering for `.cli` sources.
//!
//! Every token and AST node records the byte range it came from, and the
//! parser grows spans freely as it consumes tokens: a command's span ends
//! up covering its whole body, often several lines. Rendering therefore
//! anchors on the first line of a span and clamps the caret run to that
//! line, so a merged multi-line span still produces a tidy block inside
//! the grouped "parsing failed" report.

use serde::{Deserialize, Serialize};

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// A zero-width span at a position (used for absent bodies and for
    /// anchoring errors at end of input).
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The smallest span covering both `self` and `other`.
    ///
    /// This is how declaration spans grow while parsing: start from the
    /// first token and merge in everything up to the last one consumed.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Resolve a span to (1-indexed line, 0-indexed column, line text).
///
/// The span's start is the anchor; an offset past the end of input
/// resolves to the last line.
pub fn locate_span(source: &str, span: Span) -> (usize, usize, &str) {
    let anchor = span.start.min(source.len());
    let before = &source[..anchor];

    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let line_end = source[anchor..]
        .find('\n')
        .map_or(source.len(), |nl| anchor + nl);
    let column = before[line_start..].chars().count();

    (line, column, &source[line_start..line_end])
}

/// Render one annotated block for devcmd's grouped error reports:
///
/// ```text
/// error: variable value must be a quoted string, number, duration, or boolean literal
///   --> line 3, column 9
///   |
/// 3 | var X = word
///   |         ^^^^
/// ```
///
/// The caret run covers the span but never runs past the anchor line and
/// is never shorter than one caret, so both zero-width spans and merged
/// multi-line spans render sensibly.
pub fn diagnostic_context(source: &str, span: Span, message: &str) -> String {
    let (line, column, text) = locate_span(source, span);

    let room = text.chars().count().saturating_sub(column);
    let carets = span.end.saturating_sub(span.start).clamp(1, room.max(1));

    let number = line.to_string();
    let pad = " ".repeat(number.len());
    [
        format!("error: {message}"),
        format!("  --> line {line}, column {}", column + 1),
        format!("{pad} |"),
        format!("{number} | {text}"),
        format!("{pad} | {}{}", " ".repeat(column), "^".repeat(carets)),
    ]
    .join("\n")
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
