// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(2, 5);
    let b = Span::new(8, 12);
    assert_eq!(a.merge(b), Span::new(2, 12));
    assert_eq!(b.merge(a), Span::new(2, 12));
}

#[test]
fn merge_is_idempotent() {
    let a = Span::new(3, 9);
    assert_eq!(a.merge(a), a);
}

#[test]
fn locate_span_on_first_line() {
    let source = "build: echo hi";
    let (line, col, text) = locate_span(source, Span::new(7, 11));
    assert_eq!(line, 1);
    assert_eq!(col, 7);
    assert_eq!(text, "build: echo hi");
}

#[test]
fn locate_span_on_later_line() {
    let source = "var A = 1\nbuild: echo hi";
    let (line, col, text) = locate_span(source, Span::new(10, 15));
    assert_eq!(line, 2);
    assert_eq!(col, 0);
    assert_eq!(text, "build: echo hi");
}

#[test]
fn locate_span_past_end_resolves_to_last_line() {
    let source = "a: one\nb: two";
    let (line, _, text) = locate_span(source, Span::empty(source.len() + 10));
    assert_eq!(line, 2);
    assert_eq!(text, "b: two");
}

#[test]
fn diagnostic_block_shape() {
    let source = "build: echo hi\nvar X = word";
    let diag = diagnostic_context(source, Span::new(23, 27), "bad literal");
    assert!(diag.contains("error: bad literal"));
    assert!(diag.contains("line 2, column 9"));
    assert!(diag.contains("2 | var X = word"));
    assert!(diag.contains("^^^^"));
}

#[test]
fn caret_is_clamped_to_the_anchor_line() {
    // A command's span merges across its whole body; the caret run must
    // stop at the end of the first line.
    let source = "build: {\n    echo hi\n}";
    let span = Span::new(0, source.len());
    let diag = diagnostic_context(source, span, "whole command");
    let caret_line = diag.lines().last().unwrap_or_default();
    assert_eq!(caret_line.matches('^').count(), "build: {".len());
    assert!(!diag.contains("echo hi\n}")); // only the anchor line renders
}

#[test]
fn zero_width_span_renders_single_caret() {
    let diag = diagnostic_context("abc", Span::empty(1), "here");
    let caret_line = diag.lines().last().unwrap_or_default();
    assert_eq!(caret_line.matches('^').count(), 1);
}

#[test]
fn gutter_width_follows_the_line_number() {
    let mut source = String::new();
    for _ in 0..11 {
        source.push_str("ok: true\n");
    }
    source.push_str("var X = word");
    let start = source.len() - 4;
    let diag = diagnostic_context(&source, Span::new(start, start + 4), "bad literal");
    assert!(diag.contains("line 12"));
    assert!(diag.contains("12 | var X = word"));
}
