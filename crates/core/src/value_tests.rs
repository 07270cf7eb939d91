// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn parses_all_duration_units() {
    assert_eq!(parse_duration("100ns").unwrap(), Duration::from_nanos(100));
    assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
    assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
    assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
    assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
}

#[test]
fn rejects_missing_or_unknown_suffix() {
    assert!(parse_duration("30").is_err());
    assert!(parse_duration("30d").is_err());
    assert!(parse_duration("30 s").is_err());
    assert!(parse_duration("s").is_err());
    assert!(parse_duration("").is_err());
}

#[test]
fn rejects_fractional_durations() {
    assert!(parse_duration("1.5s").is_err());
}

#[test]
fn expr_shell_text_forms() {
    assert_eq!(Expr::Str("./src".into()).as_shell_text(), "./src");
    assert_eq!(Expr::Number("8080".into()).as_shell_text(), "8080");
    assert_eq!(Expr::Duration("30s".into()).as_shell_text(), "30s");
    assert_eq!(Expr::Bool(true).as_shell_text(), "true");
}

#[test]
fn expr_display_quotes_strings() {
    assert_eq!(Expr::Str("hello".into()).to_string(), "\"hello\"");
    assert_eq!(
        Expr::Str("say \"hi\"".into()).to_string(),
        "\"say \\\"hi\\\"\""
    );
    assert_eq!(Expr::Ident("PORT".into()).to_string(), "PORT");
}

#[test]
fn expr_type_mismatch_reports_kinds() {
    let err = Expr::Str("x".into()).as_duration().unwrap_err();
    assert!(matches!(
        err,
        ValueError::TypeMismatch {
            expected: ExprKind::Duration,
            found: ExprKind::String,
        }
    ));
}

#[test]
fn integer_params_parse() {
    assert_eq!(Expr::Number("3".into()).as_integer().unwrap(), 3);
    assert!(Expr::Number("-1".into()).as_integer().is_err());
    assert!(Expr::Number("3.5".into()).as_integer().is_err());
}
