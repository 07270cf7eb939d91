// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use devcmd_core::ast::NamedParam;
use devcmd_core::value::Expr;
use serial_test::serial;

fn args(params: Vec<NamedParam>) -> ConfirmArgs {
    confirm_args(&params)
}

#[test]
fn defaults_match_documented_behavior() {
    let a = args(vec![]);
    assert_eq!(a.message, "Do you want to continue?");
    assert!(!a.default_yes);
    assert!(a.abort_on_no);
    assert!(!a.case_sensitive);
    assert!(a.skip_in_ci);
}

#[test]
fn parameters_override_defaults() {
    let a = args(vec![
        NamedParam::named("message", Expr::Str("Deploy?".into())),
        NamedParam::named("defaultYes", Expr::Bool(true)),
        NamedParam::named("abortOnNo", Expr::Bool(false)),
        NamedParam::named("ci", Expr::Bool(false)),
    ]);
    assert_eq!(a.message, "Deploy?");
    assert!(a.default_yes);
    assert!(!a.abort_on_no);
    assert!(!a.skip_in_ci);
}

#[test]
fn prompt_suffix_reflects_default() {
    assert_eq!(prompt_suffix(true), " [Y/n]: ");
    assert_eq!(prompt_suffix(false), " [y/N]: ");
}

#[test]
fn empty_response_uses_default() {
    let yes = args(vec![NamedParam::named("defaultYes", Expr::Bool(true))]);
    assert!(response_confirms("", &yes));

    let no = args(vec![]);
    assert!(!response_confirms("", &no));
}

#[test]
fn case_insensitive_matching() {
    let a = args(vec![]);
    for response in ["y", "Y", "yes", "YES", "Yes"] {
        assert!(response_confirms(response, &a), "{response} should confirm");
    }
    for response in ["n", "no", "nah", "si"] {
        assert!(!response_confirms(response, &a), "{response} should decline");
    }
}

#[test]
fn case_sensitive_matching() {
    let a = args(vec![NamedParam::named("caseSensitive", Expr::Bool(true))]);
    assert!(response_confirms("y", &a));
    assert!(response_confirms("Yes", &a));
    assert!(!response_confirms("YES", &a));
    assert!(!response_confirms("yES", &a));
}

#[test]
#[serial]
fn ci_detection_reads_indicator_variables() {
    // Guard against ambient CI when running these assertions locally.
    let ambient: Vec<&str> = CI_VARS
        .iter()
        .copied()
        .filter(|v| std::env::var(v).map(|x| !x.is_empty()).unwrap_or(false))
        .collect();

    if ambient.is_empty() {
        assert!(!is_ci());
        std::env::set_var("BUILDKITE", "1");
        assert!(is_ci());
        std::env::remove_var("BUILDKITE");
        assert!(!is_ci());
    } else {
        assert!(is_ci());
    }
}

#[test]
#[serial]
fn empty_indicator_does_not_count_as_ci() {
    let ambient = CI_VARS
        .iter()
        .any(|v| std::env::var(v).map(|x| !x.is_empty()).unwrap_or(false));
    if !ambient {
        std::env::set_var("TRAVIS", "");
        assert!(!is_ci());
        std::env::remove_var("TRAVIS");
    }
}
