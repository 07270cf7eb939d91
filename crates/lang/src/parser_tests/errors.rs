// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error reporting: unknown decorators, arity violations, duplicates,
//! and diagnostics rendering.

use super::*;
use crate::ParseError;

#[test]
fn unknown_block_decorator() {
    let report = parse("build: @bogus(1) { echo hi }").unwrap_err();
    assert!(report.to_string().contains("unknown decorator @bogus"));
}

#[test]
fn block_decorator_requires_braces() {
    let report = parse("build: @timeout(5s) echo hi").unwrap_err();
    assert!(report.to_string().contains("'{' after block decorator"));
}

#[test]
fn too_many_arguments() {
    let report = parse("build: @timeout(5s, 10s, 15s) { echo hi }").unwrap_err();
    assert!(report.to_string().contains("at most 1 argument"));
}

#[test]
fn missing_required_argument() {
    let report = parse("build: @timeout { echo hi }").unwrap_err();
    assert!(report
        .to_string()
        .contains("missing required parameter 'duration'"));
}

#[test]
fn wrong_argument_type() {
    let report = parse("build: @timeout(\"soon\") { echo hi }").unwrap_err();
    assert!(report.to_string().contains("expects duration"));
}

#[test]
fn duplicate_command_names() {
    let report = parse("build: echo one\nbuild: echo two").unwrap_err();
    assert!(report.to_string().contains("duplicate command 'build'"));
}

#[test]
fn watch_stop_pair_is_allowed() {
    let parsed = parse_ok("watch server: node app.js\nstop server: npm run stop");
    assert_eq!(parsed.commands.len(), 2);
}

#[test]
fn regular_command_cannot_share_watch_name() {
    let report = parse("watch server: node app.js\nserver: echo hi").unwrap_err();
    assert!(report
        .to_string()
        .contains("conflicts with a watch/stop command"));
}

#[test]
fn missing_colon_after_command_name() {
    let report = parse("build echo hi").unwrap_err();
    assert!(report.to_string().contains("expected ':' after command name"));
}

#[test]
fn errors_carry_line_and_column() {
    let report = parse("ok: echo fine\nvar X = bad").unwrap_err();
    let err = &report.errors[0];
    let diag = err.diagnostic("ok: echo fine\nvar X = bad");
    assert!(diag.contains("line 2"));
    assert!(diag.contains("var X = bad"));
    assert!(diag.contains('^'));
}

#[test]
fn unexpected_token_variant() {
    let report = parse("build echo hi").unwrap_err();
    assert!(matches!(
        report.errors[0],
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn report_groups_all_errors() {
    let report = parse("a: @bogus { x }\nb: @timeout { y }\nc: echo ok").unwrap_err();
    assert_eq!(report.len(), 2);
    let rendered = report.to_string();
    assert!(rendered.starts_with("parsing failed:"));
    assert!(rendered.contains("unknown decorator @bogus"));
    assert!(rendered.contains("missing required parameter"));
}
