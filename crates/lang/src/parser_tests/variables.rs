// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable declarations and var groups.

use super::*;

#[test]
fn string_number_duration_boolean_values() {
    let parsed = parse_ok(
        "var SRC = \"./src\"\nvar PORT = 8080\nvar WAIT = 500ms\nvar VERBOSE = true\nnoop: true",
    );
    assert_eq!(parsed.variables.len(), 4);
    assert_eq!(parsed.variables[0].value, s("./src"));
    assert_eq!(parsed.variables[1].value, Expr::Number("8080".into()));
    assert_eq!(parsed.variables[2].value, Expr::Duration("500ms".into()));
    assert_eq!(parsed.variables[3].value, Expr::Bool(true));
}

#[test]
fn var_group_is_equivalent_to_flat_declarations() {
    let grouped = parse_ok("var (\n    A = 1\n    B = \"x\"\n)\nrun: echo");
    assert_eq!(grouped.var_groups.len(), 1);
    assert_eq!(grouped.var_groups[0].variables.len(), 2);

    let flat = parse_ok("var A = 1\nvar B = \"x\"\nrun: echo");
    let grouped_vars: Vec<_> = grouped.all_variables().collect();
    let flat_vars: Vec<_> = flat.all_variables().collect();
    assert_eq!(grouped_vars, flat_vars);
}

#[test]
fn unquoted_value_is_a_parse_error() {
    let report = parse("var X = unquotedWord").unwrap_err();
    assert!(report
        .to_string()
        .contains("variable value must be a quoted string"));
}

#[test]
fn duplicate_variable_is_an_error() {
    let report = parse("var A = 1\nvar A = 2").unwrap_err();
    assert!(report.to_string().contains("duplicate variable 'A'"));
}

#[test]
fn single_quoted_strings() {
    let parsed = parse_ok("var MSG = 'hello'\nrun: echo");
    assert_eq!(parsed.variables[0].value, s("hello"));
}

#[test]
fn multiple_errors_are_collected() {
    let report = parse("var X = bad\nvar Y = worse\nok: echo fine").unwrap_err();
    assert_eq!(report.len(), 2);
}
