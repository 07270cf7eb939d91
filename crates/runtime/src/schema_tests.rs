// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use devcmd_core::ast::{NamedParam, Pattern, PatternBranch};
use devcmd_core::span::Span;
use devcmd_core::value::{Expr, ExprKind};

const PARAMS: &[ParameterSchema] = &[
    ParameterSchema::required("attempts", ExprKind::Number, "attempt count"),
    ParameterSchema::optional("delay", ExprKind::Duration, "pause between attempts"),
];

fn named(name: &str, value: Expr) -> NamedParam {
    NamedParam::named(name, value)
}

#[test]
fn accepts_valid_params() {
    let params = vec![
        named("attempts", Expr::Number("3".into())),
        named("delay", Expr::Duration("1s".into())),
    ];
    assert!(check_params("retry", PARAMS, &params).is_ok());
}

#[test]
fn optional_params_may_be_omitted() {
    let params = vec![named("attempts", Expr::Number("3".into()))];
    assert!(check_params("retry", PARAMS, &params).is_ok());
}

#[test]
fn missing_required_param() {
    let err = check_params("retry", PARAMS, &[]).unwrap_err();
    assert!(matches!(err, SchemaError::MissingParam { name, .. } if name == "attempts"));
}

#[test]
fn unknown_param_name() {
    let params = vec![
        named("attempts", Expr::Number("3".into())),
        named("backoff", Expr::Duration("1s".into())),
    ];
    let err = check_params("retry", PARAMS, &params).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownParam { name, .. } if name == "backoff"));
}

#[test]
fn wrong_type_is_rejected() {
    let params = vec![named("attempts", Expr::Str("three".into()))];
    let err = check_params("retry", PARAMS, &params).unwrap_err();
    assert!(matches!(err, SchemaError::WrongType { .. }));
}

#[test]
fn identifier_satisfies_any_type() {
    // Identifiers are variable references, resolved at execution time.
    let params = vec![named("attempts", Expr::Ident("N".into()))];
    assert!(check_params("retry", PARAMS, &params).is_ok());
}

#[test]
fn duplicate_param_is_rejected() {
    let params = vec![
        named("attempts", Expr::Number("3".into())),
        named("attempts", Expr::Number("5".into())),
    ];
    let err = check_params("retry", PARAMS, &params).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateParam { .. }));
}

#[test]
fn too_many_args() {
    let params = vec![
        named("attempts", Expr::Number("3".into())),
        named("delay", Expr::Duration("1s".into())),
        named("extra", Expr::Number("1".into())),
    ];
    let err = check_params("retry", PARAMS, &params).unwrap_err();
    assert!(matches!(err, SchemaError::TooManyArgs { max: 2, got: 3, .. }));
}

// ---------------------------------------------------------------------------
// Pattern schemas
// ---------------------------------------------------------------------------

static TRY_LIKE: PatternSchema = PatternSchema {
    allowed: &["main", "catch", "finally"],
    required: &["main"],
    require_one_of: &["catch", "finally"],
    allows_wildcard: false,
    any_identifier: false,
    description: "test schema",
};

fn br(name: &str) -> PatternBranch {
    PatternBranch {
        pattern: if name == "default" {
            Pattern::Wildcard
        } else {
            Pattern::Identifier(name.to_string())
        },
        commands: vec![],
        span: Span::default(),
    }
}

#[test]
fn pattern_schema_accepts_allowed_branches() {
    assert!(check_patterns("try", &TRY_LIKE, &[br("main"), br("catch")]).is_ok());
    assert!(check_patterns("try", &TRY_LIKE, &[br("main"), br("finally")]).is_ok());
}

#[test]
fn pattern_schema_rejects_disallowed_branch() {
    let err = check_patterns("try", &TRY_LIKE, &[br("main"), br("cleanup")]).unwrap_err();
    assert!(matches!(err, SchemaError::DisallowedPattern { .. }));
}

#[test]
fn pattern_schema_rejects_wildcard_when_disallowed() {
    let err = check_patterns("try", &TRY_LIKE, &[br("main"), br("default")]).unwrap_err();
    assert!(matches!(err, SchemaError::DisallowedPattern { pattern, .. } if pattern == "default"));
}

#[test]
fn pattern_schema_enforces_required() {
    let err = check_patterns("try", &TRY_LIKE, &[br("catch")]).unwrap_err();
    assert!(matches!(err, SchemaError::MissingPattern { pattern, .. } if pattern == "main"));
}

#[test]
fn pattern_schema_enforces_one_of() {
    let err = check_patterns("try", &TRY_LIKE, &[br("main")]).unwrap_err();
    assert!(matches!(err, SchemaError::Invalid { .. }));
}

#[test]
fn pattern_schema_rejects_duplicates() {
    let err = check_patterns("try", &TRY_LIKE, &[br("main"), br("main"), br("catch")]).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicatePattern { .. }));
}
