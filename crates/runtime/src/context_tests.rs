// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ExecError;
use crate::schema::ImportRequirements;
use devcmd_core::ast::{Program, VarDecl};
use devcmd_core::span::Span;
use devcmd_core::value::Expr;
use std::collections::HashMap;
use std::sync::Arc;

fn test_program() -> Arc<Program> {
    Arc::new(Program {
        variables: vec![VarDecl {
            name: "SRC".into(),
            value: Expr::Str("./src".into()),
            span: Span::default(),
        }],
        var_groups: vec![],
        commands: vec![],
    })
}

#[test]
fn resolve_expr_follows_identifiers() {
    let mut vars = HashMap::new();
    vars.insert("T".to_string(), Expr::Duration("5s".into()));

    let resolved = resolve_expr(&vars, &Expr::Ident("T".into())).unwrap();
    assert_eq!(resolved, Expr::Duration("5s".into()));

    let literal = resolve_expr(&vars, &Expr::Number("3".into())).unwrap();
    assert_eq!(literal, Expr::Number("3".into()));

    let err = resolve_expr(&vars, &Expr::Ident("MISSING".into())).unwrap_err();
    assert!(matches!(err, ExecError::UnknownVariable { name } if name == "MISSING"));
}

#[test]
fn generator_child_counters_partition_names() {
    let mut parent = GeneratorContext::new(test_program());
    let first = parent.fresh_tmp("out");
    assert_eq!(first, "__out_0");

    let mut child_a = parent.child();
    let mut child_b = parent.child();

    let a = child_a.fresh_tmp("out");
    let b = child_b.fresh_tmp("out");
    let p = parent.fresh_tmp("out");

    assert_eq!(a, "__out_1001");
    assert_eq!(b, "__out_2001");
    assert_eq!(p, "__out_1");
    // Names from different scopes never collide.
    assert_ne!(a, b);
    assert_ne!(a, p);
}

#[test]
fn generator_absorb_merges_imports() {
    let mut parent = GeneratorContext::new(test_program());
    let mut child = parent.child();
    child.require(&ImportRequirements {
        uses: &["std::time::Duration"],
        crates: &[("serde", "1.0")],
        registry_module: true,
    });
    parent.absorb(child);

    assert_eq!(
        parent.imports().collect::<Vec<_>>(),
        vec!["std::time::Duration"]
    );
    assert_eq!(parent.crates().collect::<Vec<_>>(), vec![("serde", "1.0")]);
    assert!(parent.needs_registry());
}

#[test]
fn generator_variables_resolve_from_program() {
    let ctx = GeneratorContext::new(test_program());
    let resolved = ctx.resolve(&Expr::Ident("SRC".into())).unwrap();
    assert_eq!(resolved, Expr::Str("./src".into()));
}

#[test]
fn plan_context_children_are_value_copies() {
    let ctx = PlanContext::new(test_program(), "/tmp".into());
    let mut child = ctx.child();
    child.workdir = "/tmp/sub".into();
    child.cmd_stack.push("build".into());

    assert_eq!(ctx.workdir, std::path::PathBuf::from("/tmp"));
    assert!(ctx.cmd_stack.is_empty());
}
