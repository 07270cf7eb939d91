// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@when(value) { pat: …; default: … }` — select one branch by value.
//!
//! The value (a variable reference) is evaluated to a string; the branch
//! whose identifier equals it runs. With no match, `default` runs if
//! present, otherwise the block fails.

use async_trait::async_trait;
use devcmd_core::ast::{param, NamedParam, Pattern, PatternBranch};
use devcmd_core::value::ExprKind;

use crate::codegen::{indent, join_statements, rust_string_literal};
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{Decorator, PatternDecorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::{ParameterSchema, PatternSchema};

pub struct When;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "value",
    ExprKind::Identifier,
    "Variable whose value selects the branch",
)];

static PATTERNS: PatternSchema = PatternSchema {
    allowed: &[],
    required: &[],
    require_one_of: &[],
    allows_wildcard: true,
    any_identifier: true,
    description: "Any identifier, plus an optional 'default' wildcard",
};

impl Decorator for When {
    fn name(&self) -> &'static str {
        "when"
    }

    fn description(&self) -> &'static str {
        "Run the branch whose name matches the evaluated value"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

fn value_arg(
    resolve: impl Fn(&devcmd_core::value::Expr) -> Result<devcmd_core::value::Expr, ExecError>,
    params: &[NamedParam],
) -> Result<String, ExecError> {
    let expr = param(params, "value").ok_or_else(|| {
        ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "when".to_string(),
            name: "value".to_string(),
        })
    })?;
    Ok(resolve(expr)?.as_shell_text())
}

#[async_trait]
impl PatternDecorator for When {
    fn pattern_schema(&self) -> &'static PatternSchema {
        &PATTERNS
    }

    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<(), ExecError> {
        let value = value_arg(|e| ctx.resolve(e), params)?;

        let selected = branches
            .iter()
            .find(|b| matches!(&b.pattern, Pattern::Identifier(name) if *name == value))
            .or_else(|| {
                branches
                    .iter()
                    .find(|b| matches!(b.pattern, Pattern::Wildcard))
            });

        match selected {
            Some(branch) => ctx.child().run_body(&branch.commands).await,
            None => Err(ExecError::NoBranchMatched { value }),
        }
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<String, ExecError> {
        let value = value_arg(|e| ctx.resolve(e), params)?;

        let mut arms = Vec::new();
        let mut has_default = false;
        for branch in branches {
            let mut child = ctx.child();
            let body = emit_body(&mut child, &branch.commands)?;
            ctx.absorb(child);
            match &branch.pattern {
                Pattern::Identifier(name) => arms.push(format!(
                    "{} => {{\n{}\n}}",
                    rust_string_literal(name),
                    indent(&body, 1),
                )),
                Pattern::Wildcard => {
                    has_default = true;
                    arms.push(format!("_ => {{\n{}\n}}", indent(&body, 1)));
                }
            }
        }
        if !has_default {
            arms.push(
                "other => {\n    return Err(CmdError {\n        code: 1,\n        message: format!(\"no branch matched value '{other}'\"),\n    });\n}"
                    .to_string(),
            );
        }

        Ok(format!(
            "match {} {{\n{}\n}}",
            rust_string_literal(&value),
            indent(&join_statements(arms), 1),
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<PlanNode, ExecError> {
        let value = value_arg(|e| ctx.resolve(e), params)?;
        let mut node = PlanNode::decorator("when")
            .with_type("pattern")
            .with_param("value", &value)
            .with_description(format!(
                "Select one of {} branch(es) by value",
                branches.len()
            ));

        for branch in branches {
            let mut branch_node = PlanNode::decorator(format!("[{}]", branch.pattern.name()))
                .with_type("branch")
                .with_description(if matches!(branch.pattern, Pattern::Wildcard) {
                    "Runs when no other branch matches".to_string()
                } else {
                    format!("Runs when value is '{}'", branch.pattern.name())
                });
            for cmd in &branch.commands {
                branch_node = branch_node.add_child(plan::plan_content(ctx, cmd)?);
            }
            node = node.add_child(branch_node);
        }
        Ok(node)
    }
}
