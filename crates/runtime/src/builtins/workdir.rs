// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@workdir(path)` — run nested content in a different working directory.
//!
//! The path resolves relative to the current context's working directory
//! and applies only to the derived child context, so sibling branches are
//! unaffected.

use async_trait::async_trait;
use devcmd_core::ast::{param, CommandContent, NamedParam};
use devcmd_core::value::ExprKind;

use crate::codegen::rust_string_literal;
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::ParameterSchema;

pub struct Workdir;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "path",
    ExprKind::String,
    "Directory the nested content runs in, relative to the current one",
)];

impl Decorator for Workdir {
    fn name(&self) -> &'static str {
        "workdir"
    }

    fn description(&self) -> &'static str {
        "Run nested content in a different working directory"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

fn path_arg(
    resolve: impl Fn(&devcmd_core::value::Expr) -> Result<devcmd_core::value::Expr, ExecError>,
    params: &[NamedParam],
) -> Result<String, ExecError> {
    let expr = param(params, "path").ok_or_else(|| {
        ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "workdir".to_string(),
            name: "path".to_string(),
        })
    })?;
    Ok(resolve(expr)?.as_shell_text())
}

#[async_trait]
impl BlockDecorator for Workdir {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let path = path_arg(|e| ctx.resolve(e), params)?;
        ctx.with_workdir(&path).run_body(content).await
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let path = path_arg(|e| ctx.resolve(e), params)?;

        let mut child = ctx.child();
        let wd_var = child.fresh_tmp("wd");
        let parent_cwd = child.cwd_var.clone();
        child.cwd_var = wd_var.clone();
        let body = emit_body(&mut child, content)?;
        ctx.absorb(child);

        Ok(format!(
            "{{\n    let {wd_var} = {parent_cwd}.join({});\n{}\n}}",
            rust_string_literal(&path),
            crate::codegen::indent(&body, 1),
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let path = path_arg(|e| ctx.resolve(e), params)?;
        let mut child = ctx.child();
        child.workdir = if std::path::Path::new(&path).is_absolute() {
            path.clone().into()
        } else {
            child.workdir.join(&path)
        };

        let mut node = PlanNode::decorator("workdir")
            .with_type("block")
            .with_param("path", &path)
            .with_description(format!("Run nested content in '{path}'"));
        for item in content {
            node = node.add_child(plan::plan_content(&child, item)?);
        }
        Ok(node)
    }
}
