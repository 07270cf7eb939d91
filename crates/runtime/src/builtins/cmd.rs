// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@cmd("name")` — execute or reference another top-level command.
//!
//! Inline, `@cmd` expands to the referenced command's composed line so it
//! can chain with shell operators; standalone it runs the referenced
//! body directly, which also supports non-simple bodies. Both paths keep
//! a per-execution-path stack of command names so self-reference raises a
//! cycle error instead of recursing forever.

use async_trait::async_trait;
use devcmd_core::ast::{param, CommandContent, CommandKind, NamedParam};
use devcmd_core::value::{Expr, ExprKind};

use crate::codegen::{sanitize_fn_name, GenValue};
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{ActionDecorator, Decorator};
use crate::error::ExecError;
use crate::plan::{self, PlanNode};
use crate::schema::ParameterSchema;

pub struct Cmd;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "name",
    ExprKind::String,
    "Name of the command to run",
)];

impl Decorator for Cmd {
    fn name(&self) -> &'static str {
        "cmd"
    }

    fn description(&self) -> &'static str {
        "Run another command from this file"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

fn target_name(params: &[NamedParam]) -> Result<String, ExecError> {
    match param(params, "name") {
        Some(Expr::Str(name)) => Ok(name.clone()),
        Some(Expr::Ident(name)) => Ok(name.clone()),
        _ => Err(ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "cmd".to_string(),
            name: "name".to_string(),
        })),
    }
}

fn check_cycle(stack: &[String], name: &str) -> Result<(), ExecError> {
    if stack.iter().any(|n| n == name) {
        Err(ExecError::CommandCycle {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

#[async_trait]
impl ActionDecorator for Cmd {
    fn expand_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError> {
        let name = target_name(params)?;
        check_cycle(&ctx.cmd_stack, &name)?;
        let decl = ctx
            .program
            .command(&name, CommandKind::Regular)
            .ok_or_else(|| ExecError::UnknownCommand { name: name.clone() })?;

        if !decl.body.is_simple() {
            return Err(ExecError::CannotInline { name });
        }
        let CommandContent::Shell(shell) = &decl.body.content[0] else {
            return Err(ExecError::CannotInline { name });
        };

        let mut child = ctx.child();
        child.cmd_stack.push(name);
        child.compose_shell(shell)
    }

    async fn invoke_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<(), ExecError> {
        let name = target_name(params)?;
        check_cycle(&ctx.cmd_stack, &name)?;
        let decl = ctx
            .program
            .command(&name, CommandKind::Regular)
            .ok_or_else(|| ExecError::UnknownCommand { name: name.clone() })?;

        let mut child = ctx.child();
        child.cmd_stack.push(name);
        child.run_body(&decl.body.content).await
    }

    fn expand_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<GenValue, ExecError> {
        let name = target_name(params)?;
        check_cycle(&ctx.cmd_stack, &name)?;
        let program = std::sync::Arc::clone(&ctx.program);
        let decl = program
            .command(&name, CommandKind::Regular)
            .ok_or_else(|| ExecError::UnknownCommand { name: name.clone() })?;

        if !decl.body.is_simple() {
            return Err(ExecError::CannotInline { name });
        }
        let CommandContent::Shell(shell) = &decl.body.content[0] else {
            return Err(ExecError::CannotInline { name });
        };

        ctx.cmd_stack.push(name);
        let expr = crate::generate::compose_shell_expr(ctx, shell)?;
        ctx.cmd_stack.pop();
        Ok(GenValue::Expr(expr))
    }

    fn invoke_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError> {
        let name = target_name(params)?;
        check_cycle(&ctx.cmd_stack, &name)?;
        if ctx.program.command(&name, CommandKind::Regular).is_none() {
            return Err(ExecError::UnknownCommand { name });
        }
        Ok(format!("{}(&[])?;", sanitize_fn_name(&name)))
    }

    fn invoke_plan(&self, ctx: &PlanContext, params: &[NamedParam]) -> Result<PlanNode, ExecError> {
        let name = target_name(params)?;
        check_cycle(&ctx.cmd_stack, &name)?;
        let subtree = plan::plan_command(ctx, &name)?;
        Ok(PlanNode::decorator("cmd")
            .with_type("action")
            .with_param("name", &name)
            .with_description(format!("Run command '{name}'"))
            .add_child(subtree))
    }
}
