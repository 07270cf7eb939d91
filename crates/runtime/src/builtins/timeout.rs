// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@timeout(duration)` — apply a wall-clock deadline to nested content.
//!
//! The deadline is the sooner of this decorator's duration and any
//! enclosing deadline, so `timeout(d) { retry(n) { … } }` can never run
//! longer than `d`. Expiry cancels the nested wait and surfaces a timeout
//! error.

use async_trait::async_trait;
use devcmd_core::ast::{param, CommandContent, NamedParam};
use devcmd_core::value::ExprKind;
use std::time::Duration;
use tokio::time::Instant;

use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::{ImportRequirements, ParameterSchema};

pub struct Timeout;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "duration",
    ExprKind::Duration,
    "Wall-clock deadline for the nested content",
)];

impl Decorator for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn description(&self) -> &'static str {
        "Cancel the nested content when a wall-clock deadline expires"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }

    fn import_requirements(&self) -> ImportRequirements {
        ImportRequirements {
            uses: &["std::time::Duration"],
            crates: &[],
            registry_module: false,
        }
    }
}

fn duration_arg(
    resolve: impl Fn(&devcmd_core::value::Expr) -> Result<devcmd_core::value::Expr, ExecError>,
    params: &[NamedParam],
) -> Result<(Duration, String), ExecError> {
    let expr = param(params, "duration").ok_or_else(|| {
        ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "timeout".to_string(),
            name: "duration".to_string(),
        })
    })?;
    let resolved = resolve(expr)?;
    Ok((resolved.as_duration()?, resolved.as_shell_text()))
}

#[async_trait]
impl BlockDecorator for Timeout {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let (duration, _) = duration_arg(|e| ctx.resolve(e), params)?;
        let child = ctx.with_deadline(Instant::now() + duration);
        match child.run_body(content).await {
            Err(e) if e.is_timeout() => Err(ExecError::Timeout(duration)),
            other => other,
        }
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let (duration, raw) = duration_arg(|e| ctx.resolve(e), params)?;
        let mut child = ctx.child();
        let body = emit_body(&mut child, content)?;

        let cwd_snapshot = child.fresh_tmp("cwd");
        let tx = child.fresh_tmp("tx");
        let rx = child.fresh_tmp("rx");
        let cwd_var = child.cwd_var.clone();
        ctx.absorb(child);

        // Run the nested content on a helper thread and bound the wait;
        // the helper cannot be interrupted mid-command but the command
        // fails with a timeout error as soon as the deadline passes.
        Ok(format!(
            "{{\n    let {cwd_snapshot} = {cwd_var}.clone();\n    let ({tx}, {rx}) = std::sync::mpsc::channel();\n    std::thread::spawn(move || {{\n        let {cwd_var} = {cwd_snapshot};\n        let __result: Result<(), CmdError> = (|| {{\n{}\n            Ok(())\n        }})();\n        let _ = {tx}.send(__result);\n    }});\n    match {rx}.recv_timeout(Duration::from_millis({millis})) {{\n        Ok(result) => result?,\n        Err(_) => {{\n            return Err(CmdError {{\n                code: 1,\n                message: \"timed out after {raw}\".to_string(),\n            }});\n        }}\n    }}\n}}",
            crate::codegen::indent(&body, 3),
            millis = duration.as_millis(),
            raw = raw,
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let (_, raw) = duration_arg(|e| ctx.resolve(e), params)?;
        let mut node = PlanNode::decorator("timeout")
            .with_type("block")
            .with_param("duration", &raw)
            .with_description(format!("Cancel nested content after {raw}"));
        for item in content {
            node = node.add_child(plan::plan_content(ctx, item)?);
        }
        Ok(node)
    }
}
