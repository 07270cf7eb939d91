// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@retry(attempts, delay?)` — rerun nested content until it succeeds.
//!
//! Attempts are serial; the first success wins. A timeout from an
//! enclosing `@timeout` is honored immediately rather than burning the
//! remaining attempts.

use async_trait::async_trait;
use devcmd_core::ast::{param, CommandContent, NamedParam};
use devcmd_core::value::ExprKind;
use std::time::Duration;
use tracing::debug;

use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::{ImportRequirements, ParameterSchema};

pub struct Retry;

const SCHEMA: &[ParameterSchema] = &[
    ParameterSchema::required("attempts", ExprKind::Number, "Maximum number of attempts"),
    ParameterSchema::optional("delay", ExprKind::Duration, "Pause between attempts"),
];

impl Decorator for Retry {
    fn name(&self) -> &'static str {
        "retry"
    }

    fn description(&self) -> &'static str {
        "Rerun nested content until it succeeds, up to a fixed attempt count"
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

struct RetryArgs {
    attempts: u32,
    delay: Option<Duration>,
    delay_raw: Option<String>,
}

fn retry_args(
    resolve: impl Fn(&devcmd_core::value::Expr) -> Result<devcmd_core::value::Expr, ExecError>,
    params: &[NamedParam],
) -> Result<RetryArgs, ExecError> {
    let attempts = match param(params, "attempts") {
        Some(expr) => resolve(expr)?.as_integer()?.max(1),
        None => 1,
    };
    let delay_expr = param(params, "delay").map(&resolve).transpose()?;
    let delay = delay_expr.as_ref().map(|e| e.as_duration()).transpose()?;
    Ok(RetryArgs {
        attempts,
        delay,
        delay_raw: delay_expr.map(|e| e.as_shell_text()),
    })
}

#[async_trait]
impl BlockDecorator for Retry {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let args = retry_args(|e| ctx.resolve(e), params)?;

        let mut last = None;
        for attempt in 1..=args.attempts {
            match ctx.child().run_body(content).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_timeout() || matches!(e, ExecError::Cancelled) => return Err(e),
                Err(e) => {
                    debug!(attempt, attempts = args.attempts, error = %e, "attempt failed");
                    last = Some(e);
                }
            }
            if attempt < args.attempts {
                if let Some(delay) = args.delay {
                    ctx.sleep(delay).await?;
                }
            }
        }

        Err(ExecError::RetriesExhausted {
            attempts: args.attempts,
            last: Box::new(last.unwrap_or(ExecError::Cancelled)),
        })
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let args = retry_args(|e| ctx.resolve(e), params)?;
        let mut child = ctx.child();
        let body = emit_body(&mut child, content)?;
        let counter = child.fresh_tmp("attempt");
        ctx.absorb(child);

        let sleep_arm = match args.delay {
            Some(d) => format!(
                "Err(_) => std::thread::sleep(Duration::from_millis({})),",
                d.as_millis()
            ),
            None => "Err(_) => {}".to_string(),
        };

        Ok(format!(
            "{{\n    let mut {counter} = 0u32;\n    loop {{\n        {counter} += 1;\n        let __result: Result<(), CmdError> = (|| {{\n{}\n            Ok(())\n        }})();\n        match __result {{\n            Ok(()) => break,\n            Err(e) if {counter} >= {attempts} => return Err(e),\n            {sleep_arm}\n        }}\n    }}\n}}",
            crate::codegen::indent(&body, 3),
            attempts = args.attempts,
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let args = retry_args(|e| ctx.resolve(e), params)?;
        let mut node = PlanNode::decorator("retry")
            .with_type("block")
            .with_param("attempts", args.attempts.to_string());
        if let Some(raw) = &args.delay_raw {
            node = node.with_param("delay", raw);
        }
        node = node.with_description(format!(
            "Retry nested content up to {} times",
            args.attempts
        ));
        for item in content {
            node = node.add_child(plan::plan_content(ctx, item)?);
        }
        Ok(node)
    }
}
