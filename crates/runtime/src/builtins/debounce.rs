// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@debounce(duration)` — coalesce rapid re-entries of nested content.
//!
//! Useful inside watch loops: a re-entry within the window is skipped so
//! a burst of triggers runs the content once. Sites are keyed by their
//! source span within the owning command.

use async_trait::async_trait;
use devcmd_core::ast::{param, CommandContent, NamedParam};
use devcmd_core::value::ExprKind;
use tokio::time::Instant;

use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::{ImportRequirements, ParameterSchema};

pub struct Debounce;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "duration",
    ExprKind::Duration,
    "Window within which re-entries are coalesced",
)];

impl Decorator for Debounce {
    fn name(&self) -> &'static str {
        "debounce"
    }

    fn description(&self) -> &'static str {
        "Coalesce rapid re-entries of the nested content within a window"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }

    fn import_requirements(&self) -> ImportRequirements {
        ImportRequirements {
            uses: &["std::time::Duration", "std::time::Instant"],
            crates: &[],
            registry_module: false,
        }
    }
}

fn window_arg(
    resolve: impl Fn(&devcmd_core::value::Expr) -> Result<devcmd_core::value::Expr, ExecError>,
    params: &[NamedParam],
) -> Result<(std::time::Duration, String), ExecError> {
    let expr = param(params, "duration").ok_or_else(|| {
        ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "debounce".to_string(),
            name: "duration".to_string(),
        })
    })?;
    let resolved = resolve(expr)?;
    Ok((resolved.as_duration()?, resolved.as_shell_text()))
}

/// Stable key for one debounce site.
fn site_key(ctx: &InterpreterContext, content: &[CommandContent]) -> String {
    let span = content
        .first()
        .map(|c| match c {
            CommandContent::Shell(s) => s.span,
            CommandContent::Block(b) => b.span,
            CommandContent::Pattern(p) => p.span,
        })
        .unwrap_or_default();
    format!("{}:{}", ctx.cmd_stack.join(">"), span.start)
}

#[async_trait]
impl BlockDecorator for Debounce {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let (window, _) = window_arg(|e| ctx.resolve(e), params)?;
        let key = site_key(ctx, content);

        {
            let mut sites = ctx.shared.debounce.lock();
            let now = Instant::now();
            if let Some(last) = sites.get(&key) {
                if now.duration_since(*last) < window {
                    tracing::debug!(site = %key, "debounced");
                    return Ok(());
                }
            }
            sites.insert(key, now);
        }

        ctx.child().run_body(content).await
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let (window, _) = window_arg(|e| ctx.resolve(e), params)?;
        let mut child = ctx.child();
        let body = emit_body(&mut child, content)?;
        let guard = child.fresh_tmp("debounce");
        let run_flag = child.fresh_tmp("run");
        ctx.absorb(child);
        let static_name = guard.to_uppercase();

        Ok(format!(
            "{{\n    static {static_name}: std::sync::Mutex<Option<Instant>> = std::sync::Mutex::new(None);\n    let {run_flag} = match {static_name}.lock() {{\n        Ok(mut last) => match *last {{\n            Some(t) if t.elapsed() < Duration::from_millis({millis}) => false,\n            _ => {{\n                *last = Some(Instant::now());\n                true\n            }}\n        }},\n        Err(_) => true,\n    }};\n    if {run_flag} {{\n{}\n    }}\n}}",
            crate::codegen::indent(&body, 2),
            millis = window.as_millis(),
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let (_, raw) = window_arg(|e| ctx.resolve(e), params)?;
        let mut node = PlanNode::decorator("debounce")
            .with_type("block")
            .with_param("duration", &raw)
            .with_description(format!("Coalesce re-entries within {raw}"));
        for item in content {
            node = node.add_child(plan::plan_content(ctx, item)?);
        }
        Ok(node)
    }
}
