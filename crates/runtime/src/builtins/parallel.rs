// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@parallel` — run each nested item concurrently.
//!
//! Every top-level item gets an isolated child context, so branches that
//! change working directories or variables never observe each other. All
//! branches run to completion; any failure fails the whole block and all
//! failures are reported.

use async_trait::async_trait;
use devcmd_core::ast::{CommandContent, NamedParam};

use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_content;
use crate::plan::{self, PlanNode};
use crate::schema::ParameterSchema;

pub struct Parallel;

impl Decorator for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn description(&self) -> &'static str {
        "Run each nested item concurrently and wait for all of them"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        &[]
    }
}

#[async_trait]
impl BlockDecorator for Parallel {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        _params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let mut handles = Vec::with_capacity(content.len());
        for item in content {
            let child = ctx.child();
            let item = item.clone();
            handles.push(tokio::spawn(async move { child.run_content(&item).await }));
        }

        let mut failures = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e.to_string()),
                Err(join) => failures.push(format!("branch panicked: {join}")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExecError::Parallel {
                count: failures.len(),
                summary: failures.join("; "),
            })
        }
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        _params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let mut spawns = Vec::new();
        for item in content {
            let mut child = ctx.child();
            let branch = emit_content(&mut child, item)?;
            ctx.absorb(child);
            spawns.push(format!(
                "__handles.push(scope.spawn(|| -> Result<(), CmdError> {{\n{}\n    Ok(())\n}}));",
                crate::codegen::indent(&branch, 1),
            ));
        }

        let results = ctx.fresh_tmp("results");
        let failed = ctx.fresh_tmp("failed");

        Ok(format!(
            "{{\n    let {results}: Vec<Result<(), CmdError>> = std::thread::scope(|scope| {{\n        let mut __handles = Vec::new();\n{}\n        __handles\n            .into_iter()\n            .map(|h| {{\n                h.join().unwrap_or_else(|_| {{\n                    Err(CmdError {{\n                        code: 1,\n                        message: \"parallel branch panicked\".to_string(),\n                    }})\n                }})\n            }})\n            .collect()\n    }});\n    let {failed}: Vec<String> = {results}\n        .into_iter()\n        .filter_map(|r| r.err())\n        .map(|e| e.message)\n        .collect();\n    if !{failed}.is_empty() {{\n        return Err(CmdError {{\n            code: 1,\n            message: format!(\"{{}} parallel branch(es) failed: {{}}\", {failed}.len(), {failed}.join(\"; \")),\n        }});\n    }}\n}}",
            crate::codegen::indent(&crate::codegen::join_statements(spawns), 2),
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        _params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let mut node = PlanNode::decorator("parallel")
            .with_type("block")
            .with_description(format!("Run {} item(s) concurrently", content.len()))
            .concurrent();
        for item in content {
            node = node.add_child(plan::plan_content(&ctx.child(), item)?);
        }
        Ok(node)
    }
}
