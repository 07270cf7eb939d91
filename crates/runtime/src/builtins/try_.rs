// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@try { main: …; catch: …; finally: … }` — error handling branches.
//!
//! `main` always runs. `catch` runs only when `main` fails. `finally`
//! always runs, after whichever of the others ran. The surfaced error
//! precedence is main > catch > finally.

use async_trait::async_trait;
use devcmd_core::ast::{NamedParam, PatternBranch};

use crate::codegen::{indent, join_statements};
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{Decorator, PatternDecorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, branch_summary, PlanNode};
use crate::schema::{ParameterSchema, PatternSchema};

pub struct Try;

static PATTERNS: PatternSchema = PatternSchema {
    allowed: &["main", "catch", "finally"],
    required: &["main"],
    require_one_of: &["catch", "finally"],
    allows_wildcard: false,
    any_identifier: false,
    description: "Requires 'main', plus at least one of 'catch' and 'finally'",
};

impl Decorator for Try {
    fn name(&self) -> &'static str {
        "try"
    }

    fn description(&self) -> &'static str {
        "Run commands with try/catch/finally semantics"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        &[]
    }
}

fn branches_of<'a>(
    branches: &'a [PatternBranch],
) -> (
    Option<&'a PatternBranch>,
    Option<&'a PatternBranch>,
    Option<&'a PatternBranch>,
) {
    let find = |name: &str| branches.iter().find(|b| b.pattern.name() == name);
    (find("main"), find("catch"), find("finally"))
}

#[async_trait]
impl PatternDecorator for Try {
    fn pattern_schema(&self) -> &'static PatternSchema {
        &PATTERNS
    }

    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        _params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<(), ExecError> {
        let (main, catch, finally) = branches_of(branches);

        let main_err = match main {
            Some(branch) => ctx.child().run_body(&branch.commands).await.err(),
            None => None,
        };

        let catch_err = match (&main_err, catch) {
            (Some(_), Some(branch)) => ctx.child().run_body(&branch.commands).await.err(),
            _ => None,
        };

        let finally_err = match finally {
            Some(branch) => ctx.child().run_body(&branch.commands).await.err(),
            None => None,
        };

        match (main_err, catch_err, finally_err) {
            (Some(e), _, _) => Err(e),
            (None, Some(e), _) => Err(e),
            (None, None, Some(e)) => Err(e),
            (None, None, None) => Ok(()),
        }
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        _params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<String, ExecError> {
        let (main, catch, finally) = branches_of(branches);

        let main_var = ctx.fresh_tmp("main");
        let mut stmts = Vec::new();

        let main_body = match main {
            Some(branch) => {
                let mut child = ctx.child();
                let body = emit_body(&mut child, &branch.commands)?;
                ctx.absorb(child);
                body
            }
            None => String::new(),
        };
        stmts.push(format!(
            "let {main_var}: Result<(), CmdError> = (|| {{\n{}\n    Ok(())\n}})();",
            indent(&main_body, 1),
        ));

        let catch_var = match catch {
            Some(branch) => {
                let mut child = ctx.child();
                let body = emit_body(&mut child, &branch.commands)?;
                ctx.absorb(child);
                let var = ctx.fresh_tmp("catch");
                stmts.push(format!(
                    "let {var}: Result<(), CmdError> = if {main_var}.is_err() {{\n    (|| {{\n{}\n        Ok(())\n    }})()\n}} else {{\n    Ok(())\n}};",
                    indent(&body, 2),
                ));
                Some(var)
            }
            None => None,
        };

        let finally_var = match finally {
            Some(branch) => {
                let mut child = ctx.child();
                let body = emit_body(&mut child, &branch.commands)?;
                ctx.absorb(child);
                let var = ctx.fresh_tmp("finally");
                stmts.push(format!(
                    "let {var}: Result<(), CmdError> = (|| {{\n{}\n    Ok(())\n}})();",
                    indent(&body, 1),
                ));
                Some(var)
            }
            None => None,
        };

        // Surface errors with main > catch > finally precedence.
        stmts.push(format!("{main_var}?;"));
        if let Some(var) = catch_var {
            stmts.push(format!("{var}?;"));
        }
        if let Some(var) = finally_var {
            stmts.push(format!("{var}?;"));
        }

        Ok(format!(
            "{{\n{}\n}}",
            indent(&join_statements(stmts), 1)
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        _params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<PlanNode, ExecError> {
        let (main, catch, finally) = branches_of(branches);

        let mut parts = Vec::new();
        if let Some(b) = main {
            parts.push(branch_summary("main", &b.commands));
        }
        if let Some(b) = catch {
            parts.push(branch_summary("catch", &b.commands));
        }
        if let Some(b) = finally {
            parts.push(branch_summary("finally", &b.commands));
        }

        let mut node = PlanNode::decorator("try")
            .with_type("pattern")
            .with_description(format!("Error handling with {}", parts.join(", ")));

        // Main commands inline; catch under [on error]; finally under
        // [always].
        if let Some(branch) = main {
            for cmd in &branch.commands {
                node = node.add_child(plan::plan_content(ctx, cmd)?);
            }
        }
        if let Some(branch) = catch {
            let mut catch_node = PlanNode::decorator("[on error]")
                .with_type("conditional")
                .with_description("Executed only if main block fails");
            for cmd in &branch.commands {
                catch_node = catch_node.add_child(plan::plan_content(ctx, cmd)?);
            }
            node = node.add_child(catch_node);
        }
        if let Some(branch) = finally {
            let mut finally_node = PlanNode::decorator("[always]")
                .with_type("block")
                .with_description("Always executed regardless of success/failure");
            for cmd in &branch.commands {
                finally_node = finally_node.add_child(plan::plan_content(ctx, cmd)?);
            }
            node = node.add_child(finally_node);
        }
        Ok(node)
    }
}
