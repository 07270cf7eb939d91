// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@confirm(message?, defaultYes?, abortOnNo?, caseSensitive?, ci?)` —
//! prompt before running nested content.
//!
//! In CI environments (detected via the usual indicator variables) the
//! prompt auto-confirms when `ci` is true. On "no", the block either
//! aborts with an error or silently skips, per `abortOnNo`.

use async_trait::async_trait;
use devcmd_core::ast::{bool_param, string_param, CommandContent, NamedParam};
use devcmd_core::value::ExprKind;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::codegen::rust_string_literal;
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::contract::{BlockDecorator, Decorator};
use crate::error::ExecError;
use crate::generate::emit_body;
use crate::plan::{self, PlanNode};
use crate::schema::ParameterSchema;

pub struct Confirm;

const DEFAULT_MESSAGE: &str = "Do you want to continue?";

const SCHEMA: &[ParameterSchema] = &[
    ParameterSchema::optional("message", ExprKind::String, "Prompt shown to the user"),
    ParameterSchema::optional(
        "defaultYes",
        ExprKind::Boolean,
        "Treat an empty response as yes",
    ),
    ParameterSchema::optional(
        "abortOnNo",
        ExprKind::Boolean,
        "Abort with an error when the user declines (otherwise skip)",
    ),
    ParameterSchema::optional(
        "caseSensitive",
        ExprKind::Boolean,
        "Match y/yes case-sensitively",
    ),
    ParameterSchema::optional(
        "ci",
        ExprKind::Boolean,
        "Auto-confirm when a CI environment is detected",
    ),
];

/// Environment variables that indicate a CI environment.
const CI_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "TRAVIS",
    "CIRCLECI",
    "JENKINS_URL",
    "GITLAB_CI",
    "BUILDKITE",
    "BUILD_NUMBER",
];

/// True when any CI indicator variable is set and non-empty.
pub fn is_ci() -> bool {
    CI_VARS
        .iter()
        .any(|v| std::env::var(v).map(|val| !val.is_empty()).unwrap_or(false))
}

struct ConfirmArgs {
    message: String,
    default_yes: bool,
    abort_on_no: bool,
    case_sensitive: bool,
    skip_in_ci: bool,
}

fn confirm_args(params: &[NamedParam]) -> ConfirmArgs {
    ConfirmArgs {
        message: string_param(params, "message", DEFAULT_MESSAGE),
        default_yes: bool_param(params, "defaultYes", false),
        abort_on_no: bool_param(params, "abortOnNo", true),
        case_sensitive: bool_param(params, "caseSensitive", false),
        skip_in_ci: bool_param(params, "ci", true),
    }
}

fn prompt_suffix(default_yes: bool) -> &'static str {
    if default_yes {
        " [Y/n]: "
    } else {
        " [y/N]: "
    }
}

fn response_confirms(response: &str, args: &ConfirmArgs) -> bool {
    if response.is_empty() {
        return args.default_yes;
    }
    if args.case_sensitive {
        matches!(response, "y" | "Y" | "yes" | "Yes")
    } else {
        let lower = response.to_lowercase();
        lower == "y" || lower == "yes"
    }
}

impl Decorator for Confirm {
    fn name(&self) -> &'static str {
        "confirm"
    }

    fn description(&self) -> &'static str {
        "Prompt the user for confirmation before running nested content"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

#[async_trait]
impl BlockDecorator for Confirm {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError> {
        let args = confirm_args(params);

        if args.skip_in_ci && is_ci() {
            println!("CI environment detected - auto-confirming: {}", args.message);
            return ctx.child().run_body(content).await;
        }

        print!("{}{}", args.message, prompt_suffix(args.default_yes));
        use std::io::Write as _;
        std::io::stdout()
            .flush()
            .map_err(|e| ExecError::Prompt(e.to_string()))?;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let read = reader.read_line(&mut line);
        match ctx.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, read).await {
                Ok(result) => result.map_err(|e| ExecError::Prompt(e.to_string()))?,
                Err(_) => return Err(ExecError::DeadlineExceeded),
            },
            None => read.await.map_err(|e| ExecError::Prompt(e.to_string()))?,
        };

        if response_confirms(line.trim(), &args) {
            ctx.child().run_body(content).await
        } else if args.abort_on_no {
            Err(ExecError::UserDeclined)
        } else {
            Ok(())
        }
    }

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError> {
        let args = confirm_args(params);
        let mut child = ctx.child();
        let body = emit_body(&mut child, content)?;
        let ok_var = child.fresh_tmp("confirmed");
        let input_var = child.fresh_tmp("input");
        ctx.absorb(child);

        let prompt = format!("{}{}", args.message, prompt_suffix(args.default_yes));
        let compare = if args.case_sensitive {
            format!("matches!({input_var}.trim(), \"y\" | \"Y\" | \"yes\" | \"Yes\")")
        } else {
            format!(
                "{input_var}.trim().eq_ignore_ascii_case(\"y\") || {input_var}.trim().eq_ignore_ascii_case(\"yes\")"
            )
        };
        let empty_case = if args.default_yes { "true" } else { "false" };

        let ci_check = if args.skip_in_ci {
            let vars = CI_VARS
                .iter()
                .map(|v| rust_string_literal(v))
                .collect::<Vec<_>>()
                .join(", ");
            // The message goes through `"{}"` so user text can never be
            // misread as a format string.
            let ci_msg = rust_string_literal(&format!(
                "CI environment detected - auto-confirming: {}",
                args.message
            ));
            format!(
                "if [{vars}]\n        .iter()\n        .any(|v| std::env::var(v).map(|x| !x.is_empty()).unwrap_or(false))\n    {{\n        println!(\"{{}}\", {ci_msg});\n        true\n    }} else "
            )
        } else {
            String::new()
        };

        let decline = if args.abort_on_no {
            "return Err(CmdError {\n        code: 1,\n        message: \"user cancelled execution\".to_string(),\n    });"
        } else {
            "// user declined, skipping"
        };

        Ok(format!(
            "{{\n    let {ok_var} = {ci_check}{{\n        print!(\"{{}}\", {prompt_lit});\n        let _ = std::io::Write::flush(&mut std::io::stdout());\n        let mut {input_var} = String::new();\n        std::io::stdin().read_line(&mut {input_var}).map_err(|e| CmdError {{\n            code: 1,\n            message: format!(\"failed to read user input: {{e}}\"),\n        }})?;\n        if {input_var}.trim().is_empty() {{\n            {empty_case}\n        }} else {{\n            {compare}\n        }}\n    }};\n    if {ok_var} {{\n{body}\n    }} else {{\n        {decline}\n    }}\n}}",
            prompt_lit = rust_string_literal(&prompt),
            body = crate::codegen::indent(&body, 2),
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError> {
        let args = confirm_args(params);

        let description = if args.skip_in_ci && is_ci() {
            format!("CI environment detected - auto-confirming: {}", args.message)
        } else {
            let behavior = if args.abort_on_no {
                "execution will abort if user declines"
            } else {
                "execution will skip if user declines"
            };
            format!(
                "User prompt: {}{} ({behavior})",
                args.message,
                prompt_suffix(args.default_yes).trim_end_matches(": ")
            )
        };

        let mut node = PlanNode::decorator("confirm")
            .with_type("block")
            .with_param("message", &args.message)
            .with_description(description);
        if args.default_yes {
            node = node.with_param("defaultYes", "true");
        }
        if !args.abort_on_no {
            node = node.with_param("abortOnNo", "false");
        }
        if args.case_sensitive {
            node = node.with_param("caseSensitive", "true");
        }
        if !args.skip_in_ci {
            node = node.with_param("ci", "false");
        }
        for item in content {
            node = node.add_child(plan::plan_content(ctx, item)?);
        }
        Ok(node)
    }
}

#[cfg(test)]
#[path = "confirm_tests.rs"]
mod tests;
