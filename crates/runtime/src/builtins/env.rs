// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@env("KEY", default?)` — substitute a process environment variable.

use devcmd_core::ast::{param, NamedParam};
use devcmd_core::value::{Expr, ExprKind};

use crate::codegen::{rust_string_literal, GenValue};
use crate::context::{GeneratorContext, InterpreterContext};
use crate::contract::{Decorator, ValueDecorator};
use crate::error::ExecError;
use crate::schema::ParameterSchema;

pub struct Env;

const SCHEMA: &[ParameterSchema] = &[
    ParameterSchema::required("key", ExprKind::String, "Environment variable to read"),
    ParameterSchema::optional("default", ExprKind::String, "Value to use when unset"),
];

impl Decorator for Env {
    fn name(&self) -> &'static str {
        "env"
    }

    fn description(&self) -> &'static str {
        "Substitute an environment variable, with an optional default"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

fn resolve_str(
    resolve: impl Fn(&Expr) -> Result<Expr, ExecError>,
    expr: &Expr,
) -> Result<String, ExecError> {
    Ok(resolve(expr)?.as_shell_text())
}

impl ValueDecorator for Env {
    fn expand_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError> {
        let key = match param(params, "key") {
            Some(expr) => resolve_str(|e| ctx.resolve(e), expr)?,
            None => String::new(),
        };
        let default = param(params, "default")
            .map(|expr| resolve_str(|e| ctx.resolve(e), expr))
            .transpose()?;

        match std::env::var(&key) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => default.ok_or(ExecError::MissingEnv { key }),
        }
    }

    fn expand_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<GenValue, ExecError> {
        let key = match param(params, "key") {
            Some(expr) => resolve_str(|e| ctx.resolve(e), expr)?,
            None => String::new(),
        };
        let default = param(params, "default")
            .map(|expr| resolve_str(|e| ctx.resolve(e), expr))
            .transpose()?;

        let default_expr = match &default {
            Some(d) => format!("Some({})", rust_string_literal(d)),
            None => "None".to_string(),
        };
        Ok(GenValue::Expr(format!(
            "env_or({}, {})?",
            rust_string_literal(&key),
            default_expr
        )))
    }
}
