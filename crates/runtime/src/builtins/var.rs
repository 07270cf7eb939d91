// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `@var(NAME)` — substitute a declared variable into shell text.

use devcmd_core::ast::NamedParam;
use devcmd_core::value::ExprKind;

use crate::codegen::GenValue;
use crate::context::{GeneratorContext, InterpreterContext};
use crate::contract::{Decorator, ValueDecorator};
use crate::error::ExecError;
use crate::schema::ParameterSchema;

pub struct Var;

const SCHEMA: &[ParameterSchema] = &[ParameterSchema::required(
    "name",
    ExprKind::Identifier,
    "Name of the variable to substitute",
)];

impl Decorator for Var {
    fn name(&self) -> &'static str {
        "var"
    }

    fn description(&self) -> &'static str {
        "Substitute a declared variable into the command line"
    }

    fn parameter_schema(&self) -> &'static [ParameterSchema] {
        SCHEMA
    }
}

fn var_name(params: &[NamedParam]) -> Result<&str, ExecError> {
    match devcmd_core::ast::param(params, "name") {
        Some(devcmd_core::value::Expr::Ident(name)) => Ok(name),
        _ => Err(ExecError::Schema(crate::schema::SchemaError::MissingParam {
            decorator: "var".to_string(),
            name: "name".to_string(),
        })),
    }
}

impl ValueDecorator for Var {
    fn expand_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError> {
        ctx.var_text(var_name(params)?)
    }

    fn expand_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<GenValue, ExecError> {
        // Variables are immutable literals, so they inline at generation
        // time.
        let name = var_name(params)?;
        let value = ctx
            .variables
            .get(name)
            .ok_or_else(|| ExecError::UnknownVariable {
                name: name.to_string(),
            })?;
        Ok(GenValue::Static(value.as_shell_text()))
    }
}
