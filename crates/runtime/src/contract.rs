// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The decorator contract: one supertrait plus four category traits.
//!
//! Every decorator exposes metadata (name, description, parameter schema,
//! import requirements) and a parse-time `validate`. The category traits
//! add the tri-modal execution methods: each decorator knows how to run
//! now (interpreter), how to emit equivalent code (generator), and how to
//! describe itself (plan).

use async_trait::async_trait;
use devcmd_core::ast::{CommandContent, NamedParam, PatternBranch};

use crate::codegen::GenValue;
use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::error::ExecError;
use crate::plan::PlanNode;
use crate::schema::{self, ImportRequirements, ParameterSchema, PatternSchema, SchemaError};

/// Metadata and validation shared by every decorator.
pub trait Decorator: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn parameter_schema(&self) -> &'static [ParameterSchema];

    /// Dependencies the generator must include when emitting code that
    /// uses this decorator.
    fn import_requirements(&self) -> ImportRequirements {
        ImportRequirements::default()
    }

    /// Parse-time validation of bound parameters.
    fn validate(&self, params: &[NamedParam]) -> Result<(), SchemaError> {
        schema::check_params(self.name(), self.parameter_schema(), params)
    }
}

/// Decorators that provide values for shell interpolation (`@var`, `@env`).
///
/// Only legal inline inside shell text.
pub trait ValueDecorator: Decorator {
    /// Produce the runtime string substituted into the command line.
    fn expand_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError>;

    /// Produce the fragment contributed to the emitted command string.
    fn expand_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<GenValue, ExecError>;
}

/// Decorators that execute commands with structured results (`@cmd`).
///
/// May appear inline (chained with shell operators) or standalone as the
/// sole content of a shell line.
#[async_trait]
pub trait ActionDecorator: Decorator {
    /// Inline use: the command line fragment this action contributes.
    fn expand_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError>;

    /// Standalone use: run the action directly.
    async fn invoke_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
    ) -> Result<(), ExecError>;

    /// Inline use in generated code.
    fn expand_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<GenValue, ExecError>;

    /// Standalone use in generated code: emitted statement(s).
    fn invoke_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
    ) -> Result<String, ExecError>;

    /// Standalone use in a plan tree.
    fn invoke_plan(&self, ctx: &PlanContext, params: &[NamedParam]) -> Result<PlanNode, ExecError>;
}

/// Decorators that wrap nested content and control its execution
/// (`@parallel`, `@timeout`, `@retry`, `@workdir`, `@debounce`,
/// `@confirm`). Must be followed by braces.
#[async_trait]
pub trait BlockDecorator: Decorator {
    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<(), ExecError>;

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<String, ExecError>;

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        content: &[CommandContent],
    ) -> Result<PlanNode, ExecError>;
}

/// Decorators whose body is a set of named branches (`@when`, `@try`).
#[async_trait]
pub trait PatternDecorator: Decorator {
    /// Which branch identifiers are allowed and required.
    fn pattern_schema(&self) -> &'static PatternSchema;

    async fn execute_interp(
        &self,
        ctx: &InterpreterContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<(), ExecError>;

    fn execute_generate(
        &self,
        ctx: &mut GeneratorContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<String, ExecError>;

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParam],
        branches: &[PatternBranch],
    ) -> Result<PlanNode, ExecError>;
}
