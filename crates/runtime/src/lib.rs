// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! devcmd-runtime: decorator model and tri-modal execution engines.
//!
//! One parsed [`Program`](devcmd_core::Program) can be driven three ways:
//!
//! - **interpret** — [`Interpreter`] runs it now, spawning `sh -c`
//!   processes and managing background watch processes;
//! - **generate** — [`generate`](generate::generate) emits a standalone
//!   Rust CLI source tree with equivalent behavior;
//! - **plan** — [`plan_command`](plan::plan_command) produces a dry-run
//!   tree of what would execute.
//!
//! Decorators participate in all three modes through the registry: the
//! parser classifies `@name` references and validates arguments, and each
//! engine dispatches the mode-appropriate method.

pub mod builtins;
pub mod codegen;
#[cfg(test)]
pub(crate) mod test_support;
pub mod context;
pub mod contract;
pub mod error;
pub mod generate;
pub mod interp;
pub mod plan;
pub mod process;
pub mod registry;
pub mod schema;

pub use context::{GeneratorContext, InterpreterContext, PlanContext};
pub use contract::{ActionDecorator, BlockDecorator, Decorator, PatternDecorator, ValueDecorator};
pub use error::ExecError;
pub use generate::{generate, GeneratedFile, GeneratedTree};
pub use interp::Interpreter;
pub use plan::{plan_command, PlanKind, PlanNode};
pub use process::{ProcessEntry, ProcessRegistry, ProcessStatus, RegistryError};
pub use registry::{global as registry_global, DecoratorKind, Registry};
pub use schema::{ImportRequirements, ParameterSchema, PatternSchema, SchemaError};
