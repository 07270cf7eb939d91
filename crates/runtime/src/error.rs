// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution error taxonomy.

use devcmd_core::value::ValueError;
use std::time::Duration;
use thiserror::Error;

use crate::process::RegistryError;
use crate::schema::SchemaError;

/// Errors raised while executing, planning, or generating a program.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown decorator @{name}")]
    UnknownDecorator { name: String },

    #[error("environment variable '{key}' is not set and no default was given")]
    MissingEnv { key: String },

    #[error("command exited with code {code}: {command}")]
    ShellExit { command: String, code: i32 },

    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// An enclosing deadline expired mid-wait. `@timeout` rewraps this
    /// into [`ExecError::Timeout`] with its configured duration.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("background process '{name}' is already running")]
    AlreadyRunning { name: String },

    #[error("watch command bodies must be plain shell content, found @{decorator}")]
    WatchBodyNotShell { decorator: String },

    #[error("all {attempts} attempts failed, last error: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ExecError>,
    },

    #[error("execution cancelled")]
    Cancelled,

    #[error("user declined confirmation")]
    UserDeclined,

    #[error("command cycle detected: @cmd({name}) is already executing")]
    CommandCycle { name: String },

    #[error("@cmd({name}) references a command with a non-simple body and cannot be chained inline")]
    CannotInline { name: String },

    #[error("@when matched no branch and no default was given (value: '{value}')")]
    NoBranchMatched { value: String },

    #[error("background process '{name}' is not registered")]
    ProcessNotFound { name: String },

    #[error("{count} parallel branch(es) failed: {summary}")]
    Parallel { count: usize, summary: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read user input: {0}")]
    Prompt(String),
}

impl ExecError {
    /// Map this error to a process exit code.
    ///
    /// Shell failures propagate the child's code; everything else is an
    /// engine error (1). Cancellation maps to the conventional 130.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::ShellExit { code, .. } => *code,
            ExecError::Cancelled => 130,
            ExecError::RetriesExhausted { last, .. } => last.exit_code(),
            _ => 1,
        }
    }

    /// True for the deadline/timeout family of errors.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout(_) | ExecError::DeadlineExceeded)
    }
}
