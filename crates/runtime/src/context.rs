// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution contexts for the three engines.
//!
//! Contexts are value-copied on every nested scope (`child`,
//! `with_workdir`, `with_deadline`); mutation is confined to engine-private
//! shared state behind the context (the background-process registry and
//! the debounce table). `parallel` branches therefore get independent
//! variable and working-directory views by construction.

use devcmd_core::ast::Program;
use devcmd_core::value::Expr;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

use crate::error::ExecError;
use crate::process::ProcessRegistry;
use crate::schema::ImportRequirements;

/// Collect the program's immutable variable scope (flat declarations plus
/// groups, in source order).
pub fn resolve_variables(program: &Program) -> HashMap<String, Expr> {
    program
        .all_variables()
        .map(|v| (v.name.clone(), v.value.clone()))
        .collect()
}

/// Resolve an expression against a variable scope: bare identifiers are
/// variable references, everything else stands for itself.
pub fn resolve_expr(vars: &HashMap<String, Expr>, expr: &Expr) -> Result<Expr, ExecError> {
    match expr {
        Expr::Ident(name) => vars
            .get(name)
            .cloned()
            .ok_or_else(|| ExecError::UnknownVariable { name: name.clone() }),
        other => Ok(other.clone()),
    }
}

/// State shared by every context derived from one interpreter run.
pub struct InterpShared {
    pub registry: ProcessRegistry,
    /// Last-fire instants for `@debounce` sites, keyed by site id.
    pub debounce: Mutex<HashMap<String, Instant>>,
}

/// Context for interpreter-mode execution.
#[derive(Clone)]
pub struct InterpreterContext {
    pub program: Arc<Program>,
    pub variables: HashMap<String, Expr>,
    pub workdir: PathBuf,
    /// Wall-clock deadline from the nearest enclosing `@timeout`.
    pub deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
    /// Command names on this execution path, for `@cmd` cycle detection.
    pub cmd_stack: Vec<String>,
    pub shared: Arc<InterpShared>,
}

impl InterpreterContext {
    pub fn new(program: Arc<Program>, workdir: PathBuf, shared: Arc<InterpShared>) -> Self {
        let variables = resolve_variables(&program);
        Self {
            program,
            variables,
            workdir,
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            cmd_stack: Vec::new(),
            shared,
        }
    }

    /// Derive an isolated child context (value copy; shared state and
    /// cancellation flag are inherited by reference).
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Derive a child with a different working directory.
    pub fn with_workdir(&self, dir: impl AsRef<Path>) -> Self {
        let mut child = self.clone();
        child.workdir = if dir.as_ref().is_absolute() {
            dir.as_ref().to_path_buf()
        } else {
            self.workdir.join(dir)
        };
        child
    }

    /// Derive a child whose deadline is the sooner of `deadline` and any
    /// enclosing deadline.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut child = self.clone();
        child.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        child
    }

    /// A handle that trips cancellation for this context tree.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fail fast if this context tree has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), ExecError> {
        if self.is_cancelled() {
            Err(ExecError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// True once the enclosing deadline has passed.
    pub fn deadline_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolve an argument expression against the variable scope.
    pub fn resolve(&self, expr: &Expr) -> Result<Expr, ExecError> {
        resolve_expr(&self.variables, expr)
    }

    /// Look up a variable's shell-text value.
    pub fn var_text(&self, name: &str) -> Result<String, ExecError> {
        self.variables
            .get(name)
            .map(Expr::as_shell_text)
            .ok_or_else(|| ExecError::UnknownVariable {
                name: name.to_string(),
            })
    }
}

/// Context for plan-mode walking.
#[derive(Clone)]
pub struct PlanContext {
    pub program: Arc<Program>,
    pub variables: HashMap<String, Expr>,
    pub workdir: PathBuf,
    pub cmd_stack: Vec<String>,
}

impl PlanContext {
    pub fn new(program: Arc<Program>, workdir: PathBuf) -> Self {
        let variables = resolve_variables(&program);
        Self {
            program,
            variables,
            workdir,
            cmd_stack: Vec::new(),
        }
    }

    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn resolve(&self, expr: &Expr) -> Result<Expr, ExecError> {
        resolve_expr(&self.variables, expr)
    }
}

/// Context for generator-mode emission.
///
/// Carries the import/crate accumulators and the counters that partition
/// temporary variable names between sibling scopes.
pub struct GeneratorContext {
    pub program: Arc<Program>,
    pub variables: HashMap<String, Expr>,
    /// Name of the in-scope `PathBuf` variable holding the working
    /// directory in emitted code.
    pub cwd_var: String,
    pub cmd_stack: Vec<String>,
    imports: BTreeSet<&'static str>,
    crates: BTreeMap<&'static str, &'static str>,
    needs_registry: bool,
    shell_counter: usize,
    child_counter: usize,
}

impl GeneratorContext {
    pub fn new(program: Arc<Program>) -> Self {
        let variables = resolve_variables(&program);
        Self {
            program,
            variables,
            cwd_var: "cwd".to_string(),
            cmd_stack: Vec::new(),
            imports: BTreeSet::new(),
            crates: BTreeMap::new(),
            needs_registry: false,
            shell_counter: 0,
            child_counter: 0,
        }
    }

    /// Derive a child context with its own temp-name partition.
    ///
    /// Each child gets a 1000-name window above the parent's counter so
    /// names emitted for concurrent branches can never collide.
    pub fn child(&mut self) -> GeneratorContext {
        self.child_counter += 1;
        GeneratorContext {
            program: Arc::clone(&self.program),
            variables: self.variables.clone(),
            cwd_var: self.cwd_var.clone(),
            cmd_stack: self.cmd_stack.clone(),
            imports: BTreeSet::new(),
            crates: BTreeMap::new(),
            needs_registry: false,
            shell_counter: self.shell_counter + self.child_counter * 1000,
            child_counter: 0,
        }
    }

    /// Merge a finished child's import requirements back into the parent.
    pub fn absorb(&mut self, child: GeneratorContext) {
        self.imports.extend(child.imports);
        self.crates.extend(child.crates);
        self.needs_registry |= child.needs_registry;
    }

    /// Record a decorator's import requirements.
    pub fn require(&mut self, reqs: &ImportRequirements) {
        self.imports.extend(reqs.uses.iter().copied());
        self.crates.extend(reqs.crates.iter().copied());
        self.needs_registry |= reqs.registry_module;
    }

    /// Allocate a fresh temporary variable name.
    pub fn fresh_tmp(&mut self, prefix: &str) -> String {
        let n = self.shell_counter;
        self.shell_counter += 1;
        format!("__{prefix}_{n}")
    }

    pub fn resolve(&self, expr: &Expr) -> Result<Expr, ExecError> {
        resolve_expr(&self.variables, expr)
    }

    /// Sorted `use` lines accumulated so far.
    pub fn imports(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.imports.iter().copied()
    }

    /// Sorted crate dependencies accumulated so far.
    pub fn crates(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.crates.iter().map(|(k, v)| (*k, *v))
    }

    pub fn needs_registry(&self) -> bool {
        self.needs_registry
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
