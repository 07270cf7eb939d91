// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interpreter engine.
//!
//! Walks command bodies in source order, composes shell content into
//! single command lines, and runs them through `sh -c` with the context's
//! working directory. Deadlines from enclosing `@timeout`s bound every
//! wait; children are spawned with `kill_on_drop` so an aborted run never
//! leaks processes.
//!
//! Watch commands are spawned detached with their output appended to
//! `.devcmd/<name>.log` and registered in the background registry; a
//! supervisor task reaps the entry when the process exits on its own.

use chrono::Utc;
use devcmd_core::ast::{CommandContent, CommandDecl, CommandKind, Program, ShellContent, ShellPart};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::context::{InterpShared, InterpreterContext};
use crate::error::ExecError;
use crate::process::{ProcessEntry, ProcessRegistry, ProcessStatus, DEFAULT_GRACE};
use crate::registry::{self, DecoratorKind};

/// Interpreter-mode engine for one parsed program.
pub struct Interpreter {
    program: Arc<Program>,
    shared: Arc<InterpShared>,
    workdir: PathBuf,
}

impl Interpreter {
    /// Create an interpreter rooted at `workdir` (the directory holding
    /// the `.devcmd` state dir).
    pub fn new(program: Program, workdir: PathBuf) -> Result<Self, ExecError> {
        let registry = ProcessRegistry::open(&workdir)?;
        Ok(Self {
            program: Arc::new(program),
            shared: Arc::new(InterpShared {
                registry,
                debounce: parking_lot::Mutex::new(Default::default()),
            }),
            workdir,
        })
    }

    /// The root execution context.
    pub fn context(&self) -> InterpreterContext {
        InterpreterContext::new(
            Arc::clone(&self.program),
            self.workdir.clone(),
            Arc::clone(&self.shared),
        )
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// The background process registry for this project.
    pub fn process_registry(&self) -> &ProcessRegistry {
        &self.shared.registry
    }

    /// Run a command by name: regular commands run in the foreground,
    /// watch commands start in the background.
    pub async fn run(&self, name: &str, extra_args: &[String]) -> Result<(), ExecError> {
        if let Some(decl) = self.program.command(name, CommandKind::Regular) {
            return self.run_regular(decl, extra_args).await;
        }
        if self.program.command(name, CommandKind::Watch).is_some() {
            return self.start_watch(name).await;
        }
        Err(ExecError::UnknownCommand {
            name: name.to_string(),
        })
    }

    async fn run_regular(&self, decl: &CommandDecl, extra_args: &[String]) -> Result<(), ExecError> {
        info!(command = %decl.name, "running command");
        let mut ctx = self.context();
        ctx.cmd_stack.push(decl.name.clone());

        // Pass-through arguments append to a simple body's command line.
        if !extra_args.is_empty() && decl.body.is_simple() {
            if let CommandContent::Shell(shell) = &decl.body.content[0] {
                let mut line = ctx.compose_shell(shell)?;
                line.push(' ');
                line.push_str(&extra_args.join(" "));
                return ctx.run_line(&line).await;
            }
        }

        ctx.run_body(&decl.body.content).await
    }

    /// Start a watch command as a registered background process.
    pub async fn start_watch(&self, name: &str) -> Result<(), ExecError> {
        let decl = self
            .program
            .command(name, CommandKind::Watch)
            .ok_or_else(|| ExecError::UnknownCommand {
                name: name.to_string(),
            })?;

        let registry = &self.shared.registry;
        if registry.get(name)?.is_some() {
            return Err(ExecError::AlreadyRunning {
                name: name.to_string(),
            });
        }

        let mut ctx = self.context();
        ctx.cmd_stack.push(name.to_string());
        let command = ctx.compose_watch_line(&decl.body.content)?;

        let log_path = registry.log_path(name);
        let log = std::fs::File::create(&log_path)?;
        let stderr_log = log.try_clone()?;

        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&ctx.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(stderr_log))
            .spawn()
            .map_err(|source| ExecError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        let pid = child.id().unwrap_or_default();
        registry.register(ProcessEntry {
            name: name.to_string(),
            pid,
            command: command.clone(),
            start_time: Utc::now(),
            log_file: log_path,
            status: ProcessStatus::Running,
        })?;
        info!(name, pid, "started background process");

        // Supervisor: reap the registry entry when the process exits on
        // its own. If this process exits first, the stale entry is reaped
        // on the next registry load instead.
        let supervisor_registry = registry.clone();
        let supervised = name.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    debug!(name = %supervised, ?status, "background process exited");
                }
                Err(e) => warn!(name = %supervised, error = %e, "background wait failed"),
            }
            if let Err(e) = supervisor_registry.remove(&supervised) {
                warn!(name = %supervised, error = %e, "failed to reap registry entry");
            }
        });

        Ok(())
    }

    /// Stop a background process: run the paired `stop` command body if
    /// one is declared, then gracefully terminate the registered process.
    pub async fn stop(&self, name: &str) -> Result<(), ExecError> {
        let stop_decl = self.program.command(name, CommandKind::Stop);
        let entry = self.shared.registry.get(name)?;

        if stop_decl.is_none() && entry.is_none() {
            return Err(ExecError::ProcessNotFound {
                name: name.to_string(),
            });
        }

        if let Some(decl) = stop_decl {
            let mut ctx = self.context();
            ctx.cmd_stack.push(format!("stop {name}"));
            ctx.run_body(&decl.body.content).await?;
        }

        if entry.is_some() {
            self.shared
                .registry
                .graceful_stop(name, DEFAULT_GRACE)
                .await?;
        }
        Ok(())
    }
}

impl InterpreterContext {
    /// Execute an ordered list of content items.
    pub async fn run_body(&self, items: &[CommandContent]) -> Result<(), ExecError> {
        for item in items {
            self.run_content(item).await?;
        }
        Ok(())
    }

    /// Execute a single content item.
    pub async fn run_content(&self, item: &CommandContent) -> Result<(), ExecError> {
        self.check_cancelled()?;
        match item {
            CommandContent::Shell(shell) => self.run_shell(shell).await,
            CommandContent::Block(block) => {
                let Some(DecoratorKind::Block(d)) = registry::global().lookup(&block.name) else {
                    return Err(ExecError::UnknownDecorator {
                        name: block.name.clone(),
                    });
                };
                d.execute_interp(self, &block.args, &block.content).await
            }
            CommandContent::Pattern(pattern) => {
                let Some(DecoratorKind::Pattern(d)) = registry::global().lookup(&pattern.name)
                else {
                    return Err(ExecError::UnknownDecorator {
                        name: pattern.name.clone(),
                    });
                };
                d.execute_interp(self, &pattern.args, &pattern.branches)
                    .await
            }
        }
    }

    /// Execute one shell content item.
    ///
    /// A lone standalone action decorator dispatches to the decorator's
    /// `invoke` (so `build: @cmd("compile")` can reference commands with
    /// non-simple bodies); anything else composes into a single line.
    pub async fn run_shell(&self, shell: &ShellContent) -> Result<(), ExecError> {
        if let [ShellPart::Decorator(d)] = shell.parts.as_slice() {
            if let Some(DecoratorKind::Action(action)) = registry::global().lookup(&d.name) {
                return action.invoke_interp(self, &d.args).await;
            }
        }

        let line = self.compose_shell(shell)?;
        if line.trim().is_empty() {
            return Ok(());
        }
        self.run_line(&line).await
    }

    /// Compose shell content into a single command line by expanding
    /// inline value/action decorators.
    pub fn compose_shell(&self, shell: &ShellContent) -> Result<String, ExecError> {
        let mut line = String::new();
        for part in &shell.parts {
            match part {
                ShellPart::Text(text) => line.push_str(text),
                ShellPart::Decorator(d) => match registry::global().lookup(&d.name) {
                    Some(DecoratorKind::Value(v)) => line.push_str(&v.expand_interp(self, &d.args)?),
                    Some(DecoratorKind::Action(a)) => {
                        line.push_str(&a.expand_interp(self, &d.args)?)
                    }
                    _ => {
                        return Err(ExecError::UnknownDecorator {
                            name: d.name.clone(),
                        })
                    }
                },
            }
        }
        Ok(line.trim().to_string())
    }

    /// Compose a watch body into one background command line. Items are
    /// joined with `; ` like a simple shell script; decorated content is
    /// not supported in the background.
    pub fn compose_watch_line(&self, items: &[CommandContent]) -> Result<String, ExecError> {
        let mut lines = Vec::new();
        for item in items {
            match item {
                CommandContent::Shell(shell) => lines.push(self.compose_shell(shell)?),
                CommandContent::Block(b) => {
                    return Err(ExecError::WatchBodyNotShell {
                        decorator: b.name.clone(),
                    })
                }
                CommandContent::Pattern(p) => {
                    return Err(ExecError::WatchBodyNotShell {
                        decorator: p.name.clone(),
                    })
                }
            }
        }
        Ok(lines.join("; "))
    }

    /// Run a composed command line through `sh -c`.
    pub async fn run_line(&self, line: &str) -> Result<(), ExecError> {
        self.check_cancelled()?;
        if self.deadline_expired() {
            return Err(ExecError::DeadlineExceeded);
        }

        debug!(command = %line, workdir = %self.workdir.display(), "spawning shell");
        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(line)
            .current_dir(&self.workdir)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::SpawnFailed {
                command: line.to_string(),
                source,
            })?;

        let status = match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    terminate(&mut child).await;
                    return Err(ExecError::DeadlineExceeded);
                }
            },
            None => child.wait().await?,
        };

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::ShellExit {
                command: line.to_string(),
                code: status.code().unwrap_or(130),
            })
        }
    }

    /// Sleep, bounded by the context deadline.
    pub async fn sleep(&self, duration: Duration) -> Result<(), ExecError> {
        let wake = Instant::now() + duration;
        match self.deadline {
            Some(deadline) if deadline < wake => {
                tokio::time::sleep_until(deadline).await;
                Err(ExecError::DeadlineExceeded)
            }
            _ => {
                tokio::time::sleep_until(wake).await;
                Ok(())
            }
        }
    }
}

/// Terminate a child gracefully: TERM first, KILL after the grace period.
async fn terminate(child: &mut tokio::process::Child) {
    if let Some(pid) = child.id() {
        let _ = std::process::Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .status();
        if tokio::time::timeout(DEFAULT_GRACE, child.wait()).await.is_ok() {
            return;
        }
    }
    let _ = child.kill().await;
}

#[cfg(test)]
#[path = "interp_tests.rs"]
mod tests;
