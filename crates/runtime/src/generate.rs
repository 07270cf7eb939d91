// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generator engine: emits a self-contained Rust CLI source tree.
//!
//! The emitted tree is `Cargo.toml` + `src/main.rs`, plus `src/registry.rs`
//! when any watch command exists. Output is deterministic: imports, crate
//! dependencies, and command groups are sorted, and temporary names come
//! from the context counters, so regenerating the same program yields
//! byte-identical files.

use devcmd_core::ast::{
    CommandContent, CommandDecl, CommandKind, Program, ShellContent, ShellPart,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::codegen::{compose_command_expr, indent, join_statements, rust_string_literal, sanitize_fn_name, GenValue};
use crate::context::GeneratorContext;
use crate::error::ExecError;
use crate::registry::{self, DecoratorKind};

/// One emitted file, path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: &'static str,
    pub contents: String,
}

/// The emitted source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTree {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedTree {
    /// Write the tree under `dir`, creating directories as needed.
    pub fn write_to(&self, dir: &Path) -> Result<(), ExecError> {
        for file in &self.files {
            let path = dir.join(file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &file.contents)?;
        }
        Ok(())
    }
}

/// How one named command group dispatches.
struct CommandGroup<'a> {
    name: &'a str,
    regular: Option<&'a CommandDecl>,
    watch: Option<&'a CommandDecl>,
    stop: Option<&'a CommandDecl>,
}

/// Generate the CLI source tree for a program.
pub fn generate(program: &Program, package_name: &str) -> Result<GeneratedTree, ExecError> {
    let program = Arc::new(program.clone());
    let mut ctx = GeneratorContext::new(Arc::clone(&program));

    // Group commands by name, sorted for deterministic output.
    let mut groups: BTreeMap<&str, CommandGroup> = BTreeMap::new();
    for cmd in &program.commands {
        let group = groups.entry(cmd.name.as_str()).or_insert(CommandGroup {
            name: &cmd.name,
            regular: None,
            watch: None,
            stop: None,
        });
        match cmd.kind {
            CommandKind::Regular => group.regular = Some(cmd),
            CommandKind::Watch => group.watch = Some(cmd),
            CommandKind::Stop => group.stop = Some(cmd),
        }
    }

    let has_watch = groups.values().any(|g| g.watch.is_some());

    // Emit one function per group.
    let mut functions = Vec::new();
    for group in groups.values() {
        functions.push(emit_group_fn(&mut ctx, group, has_watch)?);
    }

    let main_rs = emit_main(&ctx, &groups, &functions, has_watch || ctx.needs_registry());
    let cargo_toml = emit_cargo_toml(&ctx, package_name, has_watch || ctx.needs_registry());

    let mut files = vec![
        GeneratedFile {
            path: "Cargo.toml",
            contents: cargo_toml,
        },
        GeneratedFile {
            path: "src/main.rs",
            contents: main_rs,
        },
    ];
    if has_watch || ctx.needs_registry() {
        files.push(GeneratedFile {
            path: "src/registry.rs",
            contents: REGISTRY_MODULE.to_string(),
        });
    }

    Ok(GeneratedTree { files })
}

/// Emit the statements for an ordered list of content items.
pub fn emit_body(ctx: &mut GeneratorContext, items: &[CommandContent]) -> Result<String, ExecError> {
    let mut stmts = Vec::new();
    for item in items {
        stmts.push(emit_content(ctx, item)?);
    }
    Ok(join_statements(stmts))
}

/// Emit the statement(s) for a single content item.
pub fn emit_content(ctx: &mut GeneratorContext, item: &CommandContent) -> Result<String, ExecError> {
    match item {
        CommandContent::Shell(shell) => emit_shell(ctx, shell),
        CommandContent::Block(block) => {
            let Some(DecoratorKind::Block(d)) = registry::global().lookup(&block.name) else {
                return Err(ExecError::UnknownDecorator {
                    name: block.name.clone(),
                });
            };
            ctx.require(&d.import_requirements());
            d.execute_generate(ctx, &block.args, &block.content)
        }
        CommandContent::Pattern(pattern) => {
            let Some(DecoratorKind::Pattern(d)) = registry::global().lookup(&pattern.name) else {
                return Err(ExecError::UnknownDecorator {
                    name: pattern.name.clone(),
                });
            };
            ctx.require(&d.import_requirements());
            d.execute_generate(ctx, &pattern.args, &pattern.branches)
        }
    }
}

/// Emit one shell content item as a `run_shell` call (or an action
/// decorator invocation when the item is a lone standalone action).
pub fn emit_shell(ctx: &mut GeneratorContext, shell: &ShellContent) -> Result<String, ExecError> {
    if let [ShellPart::Decorator(d)] = shell.parts.as_slice() {
        if let Some(DecoratorKind::Action(action)) = registry::global().lookup(&d.name) {
            ctx.require(&action.import_requirements());
            return action.invoke_generate(ctx, &d.args);
        }
    }

    let expr = compose_shell_expr(ctx, shell)?;
    if expr.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("run_shell({}, &{})?;", expr_ref(&expr), ctx.cwd_var))
}

/// Compose shell content into a Rust expression for the command string.
pub fn compose_shell_expr(
    ctx: &mut GeneratorContext,
    shell: &ShellContent,
) -> Result<String, ExecError> {
    let mut parts = Vec::new();
    for part in &shell.parts {
        match part {
            ShellPart::Text(text) => parts.push(GenValue::Static(text.clone())),
            ShellPart::Decorator(d) => match registry::global().lookup(&d.name) {
                Some(DecoratorKind::Value(v)) => {
                    ctx.require(&v.import_requirements());
                    parts.push(v.expand_generate(ctx, &d.args)?);
                }
                Some(DecoratorKind::Action(a)) => {
                    ctx.require(&a.import_requirements());
                    parts.push(a.expand_generate(ctx, &d.args)?);
                }
                _ => {
                    return Err(ExecError::UnknownDecorator {
                        name: d.name.clone(),
                    })
                }
            },
        }
    }

    let all_whitespace = parts.iter().all(|p| match p {
        GenValue::Static(s) => s.trim().is_empty(),
        GenValue::Expr(_) => false,
    });
    if all_whitespace {
        return Ok(String::new());
    }
    Ok(compose_command_expr(&parts))
}

/// Reference an emitted command-string expression as `&str`.
fn expr_ref(expr: &str) -> String {
    if expr.starts_with('"') {
        expr.to_string()
    } else {
        format!("&{expr}")
    }
}

/// Emit the dispatch function for one command group.
fn emit_group_fn(
    ctx: &mut GeneratorContext,
    group: &CommandGroup<'_>,
    has_watch: bool,
) -> Result<String, ExecError> {
    let fn_name = sanitize_fn_name(group.name);
    let mut out = String::new();

    if let Some(decl) = group.regular {
        let mut body_ctx = ctx.child();
        body_ctx.cmd_stack.push(group.name.to_string());
        let body = emit_regular_body(&mut body_ctx, decl)?;
        ctx.absorb(body_ctx);

        let _ = write!(
            out,
            "fn {fn_name}(args: &[String]) -> Result<(), CmdError> {{\n\
             {}\n\
             {}\n\
             {}\n\
             }}",
            indent("let cwd = current_dir()?;", 1),
            indent(&body, 1),
            indent("Ok(())", 1),
        );
        return Ok(out);
    }

    // Watch (and optional custom stop) pair: start/stop subcommands.
    let start_stmt = match group.watch {
        Some(decl) => {
            let mut body_ctx = ctx.child();
            body_ctx.cmd_stack.push(group.name.to_string());
            let line = compose_watch_expr(&mut body_ctx, decl)?;
            ctx.absorb(body_ctx);
            format!(
                "registry::start_background({}, {})?;",
                rust_string_literal(group.name),
                expr_ref(&line),
            )
        }
        None => format!(
            "return Err(CmdError::usage(\"'{}' has no start command\"));",
            group.name
        ),
    };

    let mut stop_stmts = Vec::new();
    if let Some(decl) = group.stop {
        let mut body_ctx = ctx.child();
        body_ctx.cmd_stack.push(format!("stop {}", group.name));
        stop_stmts.push(emit_body(&mut body_ctx, &decl.body.content)?);
        ctx.absorb(body_ctx);
    }
    if has_watch && group.watch.is_some() {
        stop_stmts.push(format!(
            "registry::graceful_stop({})?;",
            rust_string_literal(group.name)
        ));
    }
    let stop_stmt = join_statements(stop_stmts);
    let stop_body = if stop_stmt.is_empty() {
        "// nothing to do".to_string()
    } else {
        stop_stmt
    };

    let usage = format!(
        "return Err(CmdError::usage(\"usage: {} <start|stop>\"));",
        group.name
    );

    let _ = write!(
        out,
        "fn {fn_name}(args: &[String]) -> Result<(), CmdError> {{\n\
         {}\n\
         {}\n\
         {}\n\
         }}",
        indent("#[allow(unused_variables)]\nlet cwd = current_dir()?;", 1),
        indent(
            &format!(
                "match args.first().map(String::as_str) {{\n\
                 {}\n\
                 {}\n\
                 {}\n\
                 }}",
                indent(&format!("Some(\"start\") => {{\n{}\n}}", indent(&start_stmt, 1)), 1),
                indent(
                    &format!("Some(\"stop\") => {{\n{}\n}}", indent(&stop_body, 1)),
                    1
                ),
                indent(&format!("_ => {usage}"), 1),
            ),
            1
        ),
        indent("Ok(())", 1),
    );
    Ok(out)
}

/// Emit a regular command body, with argument pass-through for simple
/// single-line bodies.
fn emit_regular_body(ctx: &mut GeneratorContext, decl: &CommandDecl) -> Result<String, ExecError> {
    if decl.body.is_simple() {
        if let CommandContent::Shell(shell) = &decl.body.content[0] {
            if let [ShellPart::Decorator(_)] = shell.parts.as_slice() {
                // Standalone action: no pass-through.
                let stmt = emit_shell(ctx, shell)?;
                return Ok(join_statements(["let _ = args;".to_string(), stmt]));
            }
            let expr = compose_shell_expr(ctx, shell)?;
            if expr.is_empty() {
                return Ok(String::new());
            }
            let cmd_var = ctx.fresh_tmp("cmd");
            return Ok(format!(
                "let mut {cmd_var} = String::from({expr});\n\
                 if !args.is_empty() {{\n    {cmd_var}.push(' ');\n    {cmd_var}.push_str(&args.join(\" \"));\n}}\n\
                 run_shell(&{cmd_var}, &{})?;",
                ctx.cwd_var
            ));
        }
    }
    let body = emit_body(ctx, &decl.body.content)?;
    Ok(join_statements([
        "let _ = args;".to_string(),
        body,
    ]))
}

/// Compose a watch body into a command-string expression (items joined
/// with `; ` like the interpreter does for background lines).
fn compose_watch_expr(ctx: &mut GeneratorContext, decl: &CommandDecl) -> Result<String, ExecError> {
    let mut parts = Vec::new();
    for (i, item) in decl.body.content.iter().enumerate() {
        let CommandContent::Shell(shell) = item else {
            let name = match item {
                CommandContent::Block(b) => b.name.clone(),
                CommandContent::Pattern(p) => p.name.clone(),
                CommandContent::Shell(_) => unreachable!(),
            };
            return Err(ExecError::WatchBodyNotShell { decorator: name });
        };
        if i > 0 {
            parts.push(GenValue::Static("; ".to_string()));
        }
        for part in &shell.parts {
            match part {
                ShellPart::Text(text) => parts.push(GenValue::Static(text.clone())),
                ShellPart::Decorator(d) => match registry::global().lookup(&d.name) {
                    Some(DecoratorKind::Value(v)) => {
                        ctx.require(&v.import_requirements());
                        parts.push(v.expand_generate(ctx, &d.args)?);
                    }
                    Some(DecoratorKind::Action(a)) => {
                        ctx.require(&a.import_requirements());
                        parts.push(a.expand_generate(ctx, &d.args)?);
                    }
                    _ => {
                        return Err(ExecError::UnknownDecorator {
                            name: d.name.clone(),
                        })
                    }
                },
            }
        }
    }
    Ok(compose_command_expr(&parts))
}

/// Emit `src/main.rs`.
fn emit_main(
    ctx: &GeneratorContext,
    groups: &BTreeMap<&str, CommandGroup<'_>>,
    functions: &[String],
    has_registry: bool,
) -> String {
    let mut out = String::new();
    out.push_str("// Generated by devcmd. Do not edit.\n\n");

    // Imports: decorator requirements plus the fixed base set, sorted.
    let mut uses: Vec<&str> = ctx.imports().collect();
    for base in [
        "std::path::Path",
        "std::path::PathBuf",
        "std::process::Command",
    ] {
        uses.push(base);
    }
    uses.sort_unstable();
    uses.dedup();
    for u in &uses {
        let _ = writeln!(out, "use {u};");
    }
    out.push('\n');

    if has_registry {
        out.push_str("mod registry;\n\n");
    }

    out.push_str(ERROR_AND_HELPERS);
    out.push('\n');

    // Dispatch.
    out.push_str("fn main() {\n");
    out.push_str("    let argv: Vec<String> = std::env::args().collect();\n");
    out.push_str("    let Some(command) = argv.get(1) else {\n");
    out.push_str("        print_help();\n");
    out.push_str("        return;\n");
    out.push_str("    };\n");
    out.push_str("    let args = &argv[2..];\n\n");
    out.push_str("    let result = match command.as_str() {\n");
    if has_registry {
        out.push_str("        \"status\" => registry::show_status(),\n");
        out.push_str("        \"logs\" => registry::show_logs(args),\n");
    }
    for group in groups.values() {
        let _ = writeln!(
            out,
            "        {} => {}(args),",
            rust_string_literal(group.name),
            sanitize_fn_name(group.name)
        );
    }
    out.push_str("        \"help\" | \"--help\" | \"-h\" => {\n");
    out.push_str("            print_help();\n");
    out.push_str("            Ok(())\n");
    out.push_str("        }\n");
    out.push_str("        other => Err(CmdError::usage(&format!(\"unknown command: {other}\"))),\n");
    out.push_str("    };\n\n");
    out.push_str("    if let Err(e) = result {\n");
    out.push_str("        if !e.message.is_empty() {\n");
    out.push_str("            eprintln!(\"{}\", e.message);\n");
    out.push_str("        }\n");
    out.push_str("        std::process::exit(e.code);\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");

    // Help.
    out.push_str("fn print_help() {\n");
    out.push_str("    println!(\"Available commands:\");\n");
    if has_registry {
        out.push_str(
            "    println!(\"  status              - Show running background processes\");\n",
        );
        out.push_str(
            "    println!(\"  logs <process>      - Show logs for a background process\");\n",
        );
    }
    for group in groups.values() {
        let help = if group.watch.is_some() {
            format!("  {} start|stop", group.name)
        } else {
            format!("  {}", group.name)
        };
        let _ = writeln!(out, "    println!({});", rust_string_literal(&help));
    }
    out.push_str("}\n\n");

    for f in functions {
        out.push_str(f);
        out.push_str("\n\n");
    }

    // Single trailing newline.
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Emit the generated `Cargo.toml`.
fn emit_cargo_toml(ctx: &GeneratorContext, package_name: &str, has_registry: bool) -> String {
    let mut deps: BTreeMap<&str, &str> = ctx.crates().collect();
    if has_registry {
        deps.insert("chrono", "{ version = \"0.4\", features = [\"serde\"] }");
        deps.insert("serde", "{ version = \"1.0\", features = [\"derive\"] }");
        deps.insert("serde_json", "\"1.0\"");
    }

    let mut out = String::new();
    let _ = writeln!(out, "[package]");
    let _ = writeln!(out, "name = \"{package_name}\"");
    let _ = writeln!(out, "version = \"0.1.0\"");
    let _ = writeln!(out, "edition = \"2021\"");
    out.push('\n');
    let _ = writeln!(out, "[dependencies]");
    for (name, spec) in &deps {
        let _ = writeln!(out, "{name} = {spec}");
    }
    out
}

/// Error type and shell helper emitted into every generated `main.rs`.
const ERROR_AND_HELPERS: &str = r#"/// Failure of a generated command: exit code plus message.
#[derive(Debug)]
pub struct CmdError {
    pub code: i32,
    pub message: String,
}

impl CmdError {
    fn usage(message: &str) -> Self {
        Self {
            code: 1,
            message: message.to_string(),
        }
    }
}

impl From<std::io::Error> for CmdError {
    fn from(e: std::io::Error) -> Self {
        Self {
            code: 1,
            message: e.to_string(),
        }
    }
}

fn current_dir() -> Result<PathBuf, CmdError> {
    Ok(std::env::current_dir()?)
}

/// Run a composed command line through the shell, propagating exit codes.
fn run_shell(command: &str, cwd: &Path) -> Result<(), CmdError> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .status()
        .map_err(|e| CmdError {
            code: 1,
            message: format!("failed to spawn '{command}': {e}"),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(CmdError {
            code: status.code().unwrap_or(130),
            message: format!("command exited with code {}: {command}", status.code().unwrap_or(130)),
        })
    }
}

/// Read an environment variable with an optional default.
///
/// An empty value counts as unset, matching interpreter-mode expansion.
#[allow(dead_code)]
fn env_or(key: &str, default: Option<&str>) -> Result<String, CmdError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => match default {
            Some(d) => Ok(d.to_string()),
            None => Err(CmdError {
                code: 1,
                message: format!("environment variable '{key}' is not set"),
            }),
        },
    }
}
"#;

/// Process-registry module emitted when watch commands exist.
const REGISTRY_MODULE: &str = r#"// Generated by devcmd. Do not edit.
//! Background process registry for generated watch commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::CmdError;

const STATE_DIR: &str = ".devcmd";
const GRACE: Duration = Duration::from_secs(5);
const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
    pub command: String,
    pub start_time: DateTime<Utc>,
    pub log_file: PathBuf,
    pub status: String,
}

fn state_dir() -> Result<PathBuf, CmdError> {
    let dir = PathBuf::from(STATE_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn registry_path() -> Result<PathBuf, CmdError> {
    Ok(state_dir()?.join("registry.json"))
}

fn load() -> Result<BTreeMap<String, ProcessInfo>, CmdError> {
    let path = registry_path()?;
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(&path)?;
    let entries: BTreeMap<String, ProcessInfo> =
        serde_json::from_str(&data).map_err(|e| CmdError {
            code: 1,
            message: format!("corrupt registry file: {e}"),
        })?;
    // Reap entries whose process is gone.
    let alive: BTreeMap<String, ProcessInfo> = entries
        .into_iter()
        .filter(|(_, p)| is_running(p.pid))
        .collect();
    save(&alive)?;
    Ok(alive)
}

fn save(entries: &BTreeMap<String, ProcessInfo>) -> Result<(), CmdError> {
    let path = registry_path()?;
    let tmp = path.with_extension("tmp");
    let data = serde_json::to_string_pretty(entries).map_err(|e| CmdError {
        code: 1,
        message: format!("failed to serialize registry: {e}"),
    })?;
    fs::write(&tmp, data)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

fn is_running(pid: u32) -> bool {
    signal(pid, "-0")
}

fn signal(pid: u32, sig: &str) -> bool {
    Command::new("kill")
        .args([sig, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Start `command` detached, logging to `.devcmd/<name>.log`.
pub fn start_background(name: &str, command: &str) -> Result<(), CmdError> {
    let mut entries = load()?;
    if entries.contains_key(name) {
        return Err(CmdError {
            code: 1,
            message: format!("'{name}' is already running"),
        });
    }

    let log_file = state_dir()?.join(format!("{name}.log"));
    let log = fs::File::create(&log_file)?;
    let err_log = log.try_clone()?;

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(err_log))
        .spawn()
        .map_err(|e| CmdError {
            code: 1,
            message: format!("failed to start '{name}': {e}"),
        })?;

    let pid = child.id();
    entries.insert(
        name.to_string(),
        ProcessInfo {
            name: name.to_string(),
            pid,
            command: command.to_string(),
            start_time: Utc::now(),
            log_file,
            status: "running".to_string(),
        },
    );
    save(&entries)?;
    println!("Started {name} in background (PID: {pid})");
    Ok(())
}

/// Stop a registered process: TERM, poll up to the grace period, KILL.
pub fn graceful_stop(name: &str) -> Result<(), CmdError> {
    let mut entries = load()?;
    let Some(info) = entries.get(name).cloned() else {
        return Err(CmdError {
            code: 1,
            message: format!("no process named '{name}' found"),
        });
    };

    println!("Stopping process {name} (PID: {})...", info.pid);
    signal(info.pid, "-TERM");

    let deadline = Instant::now() + GRACE;
    while Instant::now() < deadline {
        if !is_running(info.pid) {
            entries.remove(name);
            save(&entries)?;
            println!("Process {name} stopped");
            return Ok(());
        }
        std::thread::sleep(POLL);
    }

    println!("Force killing process {name}...");
    signal(info.pid, "-KILL");
    entries.remove(name);
    save(&entries)?;
    Ok(())
}

/// Print the status table of registered processes.
pub fn show_status() -> Result<(), CmdError> {
    let entries = load()?;
    if entries.is_empty() {
        println!("No background processes running");
        return Ok(());
    }
    println!(
        "{:<15} {:<8} {:<10} {:<20} COMMAND",
        "NAME", "PID", "STATUS", "STARTED"
    );
    for info in entries.values() {
        let started = info.start_time.format("%H:%M:%S");
        let mut command = info.command.clone();
        if command.len() > 30 {
            command.truncate(27);
            command.push_str("...");
        }
        println!(
            "{:<15} {:<8} {:<10} {:<20} {}",
            info.name, info.pid, info.status, started, command
        );
    }
    Ok(())
}

/// Stream a process's log file to stdout.
pub fn show_logs(args: &[String]) -> Result<(), CmdError> {
    let Some(name) = args.first() else {
        return Err(CmdError {
            code: 1,
            message: "usage: logs <process-name>".to_string(),
        });
    };
    let entries = load()?;
    let Some(info) = entries.get(name) else {
        return Err(CmdError {
            code: 1,
            message: format!("no process named '{name}' found"),
        });
    };
    let contents = fs::read_to_string(&info.log_file)?;
    print!("{contents}");
    Ok(())
}
"#;

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;
