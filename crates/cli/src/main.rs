// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! devcmd - declarative developer-workflow CLIs.

mod find;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use devcmd_core::Program;
use devcmd_runtime::{generate, plan_command, ExecError, Interpreter, PlanContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "devcmd",
    version,
    about = "Declarative developer-workflow command-line interfaces"
)]
struct Cli {
    /// Path to the .cli file (default: search upward for commands.cli or
    /// dev.cli)
    #[arg(short = 'f', long = "file", global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command (watch commands start in the background)
    Run {
        /// Command name
        name: String,
        /// Extra arguments passed through to the command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Stop a background process (runs the paired stop command if any)
    Stop {
        /// Process name
        name: String,
    },
    /// Show running background processes
    Status,
    /// Show logs for a background process
    Logs {
        /// Process name
        name: String,
    },
    /// Show what a command would execute, without running it
    Plan {
        /// Command name
        name: String,
    },
    /// Generate a standalone CLI source tree
    Generate {
        /// Output directory
        #[arg(short = 'o', long = "output", default_value = "./generated")]
        output: PathBuf,
        /// Package name for the generated crate
        #[arg(long = "name", default_value = "devcmd-gen")]
        package: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DEVCMD_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let code = runtime.block_on(async {
        tokio::select! {
            result = run() => match result {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("Error: {}", format_error(&e));
                    e.downcast_ref::<ExecError>().map_or(1, ExecError::exit_code)
                }
            },
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nInterrupted");
                130
            }
        }
    });
    // Dropping the runtime kills any remaining foreground children
    // (spawned with kill_on_drop); detached watch processes survive.
    drop(runtime);
    std::process::exit(code);
}

/// Format an anyhow error, deduplicating the chain.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let mut buf = top;
    for cause in err.chain().skip(1) {
        buf.push_str(&format!("\n  caused by: {cause}"));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let (program, project_root) = load_program(cli.file.as_deref())?;

    match cli.command {
        Commands::Run { name, args } => {
            let interp = Interpreter::new(program, project_root)?;
            interp.run(&name, &args).await?;
            Ok(())
        }
        Commands::Stop { name } => {
            let interp = Interpreter::new(program, project_root)?;
            interp.stop(&name).await?;
            Ok(())
        }
        Commands::Status => {
            let interp = Interpreter::new(program, project_root)?;
            let entries: Vec<_> = interp
                .process_registry()
                .load()
                .map_err(ExecError::from)?
                .into_values()
                .collect();
            print!("{}", output::render_status(&entries));
            Ok(())
        }
        Commands::Logs { name } => {
            let interp = Interpreter::new(program, project_root)?;
            let entry = interp
                .process_registry()
                .get(&name)
                .map_err(ExecError::from)?
                .ok_or(ExecError::ProcessNotFound { name: name.clone() })?;
            let contents = tokio::fs::read_to_string(&entry.log_file)
                .await
                .with_context(|| format!("reading log file {}", entry.log_file.display()))?;
            print!("{contents}");
            Ok(())
        }
        Commands::Plan { name } => {
            let ctx = PlanContext::new(Arc::new(program), project_root);
            let tree = plan_command(&ctx, &name)?;
            print!("{}", output::render_plan(&tree));
            Ok(())
        }
        Commands::Generate { output, package } => {
            let tree = generate(&program, &package)?;
            tree.write_to(&output)?;
            println!("Generated {} file(s) in {}", tree.files.len(), output.display());
            Ok(())
        }
    }
}

/// Locate, read, and parse the project's `.cli` file.
///
/// Returns the program and the directory that owns it (the root for
/// `.devcmd` state).
fn load_program(file: Option<&std::path::Path>) -> Result<(Program, PathBuf)> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            find::find_command_file(&cwd)
                .ok_or_else(|| anyhow!("no commands.cli or dev.cli found (use --file)"))?
        }
    };

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded command file");

    let program = devcmd_lang::parse(&source).map_err(|report| anyhow!("{report}"))?;

    let root = path
        .parent()
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((program, root))
}
