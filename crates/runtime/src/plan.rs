// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan element tree for dry-run mode.
//!
//! The plan engine walks the AST without executing anything: shell content
//! is composed with inline decorators rendered as `@name(...)` placeholders
//! (action decorators are never run), and decorators contribute structured
//! nodes that a renderer can draw as a tree.

use devcmd_core::ast::{CommandContent, CommandKind, ShellContent, ShellPart};
use serde::Serialize;

use crate::context::PlanContext;
use crate::error::ExecError;
use crate::registry::{self, DecoratorKind};

/// What a plan node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanKind {
    /// A composed shell command line.
    Command,
    /// A decorator controlling its children.
    Decorator,
}

/// One node of the dry-run tree.
#[derive(Debug, Clone, Serialize)]
pub struct PlanNode {
    pub kind: PlanKind,
    /// Command text for commands, decorator name for decorators.
    pub name: String,
    /// Category tag for decorators: `block`, `pattern`, `conditional`, …
    pub type_tag: Option<&'static str>,
    /// Selected parameters worth showing, in source order.
    pub params: Vec<(String, String)>,
    pub description: String,
    pub children: Vec<PlanNode>,
    /// True when the children execute concurrently.
    pub concurrent: bool,
}

impl PlanNode {
    pub fn command(command: impl Into<String>) -> Self {
        let command = command.into();
        Self {
            kind: PlanKind::Command,
            description: format!("Execute shell command: {command}"),
            name: command,
            type_tag: None,
            params: Vec::new(),
            children: Vec::new(),
            concurrent: false,
        }
    }

    pub fn decorator(name: impl Into<String>) -> Self {
        Self {
            kind: PlanKind::Decorator,
            name: name.into(),
            type_tag: None,
            params: Vec::new(),
            description: String::new(),
            children: Vec::new(),
            concurrent: false,
        }
    }

    pub fn with_type(mut self, tag: &'static str) -> Self {
        self.type_tag = Some(tag);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn concurrent(mut self) -> Self {
        self.concurrent = true;
        self
    }

    pub fn add_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_children(mut self, children: impl IntoIterator<Item = PlanNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Compose shell content for display without executing anything.
///
/// Inline value/action decorators render as `@name(...)` placeholders.
pub fn compose_for_plan(content: &ShellContent) -> String {
    let mut out = String::new();
    for part in &content.parts {
        match part {
            ShellPart::Text(text) => out.push_str(text),
            ShellPart::Decorator(d) => {
                out.push('@');
                out.push_str(&d.name);
                out.push_str("(...)");
            }
        }
    }
    out.trim().to_string()
}

/// Short description of a content list for decorator summaries, e.g.
/// `"main (2 commands)"`.
pub fn branch_summary(name: &str, commands: &[CommandContent]) -> String {
    format!("{} ({} commands)", name, commands.len())
}

/// Produce the dry-run tree for a named regular command.
pub fn plan_command(ctx: &PlanContext, name: &str) -> Result<PlanNode, ExecError> {
    let decl = ctx
        .program
        .command(name, CommandKind::Regular)
        .ok_or_else(|| ExecError::UnknownCommand {
            name: name.to_string(),
        })?;

    let mut child = ctx.child();
    child.cmd_stack.push(name.to_string());

    // A simple body plans as a single command node.
    if decl.body.is_simple() {
        if let CommandContent::Shell(shell) = &decl.body.content[0] {
            return plan_shell(&child, shell);
        }
    }

    let mut root = PlanNode::decorator(&decl.name)
        .with_type("command")
        .with_description(format!("Run command '{}'", decl.name));
    for item in &decl.body.content {
        root = root.add_child(plan_content(&child, item)?);
    }
    Ok(root)
}

/// Plan a single content item.
pub fn plan_content(ctx: &PlanContext, item: &CommandContent) -> Result<PlanNode, ExecError> {
    match item {
        CommandContent::Shell(shell) => plan_shell(ctx, shell),
        CommandContent::Block(block) => {
            let Some(DecoratorKind::Block(d)) = registry::global().lookup(&block.name) else {
                return Err(ExecError::UnknownDecorator {
                    name: block.name.clone(),
                });
            };
            d.execute_plan(ctx, &block.args, &block.content)
        }
        CommandContent::Pattern(pattern) => {
            let Some(DecoratorKind::Pattern(d)) = registry::global().lookup(&pattern.name) else {
                return Err(ExecError::UnknownDecorator {
                    name: pattern.name.clone(),
                });
            };
            d.execute_plan(ctx, &pattern.args, &pattern.branches)
        }
    }
}

/// Plan one shell content item. Standalone action decorators plan as a
/// subtree; everything else becomes a command node with placeholders.
fn plan_shell(ctx: &PlanContext, shell: &ShellContent) -> Result<PlanNode, ExecError> {
    if let [ShellPart::Decorator(d)] = shell.parts.as_slice() {
        if let Some(DecoratorKind::Action(action)) = registry::global().lookup(&d.name) {
            return action.invoke_plan(ctx, &d.args);
        }
    }
    Ok(PlanNode::command(compose_for_plan(shell)))
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
