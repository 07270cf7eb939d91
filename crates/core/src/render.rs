// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical source rendering (AST → `.cli` text).
//!
//! Rendering picks one spelling for each construct (sugar forms collapse
//! to their shortest form, branches with one command drop their braces),
//! so `parse(render(parse(p)))` equals `parse(p)` after normalization.

use crate::ast::{
    BlockDecorator, CommandBody, CommandContent, CommandDecl, CommandKind, NamedParam,
    PatternDecorator, Program, VarDecl,
};

const INDENT: &str = "    ";

/// Render a program back to canonical devcmd source.
pub fn render(program: &Program) -> String {
    let mut out = String::new();

    for var in &program.variables {
        render_var(&mut out, var);
        out.push('\n');
    }

    for group in &program.var_groups {
        out.push_str("var (\n");
        for var in &group.variables {
            out.push_str(INDENT);
            out.push_str(&var.name);
            out.push_str(" = ");
            out.push_str(&var.value.to_string());
            out.push('\n');
        }
        out.push_str(")\n");
    }

    for cmd in &program.commands {
        render_command(&mut out, cmd);
    }

    out
}

fn render_var(out: &mut String, var: &VarDecl) {
    out.push_str("var ");
    out.push_str(&var.name);
    out.push_str(" = ");
    out.push_str(&var.value.to_string());
}

fn render_command(out: &mut String, cmd: &CommandDecl) {
    match cmd.kind {
        CommandKind::Regular => {}
        CommandKind::Watch => out.push_str("watch "),
        CommandKind::Stop => out.push_str("stop "),
    }
    out.push_str(&cmd.name);
    out.push_str(": ");
    render_body(out, &cmd.body);
    out.push('\n');
}

fn render_body(out: &mut String, body: &CommandBody) {
    // Simple canonical form: one shell item, no braces.
    if !body.braced && body.is_simple() {
        if let CommandContent::Shell(shell) = &body.content[0] {
            out.push_str(shell.recompose().trim());
            return;
        }
    }

    // Sugar form for a body that is a single block/pattern decorator.
    if body.content.len() == 1 {
        match &body.content[0] {
            CommandContent::Block(block) => {
                render_block_decorator(out, block, 0);
                return;
            }
            CommandContent::Pattern(pattern) => {
                render_pattern_decorator(out, pattern, 0);
                return;
            }
            CommandContent::Shell(_) => {}
        }
    }

    out.push('{');
    out.push('\n');
    for item in &body.content {
        render_content(out, item, 1);
    }
    out.push('}');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn render_content(out: &mut String, content: &CommandContent, depth: usize) {
    match content {
        CommandContent::Shell(shell) => {
            push_indent(out, depth);
            out.push_str(shell.recompose().trim());
            out.push('\n');
        }
        CommandContent::Block(block) => {
            push_indent(out, depth);
            render_block_decorator(out, block, depth);
            out.push('\n');
        }
        CommandContent::Pattern(pattern) => {
            push_indent(out, depth);
            render_pattern_decorator(out, pattern, depth);
            out.push('\n');
        }
    }
}

fn render_args(out: &mut String, args: &[NamedParam]) {
    if args.is_empty() {
        return;
    }
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if arg.explicit {
            out.push_str(&arg.name);
            out.push_str(" = ");
        }
        out.push_str(&arg.value.to_string());
    }
    out.push(')');
}

fn render_block_decorator(out: &mut String, block: &BlockDecorator, depth: usize) {
    out.push('@');
    out.push_str(&block.name);
    render_args(out, &block.args);
    out.push_str(" {\n");
    for item in &block.content {
        render_content(out, item, depth + 1);
    }
    push_indent(out, depth);
    out.push('}');
}

fn render_pattern_decorator(out: &mut String, pattern: &PatternDecorator, depth: usize) {
    out.push('@');
    out.push_str(&pattern.name);
    render_args(out, &pattern.args);
    out.push_str(" {\n");
    for branch in &pattern.branches {
        push_indent(out, depth + 1);
        out.push_str(branch.pattern.name());
        out.push_str(": ");
        // One shell command keeps the inline form; anything else gets braces.
        let inline = branch.commands.len() == 1
            && matches!(branch.commands[0], CommandContent::Shell(_));
        if inline {
            if let CommandContent::Shell(shell) = &branch.commands[0] {
                out.push_str(shell.recompose().trim());
            }
            out.push('\n');
        } else {
            out.push_str("{\n");
            for cmd in &branch.commands {
                render_content(out, cmd, depth + 2);
            }
            push_indent(out, depth + 1);
            out.push_str("}\n");
        }
    }
    push_indent(out, depth);
    out.push('}');
}
