// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AST builders shared by engine tests.

use devcmd_core::ast::*;
use devcmd_core::span::Span;
use devcmd_core::value::Expr;
use std::sync::Arc;

pub(crate) fn program(
    vars: Vec<(&str, Expr)>,
    commands: Vec<CommandDecl>,
) -> Arc<Program> {
    Arc::new(Program {
        variables: vars
            .into_iter()
            .map(|(name, value)| VarDecl {
                name: name.to_string(),
                value,
                span: Span::default(),
            })
            .collect(),
        var_groups: vec![],
        commands,
    })
}

pub(crate) fn cmd(name: &str, kind: CommandKind, content: Vec<CommandContent>) -> CommandDecl {
    let braced = !(content.len() == 1 && matches!(content[0], CommandContent::Shell(_)));
    CommandDecl {
        name: name.to_string(),
        kind,
        body: CommandBody {
            content,
            braced,
            span: Span::default(),
        },
        span: Span::default(),
    }
}

pub(crate) fn shell_text(s: &str) -> CommandContent {
    shell_parts(vec![text(s)])
}

pub(crate) fn shell_parts(parts: Vec<ShellPart>) -> CommandContent {
    CommandContent::Shell(ShellContent {
        parts,
        span: Span::default(),
    })
}

pub(crate) fn text(s: &str) -> ShellPart {
    ShellPart::Text(s.to_string())
}

pub(crate) fn inline(name: &str, args: Vec<NamedParam>) -> ShellPart {
    ShellPart::Decorator(FunctionDecorator {
        name: name.to_string(),
        args,
        span: Span::default(),
    })
}

pub(crate) fn block(name: &str, args: Vec<NamedParam>, content: Vec<CommandContent>) -> CommandContent {
    CommandContent::Block(BlockDecorator {
        name: name.to_string(),
        args,
        content,
        span: Span::default(),
    })
}

pub(crate) fn pattern(
    name: &str,
    args: Vec<NamedParam>,
    branches: Vec<PatternBranch>,
) -> CommandContent {
    CommandContent::Pattern(PatternDecorator {
        name: name.to_string(),
        args,
        branches,
        span: Span::default(),
    })
}

pub(crate) fn branch(label: &str, commands: Vec<CommandContent>) -> PatternBranch {
    PatternBranch {
        pattern: if label == "default" {
            Pattern::Wildcard
        } else {
            Pattern::Identifier(label.to_string())
        },
        commands,
        span: Span::default(),
    }
}

pub(crate) fn arg(name: &str, value: Expr) -> NamedParam {
    NamedParam::positional(name, value)
}
