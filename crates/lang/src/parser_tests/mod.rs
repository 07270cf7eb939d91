// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser tests: sugar normalization, decorators, variables, patterns,
//! and error reporting.

use crate::parse;
use devcmd_core::ast::*;
use devcmd_core::span::Span;
use devcmd_core::value::Expr;

mod decorators;
mod errors;
mod patterns;
mod sugar;
mod variables;

// ---------------------------------------------------------------------------
// Shared test helpers (AST builders with default spans; comparisons go
// through Program::normalized)
// ---------------------------------------------------------------------------

pub(crate) fn parse_ok(input: &str) -> Program {
    match parse(input) {
        Ok(program) => program.normalized(),
        Err(report) => panic!("parse failed for {input:?}:\n{report}"),
    }
}

pub(crate) fn text(s: &str) -> ShellPart {
    ShellPart::Text(s.to_string())
}

pub(crate) fn at(name: &str, args: Vec<NamedParam>) -> ShellPart {
    ShellPart::Decorator(FunctionDecorator {
        name: name.to_string(),
        args,
        span: Span::default(),
    })
}

pub(crate) fn pos(name: &str, value: Expr) -> NamedParam {
    NamedParam::positional(name, value)
}

pub(crate) fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

pub(crate) fn s(value: &str) -> Expr {
    Expr::Str(value.to_string())
}

pub(crate) fn shell(parts: Vec<ShellPart>) -> CommandContent {
    CommandContent::Shell(ShellContent {
        parts,
        span: Span::default(),
    })
}

pub(crate) fn block_deco(
    name: &str,
    args: Vec<NamedParam>,
    content: Vec<CommandContent>,
) -> CommandContent {
    CommandContent::Block(BlockDecorator {
        name: name.to_string(),
        args,
        content,
        span: Span::default(),
    })
}

pub(crate) fn branch(pattern: Pattern, commands: Vec<CommandContent>) -> PatternBranch {
    PatternBranch {
        pattern,
        commands,
        span: Span::default(),
    }
}

pub(crate) fn pattern_deco(
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

pub(crate) fn simple_cmd(name: &str, parts: Vec<ShellPart>) -> CommandDecl {
    CommandDecl {
        name: name.to_string(),
        kind: CommandKind::Regular,
        body: CommandBody {
            content: vec![shell(parts)],
            braced: false,
            span: Span::default(),
        },
        span: Span::default(),
    }
}

pub(crate) fn block_cmd(name: &str, content: Vec<CommandContent>) -> CommandDecl {
    CommandDecl {
        name: name.to_string(),
        kind: CommandKind::Regular,
        body: CommandBody {
            content,
            braced: true,
            span: Span::default(),
        },
        span: Span::default(),
    }
}

pub(crate) fn program(commands: Vec<CommandDecl>) -> Program {
    Program {
        variables: vec![],
        var_groups: vec![],
        commands,
    }
}
