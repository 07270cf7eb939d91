// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Abstract syntax tree for devcmd programs.
//!
//! The tree is immutable after parse. Equivalent source forms produce
//! identical trees: the parser normalizes syntax sugar before returning,
//! and [`Program::normalized`] strips spans so tests can compare trees
//! from differently-positioned sources.

use crate::span::Span;
use crate::value::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete parsed program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub variables: Vec<VarDecl>,
    pub var_groups: Vec<VarGroup>,
    pub commands: Vec<CommandDecl>,
}

impl Program {
    /// Find a command declaration by name and kind.
    pub fn command(&self, name: &str, kind: CommandKind) -> Option<&CommandDecl> {
        self.commands
            .iter()
            .find(|c| c.name == name && c.kind == kind)
    }

    /// All variable declarations, flattening groups, in source order.
    pub fn all_variables(&self) -> impl Iterator<Item = &VarDecl> {
        self.variables
            .iter()
            .chain(self.var_groups.iter().flat_map(|g| g.variables.iter()))
    }

    /// A copy of this program with every span cleared.
    ///
    /// Sugar-equivalence holds modulo positions: `name: cmd` and
    /// `name: { cmd }` differ only in spans after normalization.
    pub fn normalized(&self) -> Program {
        let mut p = self.clone();
        for v in &mut p.variables {
            v.span = Span::default();
        }
        for g in &mut p.var_groups {
            g.span = Span::default();
            for v in &mut g.variables {
                v.span = Span::default();
            }
        }
        for c in &mut p.commands {
            c.span = Span::default();
            c.body.span = Span::default();
            for item in &mut c.body.content {
                strip_content_spans(item);
            }
        }
        p
    }
}

fn strip_content_spans(content: &mut CommandContent) {
    match content {
        CommandContent::Shell(shell) => {
            shell.span = Span::default();
            for part in &mut shell.parts {
                if let ShellPart::Decorator(d) = part {
                    d.span = Span::default();
                }
            }
        }
        CommandContent::Block(block) => {
            block.span = Span::default();
            for nested in &mut block.content {
                strip_content_spans(nested);
            }
        }
        CommandContent::Pattern(pattern) => {
            pattern.span = Span::default();
            for branch in &mut pattern.branches {
                branch.span = Span::default();
                for cmd in &mut branch.commands {
                    strip_content_spans(cmd);
                }
            }
        }
    }
}

/// `var NAME = <literal>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// `var ( NAME = <literal> … )` — semantics identical to flat declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarGroup {
    pub variables: Vec<VarDecl>,
    pub span: Span,
}

/// Which category a command declaration belongs to.
///
/// A watch command and a stop command may share a name, forming a logical
/// pair; a regular command must not share a name with either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Regular,
    Watch,
    Stop,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Regular => f.write_str("command"),
            CommandKind::Watch => f.write_str("watch command"),
            CommandKind::Stop => f.write_str("stop command"),
        }
    }
}

/// `[watch|stop] name: <body>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDecl {
    pub name: String,
    pub kind: CommandKind,
    pub body: CommandBody,
    pub span: Span,
}

/// The body of a command: an ordered list of content items.
///
/// `braced` records whether the canonical form carries brace tokens. A
/// body with exactly one shell-only content item is canonicalized to the
/// simple (unbraced) form regardless of how it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandBody {
    pub content: Vec<CommandContent>,
    pub braced: bool,
    pub span: Span,
}

impl CommandBody {
    /// True if this body is a single shell content item with no block or
    /// pattern decorators (the canonical simple form).
    pub fn is_simple(&self) -> bool {
        self.content.len() == 1 && matches!(self.content[0], CommandContent::Shell(_))
    }
}

/// One item of a command body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandContent {
    Shell(ShellContent),
    Block(BlockDecorator),
    Pattern(PatternDecorator),
}

/// A run of shell text with inline value/action decorators extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellContent {
    pub parts: Vec<ShellPart>,
    pub span: Span,
}

impl ShellContent {
    /// Recompose the original text, rendering inline decorators back to
    /// their `@name(args)` source form. Extraction is idempotent: this
    /// reproduces the SHELL_TEXT the parts were split from.
    pub fn recompose(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                ShellPart::Text(text) => out.push_str(text),
                ShellPart::Decorator(d) => out.push_str(&d.to_source()),
            }
        }
        out
    }
}

/// A piece of shell content: literal text or an inline decorator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShellPart {
    Text(String),
    Decorator(FunctionDecorator),
}

/// An inline value or action decorator: `@var(NAME)`, `@env("KEY")`,
/// `@cmd("task")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecorator {
    pub name: String,
    pub args: Vec<NamedParam>,
    pub span: Span,
}

impl FunctionDecorator {
    /// Render back to `@name(arg, …)` source form.
    pub fn to_source(&self) -> String {
        let args = self
            .args
            .iter()
            .map(NamedParam::to_source)
            .collect::<Vec<_>>()
            .join(", ");
        format!("@{}({})", self.name, args)
    }
}

/// A block decorator occurrence: `@name(args) { … }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDecorator {
    pub name: String,
    pub args: Vec<NamedParam>,
    pub content: Vec<CommandContent>,
    pub span: Span,
}

/// A pattern decorator occurrence: `@name(args) { pat: …; … }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDecorator {
    pub name: String,
    pub args: Vec<NamedParam>,
    pub branches: Vec<PatternBranch>,
    pub span: Span,
}

impl PatternDecorator {
    /// Find a branch by its pattern name (`default` finds the wildcard).
    pub fn branch(&self, name: &str) -> Option<&PatternBranch> {
        self.branches.iter().find(|b| b.pattern.matches_name(name))
    }

    /// The wildcard branch, if present.
    pub fn wildcard(&self) -> Option<&PatternBranch> {
        self.branches
            .iter()
            .find(|b| matches!(b.pattern, Pattern::Wildcard))
    }
}

/// One branch of a pattern decorator: `<pattern> : (<command> | { … })`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBranch {
    pub pattern: Pattern,
    pub commands: Vec<CommandContent>,
    pub span: Span,
}

/// A branch pattern: an identifier, or the wildcard spelled `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Identifier(String),
    Wildcard,
}

impl Pattern {
    pub fn name(&self) -> &str {
        match self {
            Pattern::Identifier(name) => name,
            Pattern::Wildcard => "default",
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name() == name
    }
}

/// A decorator argument, positional or written as `name = value`.
///
/// Positional arguments are bound to schema parameter names by the parser,
/// so `name` is always populated; `explicit` records whether the source
/// spelled the name out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParam {
    pub name: String,
    pub value: Expr,
    pub explicit: bool,
}

impl NamedParam {
    pub fn positional(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
            explicit: false,
        }
    }

    pub fn named(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
            explicit: true,
        }
    }

    fn to_source(&self) -> String {
        if self.explicit {
            format!("{} = {}", self.name, self.value)
        } else {
            self.value.to_string()
        }
    }
}

/// Look up a parameter by name.
pub fn param<'a>(params: &'a [NamedParam], name: &str) -> Option<&'a Expr> {
    params.iter().find(|p| p.name == name).map(|p| &p.value)
}

/// Look up a string parameter, falling back to `default`.
pub fn string_param(params: &[NamedParam], name: &str, default: &str) -> String {
    match param(params, name) {
        Some(Expr::Str(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Look up a boolean parameter, falling back to `default`.
pub fn bool_param(params: &[NamedParam], name: &str, default: bool) -> bool {
    match param(params, name) {
        Some(Expr::Bool(b)) => *b,
        _ => default,
    }
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
