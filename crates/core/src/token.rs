// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token model for the devcmd language.
//!
//! Tokens carry both a processed `text` (string literals are unquoted,
//! comments lose their markers) and the verbatim `raw` slice of the input.
//! Shell text in particular is kept raw so the parser can rescan it for
//! inline decorators and so plan output can echo the source exactly.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// A name: letter start, then letters, digits, underscore, hyphen.
    Identifier,
    /// The `var` keyword.
    Var,
    /// The `watch` keyword.
    Watch,
    /// The `stop` keyword.
    Stop,
    /// A quoted string literal (`"…"`, `'…'`, or backticks).
    String,
    /// A numeric literal.
    Number,
    /// A duration literal: digits plus `ns`, `us`, `ms`, `s`, `m`, or `h`.
    Duration,
    /// `true` or `false` in a literal-expecting position.
    Boolean,
    /// `@`
    At,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// A raw run of shell text inside a command body.
    ShellText,
    /// `// …` to end of line.
    Comment,
    /// `/* … */`
    MultilineComment,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Var => "'var'",
            TokenKind::Watch => "'watch'",
            TokenKind::Stop => "'stop'",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Duration => "duration",
            TokenKind::Boolean => "boolean",
            TokenKind::At => "'@'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Equals => "'='",
            TokenKind::Comma => "','",
            TokenKind::ShellText => "shell text",
            TokenKind::Comment => "comment",
            TokenKind::MultilineComment => "comment",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Processed text: unquoted for strings, trimmed for shell text.
    pub text: String,
    /// Verbatim source slice.
    pub raw: String,
    pub span: Span,
    /// 1-indexed source line.
    pub line: usize,
    /// 1-indexed source column.
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        raw: impl Into<String>,
        span: Span,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            raw: raw.into(),
            span,
            line,
            column,
        }
    }

    /// True for the trivia kinds the parser skips between declarations.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Comment | TokenKind::MultilineComment
        )
    }
}
