// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser error types and the grouped error report.

use devcmd_core::span::{diagnostic_context, Span};
use devcmd_core::token::TokenKind;
use devcmd_runtime::SchemaError;
use std::fmt;
use thiserror::Error;

use crate::lexer::LexerError;

/// Parser errors.
///
/// Use [`ParseError::diagnostic`] to render the error as an annotated
/// source block with a caret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Lexer error during tokenization.
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    /// A token that doesn't fit the grammar.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: String,
        span: Span,
    },

    /// `@name` does not resolve to any registered decorator.
    #[error("unknown decorator @{name}")]
    UnknownDecorator { name: String, span: Span },

    /// A decorator used in a position its category does not allow.
    #[error("@{name} is a {category} decorator and cannot be used {position}")]
    MisplacedDecorator {
        name: String,
        category: &'static str,
        position: &'static str,
        span: Span,
    },

    /// Variable values must be literals.
    #[error("variable value must be a quoted string, number, duration, or boolean literal")]
    InvalidVarValue { span: Span },

    /// Decorator arguments or pattern branches violate the schema.
    #[error("{inner}")]
    Schema { inner: SchemaError, span: Span },

    /// Two commands of the same category share a name.
    #[error("duplicate {category} '{name}'")]
    DuplicateCommand {
        name: String,
        category: &'static str,
        span: Span,
    },

    /// A regular command shares a name with a watch/stop pair.
    #[error("command '{name}' conflicts with a watch/stop command of the same name")]
    CrossCategoryConflict { name: String, span: Span },
}

impl ParseError {
    /// Get the span associated with this error, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lexer(e) => Some(e.span()),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnknownDecorator { span, .. }
            | ParseError::MisplacedDecorator { span, .. }
            | ParseError::InvalidVarValue { span }
            | ParseError::Schema { span, .. }
            | ParseError::DuplicateCommand { span, .. }
            | ParseError::CrossCategoryConflict { span, .. } => Some(*span),
        }
    }

    /// Rich diagnostic with line/column info, or the plain message if the
    /// error has no span.
    pub fn diagnostic(&self, input: &str) -> String {
        match self.span() {
            Some(span) => diagnostic_context(input, span, &self.to_string()),
            None => self.to_string(),
        }
    }
}

/// All errors collected over one parse, rendered as a grouped report.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub errors: Vec<ParseError>,
    source: String,
}

impl ParseReport {
    pub fn new(errors: Vec<ParseError>, source: &str) -> Self {
        Self {
            errors,
            source: source.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "parsing failed:")?;
        for err in &self.errors {
            for (i, line) in err.diagnostic(&self.source).lines().enumerate() {
                if i == 0 {
                    writeln!(f, "- {line}")?;
                } else {
                    writeln!(f, "  {line}")?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseReport {}
