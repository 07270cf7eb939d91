// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Literal values and duration parsing.
//!
//! Variable values and decorator arguments are restricted to four literal
//! kinds plus bare identifiers (variable references in argument position).
//! Numbers and durations keep their source text so rendering and AST
//! comparison stay exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors converting literal text into usable values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid duration '{0}': expected digits followed by ns, us, ms, s, m, or h")]
    InvalidDuration(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expected {expected} value, got {found}")]
    TypeMismatch {
        expected: ExprKind,
        found: ExprKind,
    },
}

/// The type of an expression, used by decorator parameter schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprKind {
    String,
    Number,
    Duration,
    Boolean,
    Identifier,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExprKind::String => "string",
            ExprKind::Number => "number",
            ExprKind::Duration => "duration",
            ExprKind::Boolean => "boolean",
            ExprKind::Identifier => "identifier",
        };
        f.write_str(s)
    }
}

/// An expression in a variable declaration or decorator argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A quoted string, stored without its quotes.
    Str(String),
    /// A numeric literal, kept as source text.
    Number(String),
    /// A duration literal like `500ms`, kept as source text.
    Duration(String),
    /// `true` or `false`.
    Bool(bool),
    /// A bare identifier: a variable reference in argument position.
    Ident(String),
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Str(_) => ExprKind::String,
            Expr::Number(_) => ExprKind::Number,
            Expr::Duration(_) => ExprKind::Duration,
            Expr::Bool(_) => ExprKind::Boolean,
            Expr::Ident(_) => ExprKind::Identifier,
        }
    }

    /// The value as it appears when substituted into a shell line.
    pub fn as_shell_text(&self) -> String {
        match self {
            Expr::Str(s) => s.clone(),
            Expr::Number(n) => n.clone(),
            Expr::Duration(d) => d.clone(),
            Expr::Bool(b) => b.to_string(),
            Expr::Ident(name) => name.clone(),
        }
    }

    /// Interpret this expression as a duration.
    pub fn as_duration(&self) -> Result<Duration, ValueError> {
        match self {
            Expr::Duration(d) => parse_duration(d),
            other => Err(ValueError::TypeMismatch {
                expected: ExprKind::Duration,
                found: other.kind(),
            }),
        }
    }

    /// Interpret this expression as an integer count (e.g. retry attempts).
    pub fn as_integer(&self) -> Result<u32, ValueError> {
        match self {
            Expr::Number(n) => n
                .parse::<u32>()
                .map_err(|_| ValueError::InvalidNumber(n.clone())),
            other => Err(ValueError::TypeMismatch {
                expected: ExprKind::Number,
                found: other.kind(),
            }),
        }
    }

    /// Interpret this expression as a boolean.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Expr::Bool(b) => Ok(*b),
            other => Err(ValueError::TypeMismatch {
                expected: ExprKind::Boolean,
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Expr::Number(n) => f.write_str(n),
            Expr::Duration(d) => f.write_str(d),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Ident(name) => f.write_str(name),
        }
    }
}

/// Recognized duration suffixes, longest first so `ms` wins over `m` + `s`.
const DURATION_UNITS: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Parse a duration literal: `[0-9]+(ns|us|ms|s|m|h)`.
pub fn parse_duration(s: &str) -> Result<Duration, ValueError> {
    let digits_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(digits_end);
    if num_str.is_empty() {
        return Err(ValueError::InvalidDuration(s.to_string()));
    }

    let value: u64 = num_str
        .parse()
        .map_err(|_| ValueError::InvalidDuration(s.to_string()))?;

    let nanos_per = DURATION_UNITS
        .iter()
        .find(|(unit, _)| *unit == suffix)
        .map(|(_, n)| *n)
        .ok_or_else(|| ValueError::InvalidDuration(s.to_string()))?;

    Ok(Duration::from_nanos(value.saturating_mul(nanos_per)))
}

/// Check whether `s` has the shape of a duration literal.
pub fn is_duration_literal(s: &str) -> bool {
    parse_duration(s).is_ok()
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
