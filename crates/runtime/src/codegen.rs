// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code emission helpers for the generator engine.
//!
//! Generated sources are assembled from string fragments. Shell command
//! lines are composed at generation time where possible; fragments that
//! must be evaluated at runtime (e.g. `@env` lookups) become `format!`
//! arguments in the emitted code.

use std::fmt::Write as _;

/// A value fragment contributed to a composed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenValue {
    /// Known at generation time; inlined into the command string.
    Static(String),
    /// A Rust expression evaluated by the generated binary.
    Expr(String),
}

/// Compose shell parts into a Rust expression producing the command string.
///
/// All-static parts collapse into a single string literal; any runtime
/// fragment turns the whole line into a `format!` call.
pub fn compose_command_expr(parts: &[GenValue]) -> String {
    if parts.iter().all(|p| matches!(p, GenValue::Static(_))) {
        let mut line = String::new();
        for p in parts {
            if let GenValue::Static(s) = p {
                line.push_str(s);
            }
        }
        return rust_string_literal(line.trim());
    }

    let mut template = String::new();
    let mut args = Vec::new();
    for p in parts {
        match p {
            GenValue::Static(s) => template.push_str(&s.replace('{', "{{").replace('}', "}}")),
            GenValue::Expr(e) => {
                template.push_str("{}");
                args.push(e.clone());
            }
        }
    }
    format!(
        "format!({}, {})",
        rust_string_literal(template.trim()),
        args.join(", ")
    )
}

/// Escape a string into a Rust double-quoted literal.
pub fn rust_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Indent every non-empty line of `code` by `levels` four-space steps.
pub fn indent(code: &str, levels: usize) -> String {
    let pad = "    ".repeat(levels);
    let mut out = String::with_capacity(code.len());
    for (i, line) in code.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// Convert a command name to a valid Rust function name: `run_` plus the
/// name lowercased with every non-alphanumeric run collapsed to `_`.
pub fn sanitize_fn_name(name: &str) -> String {
    let mut out = String::from("run_");
    let mut last_was_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !out.ends_with('_') {
            out.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed == "run" {
        "run_command".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Join emitted statements, separating them with newlines and dropping
/// empties.
pub fn join_statements(stmts: impl IntoIterator<Item = String>) -> String {
    let mut out = String::new();
    for s in stmts {
        let s = s.trim_end();
        if s.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "{s}");
    }
    out
}

#[cfg(test)]
#[path = "codegen_tests.rs"]
mod tests;
