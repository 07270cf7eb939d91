// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decorator parameter and pattern schemas.
//!
//! Schemas drive parse-time validation: positional arguments are bound to
//! names in schema order by the parser, then [`check_params`] verifies
//! arity, names, and types. Pattern decorators additionally declare which
//! branch identifiers they accept via [`PatternSchema`].

use devcmd_core::ast::{NamedParam, Pattern, PatternBranch};
use devcmd_core::value::ExprKind;
use thiserror::Error;

/// Schema violations reported at parse time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("@{decorator} takes at most {max} argument(s), got {got}")]
    TooManyArgs {
        decorator: String,
        max: usize,
        got: usize,
    },

    #[error("@{decorator} is missing required parameter '{name}'")]
    MissingParam { decorator: String, name: String },

    #[error("@{decorator} has no parameter named '{name}'")]
    UnknownParam { decorator: String, name: String },

    #[error("@{decorator} parameter '{name}' expects {expected}, got {found}")]
    WrongType {
        decorator: String,
        name: String,
        expected: ExprKind,
        found: ExprKind,
    },

    #[error("@{decorator} parameter '{name}' given more than once")]
    DuplicateParam { decorator: String, name: String },

    #[error("@{decorator} does not accept pattern '{pattern}'")]
    DisallowedPattern { decorator: String, pattern: String },

    #[error("@{decorator} requires a '{pattern}' branch")]
    MissingPattern { decorator: String, pattern: String },

    #[error("@{decorator} branch '{pattern}' appears more than once")]
    DuplicatePattern { decorator: String, pattern: String },

    #[error("@{decorator}: {message}")]
    Invalid { decorator: String, message: String },
}

/// Describes one decorator parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSchema {
    pub name: &'static str,
    pub kind: ExprKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParameterSchema {
    pub const fn required(name: &'static str, kind: ExprKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ExprKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// Describes the branches a pattern decorator accepts.
#[derive(Debug, Clone)]
pub struct PatternSchema {
    /// Specific branch names allowed (ignored when `any_identifier`).
    pub allowed: &'static [&'static str],
    /// Branch names that must be present.
    pub required: &'static [&'static str],
    /// At least one of these branch names must be present (empty = no
    /// such constraint). `@try` uses this for catch/finally.
    pub require_one_of: &'static [&'static str],
    /// Whether the `default` wildcard is permitted.
    pub allows_wildcard: bool,
    /// Whether arbitrary identifiers are permitted.
    pub any_identifier: bool,
    pub description: &'static str,
}

/// Dependencies the generator must include for a decorator's emitted code.
///
/// `uses` are `use` lines for the emitted `main.rs`; `registry_module`
/// marks decorators whose code needs the emitted process-registry module;
/// `crates` contribute `[dependencies]` entries to the emitted Cargo.toml.
#[derive(Debug, Clone, Default)]
pub struct ImportRequirements {
    pub uses: &'static [&'static str],
    pub crates: &'static [(&'static str, &'static str)],
    pub registry_module: bool,
}

/// Validate bound parameters against a schema.
///
/// Identifier arguments are variable references and satisfy any expected
/// type; the reference is resolved (and type-checked) at execution time.
pub fn check_params(
    decorator: &str,
    schema: &[ParameterSchema],
    params: &[NamedParam],
) -> Result<(), SchemaError> {
    if params.len() > schema.len() {
        return Err(SchemaError::TooManyArgs {
            decorator: decorator.to_string(),
            max: schema.len(),
            got: params.len(),
        });
    }

    for (i, p) in params.iter().enumerate() {
        let Some(expected) = schema.iter().find(|s| s.name == p.name) else {
            return Err(SchemaError::UnknownParam {
                decorator: decorator.to_string(),
                name: p.name.clone(),
            });
        };

        if params[..i].iter().any(|prev| prev.name == p.name) {
            return Err(SchemaError::DuplicateParam {
                decorator: decorator.to_string(),
                name: p.name.clone(),
            });
        }

        let found = p.value.kind();
        if found != expected.kind && found != ExprKind::Identifier {
            return Err(SchemaError::WrongType {
                decorator: decorator.to_string(),
                name: p.name.clone(),
                expected: expected.kind,
                found,
            });
        }
    }

    for s in schema.iter().filter(|s| s.required) {
        if !params.iter().any(|p| p.name == s.name) {
            return Err(SchemaError::MissingParam {
                decorator: decorator.to_string(),
                name: s.name.to_string(),
            });
        }
    }

    Ok(())
}

/// Validate pattern branches against a pattern schema.
pub fn check_patterns(
    decorator: &str,
    schema: &PatternSchema,
    branches: &[PatternBranch],
) -> Result<(), SchemaError> {
    for (i, branch) in branches.iter().enumerate() {
        let name = branch.pattern.name();

        if branches[..i].iter().any(|b| b.pattern.name() == name) {
            return Err(SchemaError::DuplicatePattern {
                decorator: decorator.to_string(),
                pattern: name.to_string(),
            });
        }

        match &branch.pattern {
            Pattern::Wildcard => {
                if !schema.allows_wildcard {
                    return Err(SchemaError::DisallowedPattern {
                        decorator: decorator.to_string(),
                        pattern: "default".to_string(),
                    });
                }
            }
            Pattern::Identifier(ident) => {
                if !schema.any_identifier && !schema.allowed.contains(&ident.as_str()) {
                    return Err(SchemaError::DisallowedPattern {
                        decorator: decorator.to_string(),
                        pattern: ident.clone(),
                    });
                }
            }
        }
    }

    for required in schema.required {
        if !branches.iter().any(|b| b.pattern.name() == *required) {
            return Err(SchemaError::MissingPattern {
                decorator: decorator.to_string(),
                pattern: required.to_string(),
            });
        }
    }

    if !schema.require_one_of.is_empty()
        && !branches
            .iter()
            .any(|b| schema.require_one_of.contains(&b.pattern.name()))
    {
        return Err(SchemaError::Invalid {
            decorator: decorator.to_string(),
            message: format!(
                "requires at least one of: {}",
                schema.require_one_of.join(", ")
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
