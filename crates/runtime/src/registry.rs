// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide decorator registry.
//!
//! Decorators are registered once during initialization and the registry
//! is read-only afterward. Entries are keyed by lowercase name and tagged
//! with their category, so the parser can classify an `@name` reference
//! and the engines can dispatch without a shared base type.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::builtins;
use crate::contract::{
    ActionDecorator, BlockDecorator, Decorator, PatternDecorator, ValueDecorator,
};

/// A registered decorator, tagged by category.
#[derive(Clone, Copy)]
pub enum DecoratorKind {
    Value(&'static dyn ValueDecorator),
    Action(&'static dyn ActionDecorator),
    Block(&'static dyn BlockDecorator),
    Pattern(&'static dyn PatternDecorator),
}

impl DecoratorKind {
    /// The common contract of the underlying decorator.
    pub fn common(&self) -> &'static dyn Decorator {
        match self {
            DecoratorKind::Value(d) => *d,
            DecoratorKind::Action(d) => *d,
            DecoratorKind::Block(d) => *d,
            DecoratorKind::Pattern(d) => *d,
        }
    }

    /// True for the function-call categories (value and action), which
    /// appear inline in shell text and take parentheses.
    pub fn is_function(&self) -> bool {
        matches!(self, DecoratorKind::Value(_) | DecoratorKind::Action(_))
    }

    /// Short category tag, as shown in plan output.
    pub fn type_tag(&self) -> &'static str {
        match self {
            DecoratorKind::Value(_) => "value",
            DecoratorKind::Action(_) => "action",
            DecoratorKind::Block(_) => "block",
            DecoratorKind::Pattern(_) => "pattern",
        }
    }
}

/// The decorator registry.
pub struct Registry {
    entries: HashMap<&'static str, DecoratorKind>,
}

impl Registry {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn register(&mut self, kind: DecoratorKind) {
        let name = kind.common().name();
        debug_assert!(
            !self.entries.contains_key(name),
            "duplicate decorator registration: {name}"
        );
        self.entries.insert(name, kind);
    }

    /// Look up any decorator by name.
    pub fn lookup(&self, name: &str) -> Option<DecoratorKind> {
        self.entries.get(name).copied()
    }

    /// True if `name` is a registered value or action decorator.
    pub fn is_function(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|k| k.is_function())
    }

    /// True if `name` is a registered block decorator.
    pub fn is_block(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some(DecoratorKind::Block(_)))
    }

    /// True if `name` is a registered pattern decorator.
    pub fn is_pattern(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some(DecoratorKind::Pattern(_)))
    }

    /// All registered names, sorted, for diagnostics.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let mut r = Registry::new();
    r.register(DecoratorKind::Value(&builtins::var::Var));
    r.register(DecoratorKind::Value(&builtins::env::Env));
    r.register(DecoratorKind::Action(&builtins::cmd::Cmd));
    r.register(DecoratorKind::Block(&builtins::parallel::Parallel));
    r.register(DecoratorKind::Block(&builtins::timeout::Timeout));
    r.register(DecoratorKind::Block(&builtins::retry::Retry));
    r.register(DecoratorKind::Block(&builtins::workdir::Workdir));
    r.register(DecoratorKind::Block(&builtins::debounce::Debounce));
    r.register(DecoratorKind::Block(&builtins::confirm::Confirm));
    r.register(DecoratorKind::Pattern(&builtins::when::When));
    r.register(DecoratorKind::Pattern(&builtins::try_::Try));
    r
});

/// The process-wide registry of built-in decorators.
pub fn global() -> &'static Registry {
    &REGISTRY
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
