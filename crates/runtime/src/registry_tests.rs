// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn all_builtins_are_registered() {
    let names = global().names();
    assert_eq!(
        names,
        vec![
            "cmd", "confirm", "debounce", "env", "parallel", "retry", "timeout", "try", "var",
            "when", "workdir",
        ]
    );
}

#[test]
fn categories_are_correct() {
    let r = global();
    assert!(matches!(r.lookup("var"), Some(DecoratorKind::Value(_))));
    assert!(matches!(r.lookup("env"), Some(DecoratorKind::Value(_))));
    assert!(matches!(r.lookup("cmd"), Some(DecoratorKind::Action(_))));
    for block in ["parallel", "timeout", "retry", "workdir", "debounce", "confirm"] {
        assert!(
            matches!(r.lookup(block), Some(DecoratorKind::Block(_))),
            "{block} should be a block decorator"
        );
    }
    for pattern in ["when", "try"] {
        assert!(
            matches!(r.lookup(pattern), Some(DecoratorKind::Pattern(_))),
            "{pattern} should be a pattern decorator"
        );
    }
}

#[test]
fn function_query_covers_value_and_action() {
    let r = global();
    assert!(r.is_function("var"));
    assert!(r.is_function("env"));
    assert!(r.is_function("cmd"));
    assert!(!r.is_function("timeout"));
    assert!(!r.is_function("try"));
}

#[test]
fn block_and_pattern_queries() {
    let r = global();
    assert!(r.is_block("parallel"));
    assert!(!r.is_block("when"));
    assert!(r.is_pattern("when"));
    assert!(!r.is_pattern("retry"));
}

#[test]
fn unknown_names_resolve_to_none() {
    assert!(global().lookup("bogus").is_none());
    assert!(!global().is_function("bogus"));
}

#[test]
fn metadata_is_present_for_every_decorator() {
    let r = global();
    for name in r.names() {
        let d = r.lookup(name).unwrap().common();
        assert_eq!(d.name(), name);
        assert!(!d.description().is_empty(), "{name} needs a description");
    }
}

#[test]
fn type_tags_match_categories() {
    let r = global();
    assert_eq!(r.lookup("var").unwrap().type_tag(), "value");
    assert_eq!(r.lookup("cmd").unwrap().type_tag(), "action");
    assert_eq!(r.lookup("timeout").unwrap().type_tag(), "block");
    assert_eq!(r.lookup("try").unwrap().type_tag(), "pattern");
}
