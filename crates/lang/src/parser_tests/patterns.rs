// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern decorator parsing and pattern-schema validation.

use super::*;
use devcmd_core::ast::Pattern;

#[test]
fn try_with_all_branches() {
    let parsed = parse_ok("safe: @try {\n    main: run\n    catch: cleanup\n    finally: notify\n}");
    assert_eq!(
        parsed,
        program(vec![block_cmd(
            "safe",
            vec![pattern_deco(
                "try",
                vec![],
                vec![
                    branch(
                        Pattern::Identifier("main".into()),
                        vec![shell(vec![text("run")])]
                    ),
                    branch(
                        Pattern::Identifier("catch".into()),
                        vec![shell(vec![text("cleanup")])]
                    ),
                    branch(
                        Pattern::Identifier("finally".into()),
                        vec![shell(vec![text("notify")])]
                    ),
                ],
            )]
        )])
    );
}

#[test]
fn try_single_line_matches_multi_line() {
    assert_eq!(
        parse_ok("safe: @try { main: run; catch: cleanup; finally: notify }"),
        parse_ok("safe: @try {\n    main: run\n    catch: cleanup\n    finally: notify\n}"),
    );
}

#[test]
fn when_with_identifier_branches_and_default() {
    let parsed = parse_ok("deploy: @when(ENV) { prod: deploy-prod; default: deploy-dev }");
    let CommandContent::Pattern(when) = &parsed.commands[0].body.content[0] else {
        panic!("expected pattern decorator");
    };
    assert_eq!(when.name, "when");
    assert_eq!(when.args[0].value, ident("ENV"));
    assert_eq!(when.branches.len(), 2);
    assert_eq!(when.branches[0].pattern, Pattern::Identifier("prod".into()));
    assert_eq!(when.branches[1].pattern, Pattern::Wildcard);
}

#[test]
fn branch_with_block_of_commands() {
    let parsed = parse_ok("safe: @try {\n    main: {\n        step one\n        step two\n    }\n    catch: cleanup\n}");
    let CommandContent::Pattern(try_) = &parsed.commands[0].body.content[0] else {
        panic!("expected pattern decorator");
    };
    assert_eq!(try_.branches[0].commands.len(), 2);
}

#[test]
fn branch_with_nested_decorator() {
    let parsed =
        parse_ok("safe: @try {\n    main: @timeout(5s) {\n        slow op\n    }\n    finally: cleanup\n}");
    let CommandContent::Pattern(try_) = &parsed.commands[0].body.content[0] else {
        panic!("expected pattern decorator");
    };
    let CommandContent::Block(inner) = &try_.branches[0].commands[0] else {
        panic!("expected nested block decorator");
    };
    assert_eq!(inner.name, "timeout");
}

#[test]
fn try_rejects_unknown_branch() {
    let report = parse("safe: @try { main: run; cleanup: x }").unwrap_err();
    assert!(report.to_string().contains("does not accept pattern"));
}

#[test]
fn try_requires_main() {
    let report = parse("safe: @try { catch: cleanup }").unwrap_err();
    assert!(report.to_string().contains("requires a 'main' branch"));
}

#[test]
fn try_requires_catch_or_finally() {
    let report = parse("safe: @try { main: run }").unwrap_err();
    assert!(report
        .to_string()
        .contains("requires at least one of: catch, finally"));
}

#[test]
fn try_rejects_default_wildcard() {
    let report = parse("safe: @try { main: run; default: x }").unwrap_err();
    assert!(report.to_string().contains("does not accept pattern"));
}

#[test]
fn when_accepts_arbitrary_identifiers() {
    let parsed = parse_ok("go: @when(TARGET) { linux: make linux; darwin: make mac; windows: make win }");
    let CommandContent::Pattern(when) = &parsed.commands[0].body.content[0] else {
        panic!("expected pattern decorator");
    };
    assert_eq!(when.branches.len(), 3);
}

#[test]
fn duplicate_branch_is_rejected() {
    let report = parse("go: @when(E) { prod: a; prod: b }").unwrap_err();
    assert!(report.to_string().contains("appears more than once"));
}

#[test]
fn pattern_sugar_matches_wrapped_form() {
    assert_eq!(
        parse_ok("safe: @try { main: run; catch: cleanup }"),
        parse_ok("safe: { @try { main: run; catch: cleanup } }"),
    );
}
