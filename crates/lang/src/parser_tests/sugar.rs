// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Syntax-sugar normalization: equivalent source forms must produce
//! identical ASTs.

use super::*;

#[test]
fn simple_and_braced_forms_are_identical() {
    assert_eq!(parse_ok("build: echo hi"), parse_ok("build: { echo hi }"));
}

#[test]
fn simple_form_is_canonical() {
    let parsed = parse_ok("build: { echo hi }");
    assert!(!parsed.commands[0].body.braced);
    assert_eq!(
        parsed,
        program(vec![simple_cmd("build", vec![text("echo hi")])])
    );
}

#[test]
fn decorated_sugar_matches_wrapped_form() {
    assert_eq!(
        parse_ok("deploy: @timeout(5s) { sleep 10 }"),
        parse_ok("deploy: { @timeout(5s) { sleep 10 } }")
    );
}

#[test]
fn decorated_sugar_shape() {
    let program = parse_ok("deploy: @timeout(5s) { sleep 10 }");
    let expected = super::program(vec![block_cmd(
        "deploy",
        vec![block_deco(
            "timeout",
            vec![pos("duration", Expr::Duration("5s".into()))],
            vec![shell(vec![text("sleep 10")])],
        )],
    )]);
    assert_eq!(program, expected);
}

#[test]
fn function_decorator_sugar_matches_braced_form() {
    assert_eq!(parse_ok("go: @cmd(\"build\")"), parse_ok("go: { @cmd(\"build\") }"));
}

#[test]
fn function_decorator_sugar_is_simple_form() {
    let program = parse_ok("go: @cmd(\"build\")");
    assert!(!program.commands[0].body.braced);
    assert_eq!(
        program,
        super::program(vec![simple_cmd(
            "go",
            vec![at("cmd", vec![pos("name", s("build"))])]
        )])
    );
}

#[test]
fn multi_item_block_keeps_braces() {
    let program = parse_ok("build: {\n    echo one\n    echo two\n}");
    assert!(program.commands[0].body.braced);
    assert_eq!(
        program,
        super::program(vec![block_cmd(
            "build",
            vec![
                shell(vec![text("echo one")]),
                shell(vec![text("echo two")]),
            ]
        )])
    );
}

#[test]
fn consecutive_shell_lines_stay_separate_items() {
    let program = parse_ok("b: {\n    echo a\n    echo b\n    echo c\n}");
    assert_eq!(program.commands[0].body.content.len(), 3);
}

#[test]
fn single_line_block_with_semicolons_is_one_item() {
    // Shell `;` inside a running line is plain shell syntax.
    let program = parse_ok("build: { cd src; make all }");
    assert_eq!(
        program,
        super::program(vec![simple_cmd("build", vec![text("cd src; make all")])])
    );
}

#[test]
fn empty_block_body_is_legal() {
    let program = parse_ok("nothing: { }");
    assert!(program.commands[0].body.content.is_empty());
}

#[test]
fn sugar_function_decorator_with_adjacent_text() {
    // No gap between the call and the following text.
    let program = parse_ok("copy: @var(SRC)/main.go");
    assert_eq!(
        program,
        super::program(vec![simple_cmd(
            "copy",
            vec![at("var", vec![pos("name", ident("SRC"))]), text("/main.go")]
        )])
    );
}

#[test]
fn sugar_function_decorator_with_separated_text() {
    let program = parse_ok("run: @cmd(\"build\") && echo done");
    assert_eq!(
        program,
        super::program(vec![simple_cmd(
            "run",
            vec![
                at("cmd", vec![pos("name", s("build"))]),
                text(" "),
                text("&& echo done"),
            ]
        )])
    );
}
