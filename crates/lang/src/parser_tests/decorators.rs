// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inline decorator extraction and decorator argument parsing.

use super::*;

#[test]
fn simple_var_reference() {
    assert_eq!(
        parse_ok("build: cd @var(SRC)"),
        program(vec![simple_cmd(
            "build",
            vec![text("cd "), at("var", vec![pos("name", ident("SRC"))])]
        )])
    );
}

#[test]
fn multiple_var_references() {
    assert_eq!(
        parse_ok("deploy: docker build -t @var(IMAGE):@var(TAG)"),
        program(vec![simple_cmd(
            "deploy",
            vec![
                text("docker build -t "),
                at("var", vec![pos("name", ident("IMAGE"))]),
                text(":"),
                at("var", vec![pos("name", ident("TAG"))]),
            ]
        )])
    );
}

#[test]
fn var_in_quoted_string() {
    assert_eq!(
        parse_ok("echo: echo \"Building @var(PROJECT) version @var(VERSION)\""),
        program(vec![simple_cmd(
            "echo",
            vec![
                text("echo \"Building "),
                at("var", vec![pos("name", ident("PROJECT"))]),
                text(" version "),
                at("var", vec![pos("name", ident("VERSION"))]),
                text("\""),
            ]
        )])
    );
}

#[test]
fn shell_dollar_variables_are_not_extracted() {
    assert_eq!(
        parse_ok("info: echo \"Project: @var(NAME), User: $USER\""),
        program(vec![simple_cmd(
            "info",
            vec![
                text("echo \"Project: "),
                at("var", vec![pos("name", ident("NAME"))]),
                text(", User: $USER\""),
            ]
        )])
    );
}

#[test]
fn var_in_file_paths() {
    assert_eq!(
        parse_ok("copy: cp @var(SRC)/*.go @var(DEST)/"),
        program(vec![simple_cmd(
            "copy",
            vec![
                text("cp "),
                at("var", vec![pos("name", ident("SRC"))]),
                text("/*.go "),
                at("var", vec![pos("name", ident("DEST"))]),
                text("/"),
            ]
        )])
    );
}

#[test]
fn env_with_string_key() {
    assert_eq!(
        parse_ok("deploy: kubectl config use-context @env(\"KUBE_CONTEXT\")"),
        program(vec![simple_cmd(
            "deploy",
            vec![
                text("kubectl config use-context "),
                at("env", vec![pos("key", s("KUBE_CONTEXT"))]),
            ]
        )])
    );
}

#[test]
fn env_with_default() {
    assert_eq!(
        parse_ok("serve: serve --port @env(\"PORT\", \"8080\")"),
        program(vec![simple_cmd(
            "serve",
            vec![
                text("serve --port "),
                at(
                    "env",
                    vec![pos("key", s("PORT")), pos("default", s("8080"))]
                ),
            ]
        )])
    );
}

#[test]
fn unknown_inline_decorator_stays_text() {
    assert_eq!(
        parse_ok("ssh: ssh user@host(1) ls"),
        program(vec![simple_cmd("ssh", vec![text("ssh user@host(1) ls")])])
    );
}

#[test]
fn ill_formed_inline_call_stays_text() {
    // Missing closing paren: not extracted, kept as shell text.
    assert_eq!(
        parse_ok("odd: echo \"@var(SRC\""),
        program(vec![simple_cmd("odd", vec![text("echo \"@var(SRC\"")])])
    );
}

#[test]
fn extraction_recomposes_original_text() {
    let parsed = parse_ok("copy: cp @var(SRC)/*.go dst/");
    let CommandContent::Shell(shell) = &parsed.commands[0].body.content[0] else {
        panic!("expected shell content");
    };
    assert_eq!(shell.recompose(), "cp @var(SRC)/*.go dst/");
}

#[test]
fn named_decorator_arguments() {
    let parsed = parse_ok("flaky: @retry(attempts = 3, delay = 1s) { npm test }");
    let CommandContent::Block(block) = &parsed.commands[0].body.content[0] else {
        panic!("expected block decorator");
    };
    assert_eq!(block.args.len(), 2);
    assert!(block.args.iter().all(|a| a.explicit));
    assert_eq!(block.args[0].name, "attempts");
    assert_eq!(block.args[0].value, Expr::Number("3".into()));
    assert_eq!(block.args[1].name, "delay");
    assert_eq!(block.args[1].value, Expr::Duration("1s".into()));
}

#[test]
fn positional_arguments_bind_to_schema_names() {
    let parsed = parse_ok("flaky: @retry(3, 1s) { npm test }");
    let CommandContent::Block(block) = &parsed.commands[0].body.content[0] else {
        panic!("expected block decorator");
    };
    assert_eq!(block.args[0].name, "attempts");
    assert!(!block.args[0].explicit);
    assert_eq!(block.args[1].name, "delay");
}

#[test]
fn confirm_block_decorator() {
    let parsed = parse_ok("danger: @confirm(\"Are you sure?\") { rm -rf /tmp/x }");
    assert_eq!(
        parsed,
        program(vec![block_cmd(
            "danger",
            vec![block_deco(
                "confirm",
                vec![pos("message", s("Are you sure?"))],
                vec![shell(vec![text("rm -rf /tmp/x")])],
            )]
        )])
    );
}

#[test]
fn nested_block_decorators() {
    let parsed = parse_ok(
        "guarded: @timeout(duration=5s) {\n    @retry(attempts=3, delay=1s) {\n        curl api\n    }\n}",
    );
    let CommandContent::Block(outer) = &parsed.commands[0].body.content[0] else {
        panic!("expected block decorator");
    };
    assert_eq!(outer.name, "timeout");
    let CommandContent::Block(inner) = &outer.content[0] else {
        panic!("expected nested block decorator");
    };
    assert_eq!(inner.name, "retry");
    assert_eq!(inner.content.len(), 1);
}

#[test]
fn parallel_with_workdir_branches() {
    let parsed = parse_ok(
        r#"par: @parallel { @workdir("a"){ pwd > r.txt }; @workdir("b"){ pwd > r.txt } }"#,
    );
    let CommandContent::Block(par) = &parsed.commands[0].body.content[0] else {
        panic!("expected block decorator");
    };
    assert_eq!(par.name, "parallel");
    assert_eq!(par.content.len(), 2);
    for (item, dir) in par.content.iter().zip(["a", "b"]) {
        let CommandContent::Block(wd) = item else {
            panic!("expected workdir branch");
        };
        assert_eq!(wd.name, "workdir");
        assert_eq!(wd.args[0].value, Expr::Str(dir.into()));
    }
}
