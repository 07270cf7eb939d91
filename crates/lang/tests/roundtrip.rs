// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AST round-trip property: rendering a parsed program to canonical
//! source and reparsing it yields the same AST.

#![allow(clippy::unwrap_used, clippy::panic)]

use devcmd_core::ast::CommandContent;
use devcmd_core::render;
use devcmd_lang::parse;

fn assert_roundtrip(source: &str) {
    let first = parse(source).unwrap_or_else(|e| panic!("initial parse failed:\n{e}"));
    let rendered = render(&first);
    let second = parse(&rendered)
        .unwrap_or_else(|e| panic!("reparse failed for rendered source:\n{rendered}\n{e}"));
    assert_eq!(
        first.normalized(),
        second.normalized(),
        "round-trip mismatch; rendered source was:\n{rendered}"
    );
}

#[test]
fn simple_commands_roundtrip() {
    assert_roundtrip("build: echo hi");
    assert_roundtrip("build: cc -o out main.c && ./out");
}

#[test]
fn variables_roundtrip() {
    assert_roundtrip("var SRC = \"./src\"\nvar PORT = 8080\nvar WAIT = 500ms\nvar ON = true\nrun: echo");
}

#[test]
fn var_groups_roundtrip() {
    assert_roundtrip("var (\n    A = 1\n    B = \"two\"\n)\nrun: echo @var(A)");
}

#[test]
fn inline_decorators_roundtrip() {
    assert_roundtrip("copy: cp @var(SRC)/*.go dst/");
    assert_roundtrip("deploy: kubectl use @env(\"KUBE\", \"dev\")");
}

#[test]
fn block_bodies_roundtrip() {
    assert_roundtrip("multi: {\n    echo one\n    echo two\n}");
}

#[test]
fn block_decorators_roundtrip() {
    assert_roundtrip("deploy: @timeout(30s) {\n    kubectl apply -f k8s/\n}");
    assert_roundtrip("flaky: @retry(attempts = 3, delay = 1s) {\n    curl api\n}");
    assert_roundtrip(
        r#"par: @parallel { @workdir("a"){ pwd > r.txt }; @workdir("b"){ pwd > r.txt } }"#,
    );
}

#[test]
fn pattern_decorators_roundtrip() {
    assert_roundtrip("safe: @try { main: run; catch: cleanup; finally: notify }");
    assert_roundtrip("deploy: @when(ENV) { prod: ship; staging: stage; default: dev }");
}

#[test]
fn watch_stop_roundtrip() {
    assert_roundtrip("watch server: node app.js\nstop server: pkill node");
}

#[test]
fn whole_program_roundtrip() {
    assert_roundtrip(
        r#"var SRC = "./src"
var RETRIES = 3

build: cc @var(SRC)/main.c -o out

test: {
    ./out --self-test
    echo "tests passed"
}

deploy: @timeout(5m) {
    @retry(3, 2s) {
        kubectl apply -f k8s/
    }
}

safe: @try {
    main: ./deploy.sh
    catch: ./rollback.sh
    finally: echo done
}

watch server: node app.js
stop server: pkill -f app.js
"#,
    );
}

#[test]
fn rendering_is_stable_after_one_pass() {
    // render ∘ parse is idempotent: a second render changes nothing.
    let source = "deploy: @timeout(30s) {\n    kubectl apply -f k8s/\n}";
    let first = parse(source).unwrap();
    let rendered = render(&first);
    let second = parse(&rendered).unwrap();
    assert_eq!(rendered, render(&second));
}

#[test]
fn extraction_is_idempotent() {
    let program = parse("copy: cp @var(SRC)/*.go dst/ && echo @env(\"DONE\", \"yes\")").unwrap();
    let CommandContent::Shell(shell) = &program.commands[0].body.content[0] else {
        panic!("expected shell content");
    };
    let recomposed = shell.recompose();
    assert_eq!(recomposed, "cp @var(SRC)/*.go dst/ && echo @env(\"DONE\", \"yes\")");

    // Reparsing the recomposed text through a fresh source yields the
    // same parts.
    let again = parse(&format!("copy: {recomposed}")).unwrap();
    assert_eq!(program.normalized(), again.normalized());
}
