// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::*;
use devcmd_core::ast::CommandKind;
use devcmd_core::value::Expr;

fn file<'a>(tree: &'a GeneratedTree, path: &str) -> &'a str {
    &tree
        .files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("missing generated file {path}"))
        .contents
}

#[test]
fn generation_is_deterministic() {
    let program = program(
        vec![("SRC", Expr::Str("./src".into()))],
        vec![
            cmd("build", CommandKind::Regular, vec![shell_text("make all")]),
            cmd(
                "deploy",
                CommandKind::Regular,
                vec![block(
                    "timeout",
                    vec![arg("duration", Expr::Duration("5s".into()))],
                    vec![shell_text("kubectl apply -f k8s/")],
                )],
            ),
            cmd("server", CommandKind::Watch, vec![shell_text("node app.js")]),
            cmd("server", CommandKind::Stop, vec![shell_text("pkill node")]),
        ],
    );

    let first = generate(&program, "testcli").unwrap();
    let second = generate(&program, "testcli").unwrap();
    assert_eq!(first, second);
}

#[test]
fn simple_program_emits_two_files() {
    let program = program(
        vec![],
        vec![cmd("build", CommandKind::Regular, vec![shell_text("make")])],
    );
    let tree = generate(&program, "testcli").unwrap();
    let paths: Vec<_> = tree.files.iter().map(|f| f.path).collect();
    assert_eq!(paths, vec!["Cargo.toml", "src/main.rs"]);
}

#[test]
fn watch_commands_add_the_registry_module() {
    let program = program(
        vec![],
        vec![cmd(
            "server",
            CommandKind::Watch,
            vec![shell_text("node app.js")],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let paths: Vec<_> = tree.files.iter().map(|f| f.path).collect();
    assert_eq!(paths, vec!["Cargo.toml", "src/main.rs", "src/registry.rs"]);

    let main_rs = file(&tree, "src/main.rs");
    assert!(main_rs.contains("mod registry;"));
    assert!(main_rs.contains("\"status\" => registry::show_status()"));
    assert!(main_rs.contains("\"logs\" => registry::show_logs(args)"));

    let cargo = file(&tree, "Cargo.toml");
    assert!(cargo.contains("serde ="));
    assert!(cargo.contains("serde_json ="));
    assert!(cargo.contains("chrono ="));
}

#[test]
fn variables_inline_as_literals() {
    let program = program(
        vec![("SRC", Expr::Str("./src".into()))],
        vec![cmd(
            "copy",
            CommandKind::Regular,
            vec![shell_parts(vec![
                text("cp "),
                inline("var", vec![arg("name", Expr::Ident("SRC".into()))]),
                text("/a dst/"),
            ])],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    assert!(file(&tree, "src/main.rs").contains("cp ./src/a dst/"));
}

#[test]
fn env_lookups_stay_runtime_expressions() {
    let program = program(
        vec![],
        vec![cmd(
            "ctx",
            CommandKind::Regular,
            vec![shell_parts(vec![
                text("kubectl use "),
                inline(
                    "env",
                    vec![
                        arg("key", Expr::Str("KUBE".into())),
                        arg("default", Expr::Str("dev".into())),
                    ],
                ),
            ])],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    assert!(main_rs.contains("env_or(\"KUBE\", Some(\"dev\"))?"));
    assert!(main_rs.contains("format!("));
    // The emitted helper falls back on empty values, like the interpreter.
    assert!(main_rs.contains("Ok(value) if !value.is_empty() => Ok(value)"));
}

#[test]
fn command_groups_and_dispatch_are_sorted() {
    let program = program(
        vec![],
        vec![
            cmd("zeta", CommandKind::Regular, vec![shell_text("true")]),
            cmd("alpha", CommandKind::Regular, vec![shell_text("true")]),
            cmd("mid", CommandKind::Regular, vec![shell_text("true")]),
        ],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    let alpha = main_rs.find("\"alpha\" => run_alpha(args),").unwrap();
    let mid = main_rs.find("\"mid\" => run_mid(args),").unwrap();
    let zeta = main_rs.find("\"zeta\" => run_zeta(args),").unwrap();
    assert!(alpha < mid && mid < zeta);
}

#[test]
fn timeout_scaffold_declares_its_imports() {
    let program = program(
        vec![],
        vec![cmd(
            "slow",
            CommandKind::Regular,
            vec![block(
                "timeout",
                vec![arg("duration", Expr::Duration("5s".into()))],
                vec![shell_text("sleep 10")],
            )],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    // ImportRequirements are a superset of what the emitted code uses.
    assert!(main_rs.contains("use std::time::Duration;"));
    assert!(main_rs.contains("recv_timeout(Duration::from_millis(5000))"));
    assert!(main_rs.contains("timed out after 5s"));
}

#[test]
fn retry_scaffold_loops_with_attempt_bound() {
    let program = program(
        vec![],
        vec![cmd(
            "flaky",
            CommandKind::Regular,
            vec![block(
                "retry",
                vec![
                    arg("attempts", Expr::Number("3".into())),
                    arg("delay", Expr::Duration("250ms".into())),
                ],
                vec![shell_text("curl api")],
            )],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    assert!(main_rs.contains(">= 3 => return Err(e)"));
    assert!(main_rs.contains("std::thread::sleep(Duration::from_millis(250))"));
}

#[test]
fn try_scaffold_orders_error_precedence() {
    let program = program(
        vec![],
        vec![cmd(
            "safe",
            CommandKind::Regular,
            vec![pattern(
                "try",
                vec![],
                vec![
                    branch("main", vec![shell_text("run")]),
                    branch("catch", vec![shell_text("cleanup")]),
                    branch("finally", vec![shell_text("notify")]),
                ],
            )],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");

    // After the finally block runs, errors surface main > catch > finally.
    let tail = &main_rs[main_rs.find("let __finally_").unwrap()..];
    let main_q = tail.find("__main_").unwrap();
    let catch_q = tail.find("__catch_").unwrap();
    let finally_q = tail.rfind("__finally_").unwrap();
    assert!(main_q < catch_q && catch_q < finally_q);
}

#[test]
fn when_scaffold_is_a_match_with_error_fallback() {
    let program = program(
        vec![("ENV", Expr::Str("prod".into()))],
        vec![cmd(
            "deploy",
            CommandKind::Regular,
            vec![pattern(
                "when",
                vec![arg("value", Expr::Ident("ENV".into()))],
                vec![branch("prod", vec![shell_text("deploy prod")])],
            )],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    assert!(main_rs.contains("match \"prod\""));
    assert!(main_rs.contains("no branch matched value"));
}

#[test]
fn watch_stop_pair_runs_custom_stop_then_registry_stop() {
    let program = program(
        vec![],
        vec![
            cmd("server", CommandKind::Watch, vec![shell_text("node app.js")]),
            cmd("server", CommandKind::Stop, vec![shell_text("npm run stop")]),
        ],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");
    assert!(main_rs.contains("registry::start_background(\"server\", \"node app.js\")?;"));
    let custom = main_rs.find("npm run stop").unwrap();
    let graceful = main_rs.find("registry::graceful_stop(\"server\")?;").unwrap();
    assert!(custom < graceful);
}

#[test]
fn generated_tree_writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let program = program(
        vec![],
        vec![cmd("build", CommandKind::Regular, vec![shell_text("make")])],
    );
    let tree = generate(&program, "testcli").unwrap();
    tree.write_to(dir.path()).unwrap();
    assert!(dir.path().join("Cargo.toml").is_file());
    assert!(dir.path().join("src/main.rs").is_file());
}

#[test]
fn parallel_branch_temp_names_do_not_collide() {
    let program = program(
        vec![],
        vec![cmd(
            "par",
            CommandKind::Regular,
            vec![block(
                "parallel",
                vec![],
                vec![
                    block(
                        "retry",
                        vec![arg("attempts", Expr::Number("2".into()))],
                        vec![shell_text("one")],
                    ),
                    block(
                        "retry",
                        vec![arg("attempts", Expr::Number("2".into()))],
                        vec![shell_text("two")],
                    ),
                ],
            )],
        )],
    );
    let tree = generate(&program, "testcli").unwrap();
    let main_rs = file(&tree, "src/main.rs");

    // Each branch's retry counter lives in its own 1000-name window.
    let counters: Vec<&str> = main_rs
        .match_indices("let mut __attempt_")
        .filter_map(|(i, _)| main_rs[i + "let mut ".len()..].split_whitespace().next())
        .collect();
    assert_eq!(counters.len(), 2);
    assert_ne!(counters[0], counters[1]);
}
