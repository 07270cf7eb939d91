// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use devcmd_runtime::{PlanNode, ProcessEntry, ProcessStatus};

#[test]
fn renders_single_command_node() {
    let node = PlanNode::command("echo hi");
    let rendered = render_plan(&node);
    assert_eq!(rendered, "$ echo hi\n");
}

#[test]
fn renders_decorator_with_params_and_children() {
    let node = PlanNode::decorator("timeout")
        .with_type("block")
        .with_param("duration", "5s")
        .with_description("Cancel nested content after 5s")
        .add_child(PlanNode::command("sleep 10"));
    let rendered = render_plan(&node);
    assert!(rendered.starts_with("@timeout(duration=5s) [block]"));
    assert!(rendered.contains("Cancel nested content after 5s"));
    assert!(rendered.contains("└── $ sleep 10"));
}

#[test]
fn concurrent_children_are_annotated() {
    let node = PlanNode::decorator("parallel")
        .with_type("block")
        .concurrent()
        .add_child(PlanNode::command("task one"))
        .add_child(PlanNode::command("task two"));
    let rendered = render_plan(&node);
    assert_eq!(rendered.matches("(concurrent)").count(), 2);
    assert!(rendered.contains("├── $ task one (concurrent)"));
    assert!(rendered.contains("└── $ task two (concurrent)"));
}

#[test]
fn bracketed_pseudo_nodes_keep_their_names() {
    let node = PlanNode::decorator("try")
        .with_type("pattern")
        .add_child(PlanNode::command("run"))
        .add_child(
            PlanNode::decorator("[on error]")
                .with_type("conditional")
                .add_child(PlanNode::command("cleanup")),
        );
    let rendered = render_plan(&node);
    assert!(rendered.contains("[on error] [conditional]"));
    assert!(!rendered.contains("@[on error]"));
}

#[test]
fn empty_status_table() {
    assert_eq!(render_status(&[]), "No background processes running\n");
}

#[test]
fn status_table_lists_processes() {
    let entries = vec![ProcessEntry {
        name: "server".into(),
        pid: 4242,
        command: "node app.js".into(),
        start_time: Utc::now(),
        log_file: ".devcmd/server.log".into(),
        status: ProcessStatus::Running,
    }];
    let rendered = render_status(&entries);
    assert!(rendered.contains("NAME"));
    assert!(rendered.contains("server"));
    assert!(rendered.contains("4242"));
    assert!(rendered.contains("running"));
    assert!(rendered.contains("node app.js"));
}

#[test]
fn long_commands_are_truncated() {
    let entries = vec![ProcessEntry {
        name: "noisy".into(),
        pid: 1,
        command: "x".repeat(100),
        start_time: Utc::now(),
        log_file: ".devcmd/noisy.log".into(),
        status: ProcessStatus::Stopped,
    }];
    let rendered = render_status(&entries);
    assert!(rendered.contains("..."));
    assert!(!rendered.contains(&"x".repeat(50)));
}
