// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal rendering of plan trees and the status table.

use devcmd_runtime::process::ProcessEntry;
use devcmd_runtime::{PlanKind, PlanNode};
use std::fmt::Write as _;

/// Render a plan tree for terminal display.
pub fn render_plan(root: &PlanNode) -> String {
    let mut out = String::new();
    render_node(&mut out, root, "", true, false);
    out
}

fn node_label(node: &PlanNode) -> String {
    match node.kind {
        PlanKind::Command => format!("$ {}", node.name),
        PlanKind::Decorator => {
            let mut label = if node.name.starts_with('[') {
                node.name.clone()
            } else {
                format!("@{}", node.name)
            };
            if !node.params.is_empty() {
                let params = node
                    .params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = write!(label, "({params})");
            }
            if let Some(tag) = node.type_tag {
                let _ = write!(label, " [{tag}]");
            }
            label
        }
    }
}

fn render_node(out: &mut String, node: &PlanNode, prefix: &str, is_last: bool, concurrent: bool) {
    let connector = if prefix.is_empty() {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = node_label(node);
    if concurrent {
        line.push_str(" (concurrent)");
    }
    if !node.description.is_empty() && node.kind == PlanKind::Decorator {
        let _ = write!(line, "  - {}", node.description);
    }
    let _ = writeln!(out, "{prefix}{connector}{line}");

    let child_prefix = if prefix.is_empty() {
        "  ".to_string()
    } else if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == count, node.concurrent);
    }
}

/// Render the background process status table.
pub fn render_status(entries: &[ProcessEntry]) -> String {
    if entries.is_empty() {
        return "No background processes running\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:<8} {:<10} {:<20} COMMAND",
        "NAME", "PID", "STATUS", "STARTED"
    );
    for entry in entries {
        let started = entry.start_time.format("%H:%M:%S").to_string();
        let mut command = entry.command.clone();
        if command.len() > 40 {
            command.truncate(37);
            command.push_str("...");
        }
        let _ = writeln!(
            out,
            "{:<15} {:<8} {:<10} {:<20} {}",
            entry.name,
            entry.pid,
            match entry.status {
                devcmd_runtime::ProcessStatus::Running => "running",
                devcmd_runtime::ProcessStatus::Stopped => "stopped",
            },
            started,
            command
        );
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
