// src/report.rs

//! Human-readable and TOML output for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::GraphFile;
use crate::dag::StatusChanges;
use crate::engine::TaskGraphEngine;
use crate::types::{TaskId, TaskStatus};

/// One line per changed task, or a note that nothing changed.
pub fn format_changes(changes: &StatusChanges) -> String {
    if changes.is_empty() {
        return "no status changes\n".to_string();
    }

    let mut out = String::new();
    for (id, status) in changes {
        let _ = writeln!(out, "  task {id}: {status}");
    }
    out
}

/// Task listing for `show`, ascending by id.
pub fn format_tasks(engine: &TaskGraphEngine, file: &GraphFile) -> String {
    let graph = engine.graph();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "tasks ({}), dependencies ({}):",
        graph.len(),
        graph.edge_count()
    );
    for id in graph.tasks() {
        let status = graph.status_of(id).unwrap_or_default();
        let title = file.task(id).map(|t| t.title.as_str()).unwrap_or("");
        let _ = writeln!(out, "  - #{id} [{status}] {title}");
        if !graph.dependencies_of(id).is_empty() {
            let _ = writeln!(out, "      depends on: {:?}", graph.dependencies_of(id));
        }
        if !graph.dependents_of(id).is_empty() {
            let _ = writeln!(out, "      required by: {:?}", graph.dependents_of(id));
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct GraphExport<'a> {
    nodes: Vec<NodeExport<'a>>,
    edges: Vec<EdgeExport>,
}

#[derive(Debug, Serialize)]
struct NodeExport<'a> {
    id: TaskId,
    title: &'a str,
    status: TaskStatus,
}

/// `from` depends on `to`.
#[derive(Debug, Serialize)]
struct EdgeExport {
    from: TaskId,
    to: TaskId,
}

/// Nodes and edges of the graph as TOML, for drawing tools.
pub fn export_graph(engine: &TaskGraphEngine, file: &GraphFile) -> crate::errors::Result<String> {
    let graph = engine.graph();
    let export = GraphExport {
        nodes: graph
            .tasks()
            .map(|id| NodeExport {
                id,
                title: file.task(id).map(|t| t.title.as_str()).unwrap_or(""),
                status: graph.status_of(id).unwrap_or_default(),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(from, to)| EdgeExport { from, to })
            .collect(),
    };
    Ok(toml::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_say_so() {
        assert_eq!(format_changes(&StatusChanges::new()), "no status changes\n");
    }

    #[test]
    fn changes_are_listed_by_id() {
        let changes = StatusChanges::from([(4, TaskStatus::Blocked), (1, TaskStatus::Blocked)]);
        assert_eq!(
            format_changes(&changes),
            "  task 1: blocked\n  task 4: blocked\n"
        );
    }
}
