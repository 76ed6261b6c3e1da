// src/dag/cascade.rs

//! Cascading status propagation.
//!
//! A status change at one task can change the derived status of every task
//! that transitively depends on it. The propagator re-resolves exactly that
//! set, once per task, in an order where each task comes after all of its
//! dependencies inside the set (Kahn's algorithm restricted to the affected
//! region). Because the graph is acyclic this reaches the fixed point in a
//! single pass.
//!
//! Nothing here mutates the graph: every function returns the
//! [`StatusChanges`] the caller has to commit.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::dag::StatusChanges;
use crate::dag::graph::DagGraph;
use crate::dag::resolver::resolve_status;
use crate::errors::Result;
use crate::types::{TaskId, TaskStatus};

/// Statuses as they stand part-way through a cascade: the graph's committed
/// statuses overlaid with everything resolved so far.
struct StatusView<'a> {
    graph: &'a DagGraph,
    overlay: HashMap<TaskId, TaskStatus>,
}

impl<'a> StatusView<'a> {
    fn new(graph: &'a DagGraph) -> Self {
        Self {
            graph,
            overlay: HashMap::new(),
        }
    }

    fn status(&self, id: TaskId) -> Option<TaskStatus> {
        self.overlay
            .get(&id)
            .copied()
            .or_else(|| self.graph.status_of(id))
    }

    fn set(&mut self, id: TaskId, status: TaskStatus) {
        self.overlay.insert(id, status);
    }

    /// Resolve `id` against the current view of its direct dependencies.
    fn resolve(&self, id: TaskId) -> TaskStatus {
        let current = self.status(id).unwrap_or_default();
        let deps = self
            .graph
            .dependencies_of(id)
            .iter()
            .filter_map(|&dep| self.status(dep));
        resolve_status(current, deps)
    }

    /// Entries whose final status differs from the committed graph.
    fn into_changes(self) -> StatusChanges {
        let graph = self.graph;
        self.overlay
            .into_iter()
            .filter(|&(id, status)| graph.status_of(id) != Some(status))
            .collect()
    }
}

/// Set `task` to `new_status` and cascade through all of its dependents.
///
/// The origin takes `new_status` verbatim. The result holds every task,
/// origin included, whose status must change.
pub fn apply_status_change(
    graph: &DagGraph,
    task: TaskId,
    new_status: TaskStatus,
) -> Result<StatusChanges> {
    graph.ensure_task(task)?;
    Ok(propagate(graph, task, new_status))
}

/// Re-resolve `task` from its own dependencies, then cascade.
///
/// Used after the task's dependency set changed (an edge was added or
/// removed, or a dependency was deleted).
pub fn rederive(graph: &DagGraph, task: TaskId) -> Result<StatusChanges> {
    graph.ensure_task(task)?;
    let resolved = StatusView::new(graph).resolve(task);
    Ok(propagate(graph, task, resolved))
}

/// Resolve every task once, dependencies first, and return the difference
/// between the stored statuses and the resulting fixed point.
pub fn reconcile(graph: &DagGraph) -> StatusChanges {
    let order = match graph.topological_order() {
        Ok(order) => order,
        Err(task) => {
            warn!(task, "graph has a cycle; cannot reconcile");
            return StatusChanges::new();
        }
    };

    let mut view = StatusView::new(graph);
    for id in order {
        let resolved = view.resolve(id);
        view.set(id, resolved);
    }

    let changes = view.into_changes();
    debug!(changed = changes.len(), "reconciled task graph");
    changes
}

/// Core worklist pass shared by the entry points above.
fn propagate(graph: &DagGraph, origin: TaskId, origin_status: TaskStatus) -> StatusChanges {
    let affected = collect_dependents(graph, origin);

    // Number of dependencies of each affected task that still have to be
    // resolved in this pass. The origin counts as one of them.
    let mut waiting_on: HashMap<TaskId, usize> = affected
        .iter()
        .map(|&id| {
            let count = graph
                .dependencies_of(id)
                .iter()
                .filter(|&&dep| dep == origin || affected.contains(&dep))
                .count();
            (id, count)
        })
        .collect();

    let mut view = StatusView::new(graph);
    view.set(origin, origin_status);

    let mut queue: VecDeque<TaskId> = VecDeque::from([origin]);
    let mut resolved_count = 0usize;

    while let Some(id) = queue.pop_front() {
        for &dependent in graph.dependents_of(id) {
            let Some(remaining) = waiting_on.get_mut(&dependent) else {
                continue;
            };
            *remaining = remaining.saturating_sub(1);
            if *remaining > 0 {
                continue;
            }

            let before = view.status(dependent);
            let after = view.resolve(dependent);
            if before != Some(after) {
                debug!(
                    task = dependent,
                    from = ?before,
                    to = %after,
                    "cascade updated dependent status"
                );
            }
            view.set(dependent, after);
            resolved_count += 1;
            queue.push_back(dependent);
        }
    }

    debug!(
        origin,
        status = %origin_status,
        affected = affected.len(),
        resolved = resolved_count,
        "cascade finished"
    );

    view.into_changes()
}

/// Every task reachable from `origin` through dependents, excluding `origin`.
fn collect_dependents(graph: &DagGraph, origin: TaskId) -> HashSet<TaskId> {
    let mut stack: Vec<TaskId> = graph.dependents_of(origin).to_vec();
    let mut visited: HashSet<TaskId> = HashSet::new();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        stack.extend(graph.dependents_of(id).iter().copied());
    }

    visited
}
