// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::cycle::propose_edge;
use crate::dag::StatusChanges;
use crate::errors::{Result, TaskdagError};
use crate::types::{TaskId, TaskStatus};

/// Internal node structure: stores status plus immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    status: TaskStatus,
    /// Direct dependencies: tasks this one requires, in insertion order.
    deps: Vec<TaskId>,
    /// Direct dependents: tasks that require this one, in insertion order.
    dependents: Vec<TaskId>,
}

impl DagNode {
    fn new(status: TaskStatus) -> Self {
        Self {
            status,
            deps: Vec::new(),
            dependents: Vec::new(),
        }
    }
}

/// In-memory task graph keyed by [`TaskId`].
///
/// Edges are stored twice, once in each direction, so both
/// [`dependencies_of`](Self::dependencies_of) and
/// [`dependents_of`](Self::dependents_of) are a single map lookup.
///
/// The only way to add an edge from outside the crate is
/// [`add_dependency`](Self::add_dependency), which runs the cycle check first,
/// so a `DagGraph` is acyclic in every observable state.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    nodes: BTreeMap<TaskId, DagNode>,
}

impl DagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(id, status)` pairs and `(dependent, dependency)`
    /// edges without admission checks.
    ///
    /// Callers must have validated the input already (see
    /// `config::validate`); edges with unknown endpoints are skipped.
    pub(crate) fn from_parts_unchecked<T, E>(tasks: T, edges: E) -> Self
    where
        T: IntoIterator<Item = (TaskId, TaskStatus)>,
        E: IntoIterator<Item = (TaskId, TaskId)>,
    {
        let mut graph = Self {
            nodes: tasks
                .into_iter()
                .map(|(id, status)| (id, DagNode::new(status)))
                .collect(),
        };

        for (dependent, dependency) in edges {
            if graph.contains(dependent) && graph.contains(dependency) {
                graph.insert_edge_unchecked(dependent, dependency);
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All task ids, ascending.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.nodes.get(&id).map(|n| n.status)
    }

    /// Immediate dependencies of a task (the tasks it points to).
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks pointing to it).
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_edge(&self, dependent: TaskId, dependency: TaskId) -> bool {
        self.dependencies_of(dependent).contains(&dependency)
    }

    /// Every `(dependent, dependency)` edge, grouped by ascending dependent.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, TaskId)> + '_ {
        self.nodes
            .iter()
            .flat_map(|(&id, node)| node.deps.iter().map(move |&dep| (id, dep)))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.deps.len()).sum()
    }

    /// Add a node with no edges. Returns `false` if the id was already present.
    pub fn add_task(&mut self, id: TaskId, status: TaskStatus) -> bool {
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.insert(id, DagNode::new(status));
        true
    }

    /// Remove a node and every edge that references it.
    ///
    /// Returns the removed node's former dependents, or `None` if the id was
    /// unknown.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Vec<TaskId>> {
        let node = self.nodes.remove(&id)?;

        for dep in &node.deps {
            if let Some(dep_node) = self.nodes.get_mut(dep) {
                dep_node.dependents.retain(|&d| d != id);
            }
        }
        for dependent in &node.dependents {
            if let Some(dependent_node) = self.nodes.get_mut(dependent) {
                dependent_node.deps.retain(|&d| d != id);
            }
        }

        debug!(
            task = id,
            dropped_edges = node.deps.len() + node.dependents.len(),
            "removed task from graph"
        );
        Some(node.dependents)
    }

    /// Admission-checked edge insertion.
    ///
    /// The edge is inserted only if [`propose_edge`] accepts it and both
    /// endpoints exist. Rejections from the proposal take precedence, so a
    /// self-dependency is reported as such even for an unknown id.
    pub fn add_dependency(&mut self, dependent: TaskId, dependency: TaskId) -> Result<()> {
        propose_edge(self, dependent, dependency)?;
        self.ensure_task(dependent)?;
        self.ensure_task(dependency)?;
        self.insert_edge_unchecked(dependent, dependency);
        Ok(())
    }

    /// Remove an edge. Returns `false` if it did not exist.
    pub fn remove_dependency(&mut self, dependent: TaskId, dependency: TaskId) -> bool {
        if !self.has_edge(dependent, dependency) {
            return false;
        }
        if let Some(node) = self.nodes.get_mut(&dependent) {
            node.deps.retain(|&d| d != dependency);
        }
        if let Some(node) = self.nodes.get_mut(&dependency) {
            node.dependents.retain(|&d| d != dependent);
        }
        true
    }

    /// Commit a batch of derived statuses. Unknown ids are ignored.
    pub fn apply(&mut self, changes: &StatusChanges) {
        for (&id, &status) in changes {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.status = status;
            }
        }
    }

    /// Task ids ordered so every dependency precedes its dependents.
    ///
    /// Ties are broken by petgraph's traversal; the order is only meaningful
    /// as a topological order. On a cycle, returns the id of a task on it.
    pub fn topological_order(&self) -> std::result::Result<Vec<TaskId>, TaskId> {
        // Edge direction: dependency -> dependent.
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();

        for id in self.tasks() {
            graph.add_node(id);
        }
        for (dependent, dependency) in self.edges() {
            graph.add_edge(dependency, dependent, ());
        }

        toposort(&graph, None).map_err(|cycle| cycle.node_id())
    }

    pub(crate) fn ensure_task(&self, id: TaskId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TaskdagError::TaskNotFound(id))
        }
    }

    fn insert_edge_unchecked(&mut self, dependent: TaskId, dependency: TaskId) {
        if let Some(node) = self.nodes.get_mut(&dependent) {
            if node.deps.contains(&dependency) {
                return;
            }
            node.deps.push(dependency);
        }
        if let Some(node) = self.nodes.get_mut(&dependency) {
            node.dependents.push(dependent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DependencyError;

    fn chain() -> DagGraph {
        // 3 -> 2 -> 1
        DagGraph::from_parts_unchecked(
            [
                (1, TaskStatus::Pending),
                (2, TaskStatus::Pending),
                (3, TaskStatus::Pending),
            ],
            [(2, 1), (3, 2)],
        )
    }

    #[test]
    fn lookups_work_in_both_directions() {
        let g = chain();
        assert_eq!(g.dependencies_of(2), &[1]);
        assert_eq!(g.dependents_of(2), &[3]);
        assert!(g.dependencies_of(1).is_empty());
        assert!(g.dependents_of(3).is_empty());
        assert!(g.dependencies_of(42).is_empty());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn neighbours_keep_insertion_order() {
        let mut g = DagGraph::new();
        for id in [1, 2, 3, 4] {
            g.add_task(id, TaskStatus::Pending);
        }
        g.add_dependency(4, 3).unwrap();
        g.add_dependency(4, 1).unwrap();
        g.add_dependency(4, 2).unwrap();
        assert_eq!(g.dependencies_of(4), &[3, 1, 2]);
    }

    #[test]
    fn add_dependency_rejects_cycles_and_leaves_graph_untouched() {
        let mut g = chain();
        let err = g.add_dependency(1, 3).unwrap_err();
        match err {
            TaskdagError::Dependency(DependencyError::CircularDependency { path }) => {
                assert_eq!(path, vec![1, 3, 2, 1]);
            }
            other => panic!("expected circular dependency, got {other:?}"),
        }
        assert!(!g.has_edge(1, 3));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn add_dependency_requires_both_endpoints() {
        let mut g = chain();
        assert!(matches!(
            g.add_dependency(1, 9),
            Err(TaskdagError::TaskNotFound(9))
        ));
    }

    #[test]
    fn removing_a_task_drops_its_edges() {
        let mut g = chain();
        let former_dependents = g.remove_task(2).unwrap();
        assert_eq!(former_dependents, vec![3]);
        assert!(g.dependents_of(1).is_empty());
        assert!(g.dependencies_of(3).is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.remove_task(2).is_none());
    }

    #[test]
    fn remove_dependency_updates_both_indexes() {
        let mut g = chain();
        assert!(g.remove_dependency(3, 2));
        assert!(!g.remove_dependency(3, 2));
        assert!(g.dependents_of(2).is_empty());
        assert!(g.dependencies_of(3).is_empty());
    }

    #[test]
    fn topological_order_puts_dependencies_first() {
        let g = chain();
        let order = g.topological_order().unwrap();
        let pos = |id| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(1) < pos(2));
        assert!(pos(2) < pos(3));
    }
}
