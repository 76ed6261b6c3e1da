// src/engine/core.rs

//! Single-writer owner of one task graph.
//!
//! [`TaskGraphEngine`] exposes the two pure decisions ([`propose_edge`] and
//! [`apply_status_change`]) and the committing mutations built on them.
//! Mutations take `&mut self`, queries take `&self`, so one writer at a time
//! is enforced by the borrow checker rather than by a lock.
//!
//! [`propose_edge`]: TaskGraphEngine::propose_edge
//! [`apply_status_change`]: TaskGraphEngine::apply_status_change

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::GraphFile;
use crate::dag::{self, DagGraph, StatusChanges};
use crate::engine::TaskRemoval;
use crate::errors::{Result, TaskdagError};
use crate::types::{TaskId, TaskStatus};

#[derive(Debug, Clone, Default)]
pub struct TaskGraphEngine {
    graph: DagGraph,
}

impl TaskGraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a validated [`GraphFile`].
    ///
    /// Stored statuses are taken as-is unless `[config].reconcile_on_load`
    /// is set, in which case the whole graph is brought to its fixed point.
    pub fn from_graph_file(file: &GraphFile) -> Self {
        let mut engine = Self::from_stored(file);
        if file.config().reconcile_on_load {
            let changes = engine.reconcile();
            if !changes.is_empty() {
                info!(changed = changes.len(), "reconciled statuses on load");
            }
        }
        engine
    }

    /// Build an engine holding exactly the statuses stored in `file`,
    /// ignoring `[config].reconcile_on_load`.
    pub fn from_stored(file: &GraphFile) -> Self {
        let graph = DagGraph::from_parts_unchecked(
            file.tasks().iter().map(|t| (t.id, t.status)),
            file.tasks()
                .iter()
                .flat_map(|t| t.after.iter().map(move |&dep| (t.id, dep))),
        );
        Self { graph }
    }

    /// Read-only view of the graph.
    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    pub fn status_of(&self, task: TaskId) -> Option<TaskStatus> {
        self.graph.status_of(task)
    }

    pub fn dependencies_of(&self, task: TaskId) -> &[TaskId] {
        self.graph.dependencies_of(task)
    }

    pub fn dependents_of(&self, task: TaskId) -> &[TaskId] {
        self.graph.dependents_of(task)
    }

    /// Decide whether `dependent -> dependency` may be added, without adding
    /// it.
    ///
    /// Edge rejections ([`DependencyError`](crate::errors::DependencyError))
    /// are reported before unknown ids.
    pub fn propose_edge(&self, dependent: TaskId, dependency: TaskId) -> Result<()> {
        dag::propose_edge(&self.graph, dependent, dependency)?;
        self.graph.ensure_task(dependent)?;
        self.graph.ensure_task(dependency)?;
        Ok(())
    }

    /// Statuses that must change if `task` is set to `status`, without
    /// committing them.
    pub fn apply_status_change(&self, task: TaskId, status: TaskStatus) -> Result<StatusChanges> {
        dag::apply_status_change(&self.graph, task, status)
    }

    /// Add a task with no edges, `pending` unless `status` says otherwise.
    pub fn create_task(&mut self, id: TaskId, status: Option<TaskStatus>) -> Result<()> {
        let status = status.unwrap_or_default();
        if !self.graph.add_task(id, status) {
            return Err(TaskdagError::TaskExists(id));
        }
        info!(task = id, %status, "created task");
        Ok(())
    }

    /// Add `dependent -> dependency` and re-derive `dependent`.
    ///
    /// Nothing changes if the edge is rejected.
    pub fn add_dependency(&mut self, dependent: TaskId, dependency: TaskId) -> Result<StatusChanges> {
        self.graph.add_dependency(dependent, dependency)?;
        let changes = dag::rederive(&self.graph, dependent)?;
        self.commit(&changes);
        info!(
            dependent,
            dependency,
            changed = changes.len(),
            "added dependency"
        );
        Ok(changes)
    }

    /// Remove `dependent -> dependency` and re-derive `dependent`.
    pub fn remove_dependency(
        &mut self,
        dependent: TaskId,
        dependency: TaskId,
    ) -> Result<StatusChanges> {
        self.graph.ensure_task(dependent)?;
        self.graph.ensure_task(dependency)?;
        if !self.graph.remove_dependency(dependent, dependency) {
            return Err(TaskdagError::DependencyNotFound {
                dependent,
                dependency,
            });
        }

        let changes = dag::rederive(&self.graph, dependent)?;
        self.commit(&changes);
        info!(
            dependent,
            dependency,
            changed = changes.len(),
            "removed dependency"
        );
        Ok(changes)
    }

    /// Set `task` to `status`, cascade, and commit the result.
    pub fn set_status(&mut self, task: TaskId, status: TaskStatus) -> Result<StatusChanges> {
        let changes = dag::apply_status_change(&self.graph, task, status)?;
        self.commit(&changes);
        info!(task, %status, changed = changes.len(), "status changed");
        Ok(changes)
    }

    /// Remove `task` and all of its edges.
    ///
    /// If other tasks depend on it and `force` is false, nothing is removed
    /// and their ids are returned instead. Otherwise each former dependent is
    /// re-derived with its remaining dependencies.
    pub fn remove_task(&mut self, task: TaskId, force: bool) -> Result<TaskRemoval> {
        self.graph.ensure_task(task)?;

        let dependents = self.graph.dependents_of(task).to_vec();
        if !dependents.is_empty() && !force {
            warn!(task, ?dependents, "task has dependents; not removing");
            return Ok(TaskRemoval::HasDependents(dependents));
        }

        let former_dependents = self.graph.remove_task(task).unwrap_or_default();

        let mut before: BTreeMap<TaskId, TaskStatus> = BTreeMap::new();
        for dependent in former_dependents {
            let changes = dag::rederive(&self.graph, dependent)?;
            for &id in changes.keys() {
                if let Some(status) = self.graph.status_of(id) {
                    before.entry(id).or_insert(status);
                }
            }
            self.commit(&changes);
        }

        let changes: StatusChanges = before
            .into_iter()
            .filter_map(|(id, old)| {
                self.graph
                    .status_of(id)
                    .filter(|&new| new != old)
                    .map(|new| (id, new))
            })
            .collect();

        info!(task, changed = changes.len(), "removed task");
        Ok(TaskRemoval::Removed(changes))
    }

    /// Resolve every task once and commit whatever drifted.
    pub fn reconcile(&mut self) -> StatusChanges {
        let changes = dag::reconcile(&self.graph);
        self.commit(&changes);
        changes
    }

    fn commit(&mut self, changes: &StatusChanges) {
        for (&id, status) in changes {
            debug!(task = id, %status, "committing status");
        }
        self.graph.apply(changes);
    }
}
