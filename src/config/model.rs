// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::engine::TaskGraphEngine;
use crate::types::{TaskId, TaskStatus};

/// Task graph file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// reconcile_on_load = true
///
/// [[task]]
/// id = 1
/// title = "Design schema"
/// status = "completed"
///
/// [[task]]
/// id = 2
/// title = "Write migrations"
/// after = [1]
/// ```
///
/// All sections are optional; an empty file is an empty graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraphFile {
    /// Behaviour switches from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[[task]]`, in file order.
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// Validated task graph file.
///
/// Built only through `GraphFile::try_from(RawGraphFile)`, which guarantees
/// unique ids, known dependency references and an acyclic graph.
#[derive(Debug, Clone)]
pub struct GraphFile {
    config: ConfigSection,
    task: Vec<TaskConfig>,
}

impl GraphFile {
    pub(crate) fn new_unchecked(config: ConfigSection, task: Vec<TaskConfig>) -> Self {
        Self { config, task }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn tasks(&self) -> &[TaskConfig] {
        &self.task
    }

    pub fn task(&self, id: TaskId) -> Option<&TaskConfig> {
        self.task.iter().find(|t| t.id == id)
    }

    /// Record a task created through the engine so its payload is saved.
    ///
    /// Replaces an existing entry with the same id.
    pub fn upsert_task(&mut self, task: TaskConfig) {
        match self.task.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.task.push(task),
        }
    }

    /// Copy statuses and edges from `engine` back into the file model.
    ///
    /// Tasks missing from the engine are dropped; titles and descriptions of
    /// the remaining tasks are kept. Tasks only the engine knows about are
    /// appended with an empty payload.
    pub fn sync_from(&mut self, engine: &TaskGraphEngine) {
        let graph = engine.graph();

        self.task.retain(|t| graph.contains(t.id));
        for task in &mut self.task {
            if let Some(status) = graph.status_of(task.id) {
                task.status = status;
            }
            task.after = graph.dependencies_of(task.id).to_vec();
        }

        let missing: Vec<TaskId> = graph
            .tasks()
            .filter(|&id| !self.task.iter().any(|t| t.id == id))
            .collect();
        for id in missing {
            self.task.push(TaskConfig {
                id,
                status: graph.status_of(id).unwrap_or_default(),
                after: graph.dependencies_of(id).to_vec(),
                ..TaskConfig::new(id)
            });
        }
    }

    pub fn to_raw(&self) -> RawGraphFile {
        RawGraphFile {
            config: self.config.clone(),
            task: self.task.clone(),
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Resolve every task once after loading, so stored statuses that
    /// drifted from their dependencies are corrected before any command.
    #[serde(default)]
    pub reconcile_on_load: bool,
}

/// `[[task]]` entry.
///
/// Only `id`, `status` and `after` matter to the graph; `title` and
/// `description` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: TaskId,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Initial (or last saved) status; defaults to `pending`.
    #[serde(default)]
    pub status: TaskStatus,

    /// Ids of the tasks this task depends on.
    #[serde(default)]
    pub after: Vec<TaskId>,
}

impl TaskConfig {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::default(),
            after: Vec::new(),
        }
    }
}
