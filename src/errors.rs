// src/errors.rs

//! Crate-wide error types.
//!
//! [`DependencyError`] is the closed set of reasons an edge proposal can be
//! rejected. [`TaskdagError`] wraps it together with caller-side and I/O
//! failures.

use thiserror::Error;

use crate::types::TaskId;

/// Why a proposed `dependent -> dependency` edge was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("task {dependent} already depends on task {dependency}")]
    DuplicateDependency { dependent: TaskId, dependency: TaskId },

    /// `path` starts at the proposed dependent, steps over the proposed edge to
    /// the dependency, follows existing edges back to the dependent and ends
    /// there: proposing `1 -> 2` while `2 -> 1` exists yields `[1, 2, 1]`.
    #[error("circular dependency detected: {}", format_path(.path))]
    CircularDependency { path: Vec<TaskId> },
}

impl DependencyError {
    /// Cycle path for `CircularDependency`, `None` for the other kinds.
    pub fn path(&self) -> Option<&[TaskId]> {
        match self {
            DependencyError::CircularDependency { path } => Some(path),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task already exists: {0}")]
    TaskExists(TaskId),

    #[error("Dependency not found: task {dependent} does not depend on task {dependency}")]
    DependencyNotFound { dependent: TaskId, dependency: TaskId },

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error("Cycle detected in task graph: {}", format_path(.0))]
    DagCycle(Vec<TaskId>),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

/// Render a task path as `1 -> 2 -> 1`.
pub fn format_path(path: &[TaskId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
