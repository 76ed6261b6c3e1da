// src/engine/mod.rs

//! In-memory mutation layer over the task graph.
//!
//! The pure decisions live in [`crate::dag`]; [`TaskGraphEngine`] owns a graph,
//! applies those decisions and commits the resulting status changes.

use crate::dag::StatusChanges;
use crate::types::TaskId;

/// Outcome of [`TaskGraphEngine::remove_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRemoval {
    /// Other tasks depend on this one; nothing was removed.
    HasDependents(Vec<TaskId>),
    /// The task was removed; these statuses changed as a result.
    Removed(StatusChanges),
}

pub mod core;

pub use self::core::TaskGraphEngine;
