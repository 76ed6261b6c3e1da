// src/dag/mod.rs

//! Task dependency graph and the algorithms over it.
//!
//! - [`graph`] holds the in-memory graph with forward and reverse adjacency.
//! - [`cycle`] decides whether a proposed edge keeps the graph acyclic.
//! - [`resolver`] derives one task's status from its direct dependencies.
//! - [`cascade`] propagates a status change through all dependents.

pub mod cascade;
pub mod cycle;
pub mod graph;
pub mod resolver;

use std::collections::BTreeMap;

use crate::types::{TaskId, TaskStatus};

/// Tasks whose status must change, keyed by id.
pub type StatusChanges = BTreeMap<TaskId, TaskStatus>;

pub use cascade::{apply_status_change, reconcile, rederive};
pub use cycle::{find_all_cycles, find_path, propose_edge};
pub use graph::DagGraph;
pub use resolver::resolve_status;
