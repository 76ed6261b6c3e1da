// src/dag/cycle.rs

//! Cycle detection for proposed dependency edges.
//!
//! Adding `dependent -> dependency` closes a loop exactly when `dependent` is
//! already reachable from `dependency`. [`propose_edge`] answers that with a
//! single depth-first search from `dependency`, O(V+E), and reports the loop
//! it would close.
//!
//! The search is iterative (explicit frame stack) and visits neighbours in
//! edge-insertion order, so the reported path is the same on every run for
//! the same graph.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::dag::graph::DagGraph;
use crate::errors::DependencyError;
use crate::types::TaskId;

/// Decide whether `dependent -> dependency` may be added to `graph`.
///
/// Exactly one outcome per call:
/// - `Ok(())`: the edge keeps the graph acyclic.
/// - `SelfDependency`: both ends are the same task (no search is run).
/// - `DuplicateDependency`: the edge already exists (no search is run).
/// - `CircularDependency { path }`: the edge would close a loop.
///
/// Unknown ids are treated as tasks with no edges.
pub fn propose_edge(
    graph: &DagGraph,
    dependent: TaskId,
    dependency: TaskId,
) -> Result<(), DependencyError> {
    if dependent == dependency {
        warn!(task = dependent, "rejected self-dependency");
        return Err(DependencyError::SelfDependency(dependent));
    }

    if graph.has_edge(dependent, dependency) {
        warn!(dependent, dependency, "rejected duplicate dependency");
        return Err(DependencyError::DuplicateDependency {
            dependent,
            dependency,
        });
    }

    match find_path(graph, dependency, dependent) {
        Some(existing) => {
            let mut path = Vec::with_capacity(existing.len() + 1);
            path.push(dependent);
            path.extend(existing);
            warn!(dependent, dependency, ?path, "rejected circular dependency");
            Err(DependencyError::CircularDependency { path })
        }
        None => {
            debug!(dependent, dependency, "dependency accepted");
            Ok(())
        }
    }
}

/// Path from `from` to `to` along depends-on edges, both ends inclusive.
///
/// Returns `None` if `to` is not reachable from `from`.
pub fn find_path(graph: &DagGraph, from: TaskId, to: TaskId) -> Option<Vec<TaskId>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut visited: HashSet<TaskId> = HashSet::from([from]);
    // Each frame is (node, index of the next dependency to explore). The
    // stack of frames is the current path.
    let mut frames: Vec<(TaskId, usize)> = vec![(from, 0)];

    while let Some((node, cursor)) = frames.last_mut() {
        let Some(&next) = graph.dependencies_of(*node).get(*cursor) else {
            frames.pop();
            continue;
        };
        *cursor += 1;

        if next == to {
            let mut path: Vec<TaskId> = frames.iter().map(|&(id, _)| id).collect();
            path.push(to);
            return Some(path);
        }

        if visited.insert(next) {
            frames.push((next, 0));
        }
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current DFS stack.
    Gray,
    /// Fully explored.
    Black,
}

/// Find every cycle closed by a back edge in `graph`.
///
/// Each cycle is reported as `[start, ..., start]` following depends-on
/// edges. A graph built through [`DagGraph::add_dependency`] never has one;
/// this is for diagnosing graphs loaded from outside.
pub fn find_all_cycles(graph: &DagGraph) -> Vec<Vec<TaskId>> {
    let mut color: HashMap<TaskId, Color> = HashMap::new();
    let mut cycles = Vec::new();

    for root in graph.tasks() {
        if color.contains_key(&root) {
            continue;
        }

        color.insert(root, Color::Gray);
        let mut frames: Vec<(TaskId, usize)> = vec![(root, 0)];

        while let Some((node, cursor)) = frames.last_mut() {
            let node = *node;
            let Some(&next) = graph.dependencies_of(node).get(*cursor) else {
                color.insert(node, Color::Black);
                frames.pop();
                continue;
            };
            *cursor += 1;

            match color.get(&next) {
                None => {
                    color.insert(next, Color::Gray);
                    frames.push((next, 0));
                }
                Some(Color::Gray) => {
                    let start = frames
                        .iter()
                        .position(|&(id, _)| id == next)
                        .unwrap_or(0);
                    let mut cycle: Vec<TaskId> =
                        frames[start..].iter().map(|&(id, _)| id).collect();
                    cycle.push(next);
                    debug!(?cycle, "found cycle");
                    cycles.push(cycle);
                }
                Some(Color::Black) => {}
            }
        }
    }

    cycles
}
