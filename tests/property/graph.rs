// tests/property/graph.rs

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use taskdag::dag::{DagGraph, find_all_cycles, propose_edge};
use taskdag::errors::DependencyError;
use taskdag::types::{TaskId, TaskStatus};

// Strategy to generate a random DAG.
// Acyclicity is guaranteed by only letting task i depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = DagGraph> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(move |raw_deps| {
            let mut graph = DagGraph::new();
            for i in 0..num_tasks {
                graph.add_task(i as TaskId, TaskStatus::Pending);
            }
            for (i, potential) in raw_deps.into_iter().enumerate() {
                if i == 0 {
                    continue;
                }
                let deps: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                for dep in deps {
                    graph
                        .add_dependency(i as TaskId, dep as TaskId)
                        .expect("lower-index dependency is always admissible");
                }
            }
            graph
        })
    })
}

/// Plain BFS reachability along depends-on edges, independent of the DFS
/// under test.
fn reachable(graph: &DagGraph, from: TaskId, to: TaskId) -> bool {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(id) = queue.pop_front() {
        if id == to {
            return true;
        }
        for &dep in graph.dependencies_of(id) {
            if seen.insert(dep) {
                queue.push_back(dep);
            }
        }
    }
    false
}

proptest! {
    #[test]
    fn accepts_iff_no_self_no_duplicate_no_back_path(
        graph in dag_strategy(12),
        u in 0..12u64,
        v in 0..12u64,
    ) {
        prop_assume!(graph.contains(u) && graph.contains(v));

        let outcome = propose_edge(&graph, u, v);
        let expected_accept = u != v && !graph.has_edge(u, v) && !reachable(&graph, v, u);
        prop_assert_eq!(outcome.is_ok(), expected_accept);

        match outcome {
            Err(DependencyError::SelfDependency(id)) => prop_assert_eq!(id, u),
            Err(DependencyError::DuplicateDependency { .. }) => prop_assert!(graph.has_edge(u, v)),
            Err(DependencyError::CircularDependency { path }) => {
                // [u, v, ..., u], every hop an existing edge.
                prop_assert_eq!(path.first().copied(), Some(u));
                prop_assert_eq!(path.get(1).copied(), Some(v));
                prop_assert_eq!(path.last().copied(), Some(u));
                for hop in path[1..].windows(2) {
                    prop_assert!(graph.has_edge(hop[0], hop[1]));
                }
            }
            Ok(()) => {}
        }
    }

    #[test]
    fn graph_stays_acyclic_under_random_insertions(
        graph in dag_strategy(10),
        proposals in proptest::collection::vec((0..10u64, 0..10u64), 0..40),
    ) {
        let mut graph = graph;
        for (u, v) in proposals {
            let before = graph.edge_count();
            match graph.add_dependency(u, v) {
                Ok(()) => prop_assert_eq!(graph.edge_count(), before + 1),
                Err(_) => prop_assert_eq!(graph.edge_count(), before),
            }
            prop_assert!(graph.topological_order().is_ok());
        }
        prop_assert!(find_all_cycles(&graph).is_empty());
    }

    #[test]
    fn reported_path_is_stable_across_calls(
        graph in dag_strategy(10),
        u in 0..10u64,
        v in 0..10u64,
    ) {
        let cloned = graph.clone();
        prop_assert_eq!(propose_edge(&graph, u, v), propose_edge(&cloned, u, v));
    }
}
