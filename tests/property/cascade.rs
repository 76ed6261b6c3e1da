// tests/property/cascade.rs

use std::collections::HashSet;

use proptest::prelude::*;
use taskdag::dag::{DagGraph, apply_status_change, reconcile, resolve_status};
use taskdag::types::{TaskId, TaskStatus};

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Blocked),
    ]
}

// Random DAG (task i depends only on tasks 0..i) with random statuses,
// reconciled so it starts at its fixed point.
fn settled_dag_strategy(max_tasks: usize) -> impl Strategy<Value = DagGraph> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        (
            proptest::collection::vec(status_strategy(), num_tasks),
            proptest::collection::vec(
                proptest::collection::vec(any::<usize>(), 0..3),
                num_tasks,
            ),
        )
            .prop_map(move |(statuses, raw_deps)| {
                let mut graph = DagGraph::new();
                for (i, status) in statuses.into_iter().enumerate() {
                    graph.add_task(i as TaskId, status);
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
                let drift = reconcile(&graph);
                graph.apply(&drift);
                graph
            })
    })
}

proptest! {
    #[test]
    fn cascade_reaches_a_fixed_point_in_one_pass(
        graph in settled_dag_strategy(12),
        origin in 0..12u64,
        status in status_strategy(),
    ) {
        prop_assume!(graph.contains(origin));

        let mut graph = graph;
        let changes = apply_status_change(&graph, origin, status).unwrap();
        graph.apply(&changes);

        prop_assert_eq!(graph.status_of(origin), Some(status));
        prop_assert!(apply_status_change(&graph, origin, status).unwrap().is_empty());

        // Every task other than the origin agrees with its dependencies.
        for id in graph.tasks().filter(|&id| id != origin) {
            let current = graph.status_of(id).unwrap();
            let deps = graph
                .dependencies_of(id)
                .iter()
                .map(|&d| graph.status_of(d).unwrap());
            prop_assert_eq!(resolve_status(current, deps), current);
        }
    }

    #[test]
    fn cascade_only_touches_the_origin_and_its_dependents(
        graph in settled_dag_strategy(12),
        origin in 0..12u64,
        status in status_strategy(),
    ) {
        prop_assume!(graph.contains(origin));

        let changes = apply_status_change(&graph, origin, status).unwrap();
        for &id in changes.keys() {
            prop_assert!(
                id == origin || depends_transitively(&graph, id, origin),
                "task {} changed but does not depend on {}", id, origin
            );
        }
    }

    #[test]
    fn resolver_ignores_dependency_order(
        current in status_strategy(),
        deps in proptest::collection::vec(status_strategy(), 0..6),
    ) {
        let forward = resolve_status(current, deps.iter().copied());
        let backward = resolve_status(current, deps.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }
}

fn depends_transitively(graph: &DagGraph, task: TaskId, on: TaskId) -> bool {
    let mut stack = graph.dependencies_of(task).to_vec();
    let mut seen = HashSet::new();
    while let Some(id) = stack.pop() {
        if id == on {
            return true;
        }
        if seen.insert(id) {
            stack.extend_from_slice(graph.dependencies_of(id));
        }
    }
    false
}
