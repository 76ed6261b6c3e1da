// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::dag::{DagGraph, find_all_cycles};
use crate::errors::{Result, TaskdagError};

impl TryFrom<RawGraphFile> for GraphFile {
    type Error = TaskdagError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_graph(&raw)?;
        Ok(GraphFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_graph(raw: &RawGraphFile) -> Result<()> {
    validate_task_ids(raw)?;
    validate_task_dependencies(raw)?;
    validate_dag(raw)?;
    Ok(())
}

fn validate_task_ids(raw: &RawGraphFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &raw.task {
        if !seen.insert(task.id) {
            return Err(TaskdagError::ConfigError(format!(
                "task id {} is defined more than once",
                task.id
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(raw: &RawGraphFile) -> Result<()> {
    let ids: HashSet<_> = raw.task.iter().map(|t| t.id).collect();

    for task in &raw.task {
        let mut listed = HashSet::new();
        for &dep in &task.after {
            if dep == task.id {
                return Err(TaskdagError::ConfigError(format!(
                    "task {} cannot depend on itself in `after`",
                    task.id
                )));
            }
            if !ids.contains(&dep) {
                return Err(TaskdagError::ConfigError(format!(
                    "task {} has unknown dependency {} in `after`",
                    task.id, dep
                )));
            }
            if !listed.insert(dep) {
                return Err(TaskdagError::ConfigError(format!(
                    "task {} lists dependency {} more than once in `after`",
                    task.id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(raw: &RawGraphFile) -> Result<()> {
    let graph = DagGraph::from_parts_unchecked(
        raw.task.iter().map(|t| (t.id, t.status)),
        raw.task
            .iter()
            .flat_map(|t| t.after.iter().map(move |&dep| (t.id, dep))),
    );

    // A topological sort fails iff there is a cycle; only then pay for the
    // full search to report the loop.
    match graph.topological_order() {
        Ok(_order) => Ok(()),
        Err(task) => {
            let path = find_all_cycles(&graph)
                .into_iter()
                .next()
                .unwrap_or_else(|| vec![task, task]);
            Err(TaskdagError::DagCycle(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TaskConfig;

    fn task(id: u64, after: &[u64]) -> TaskConfig {
        TaskConfig {
            after: after.to_vec(),
            ..TaskConfig::new(id)
        }
    }

    fn raw(tasks: Vec<TaskConfig>) -> RawGraphFile {
        RawGraphFile {
            task: tasks,
            ..RawGraphFile::default()
        }
    }

    #[test]
    fn empty_file_is_valid() {
        assert!(GraphFile::try_from(RawGraphFile::default()).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = GraphFile::try_from(raw(vec![task(1, &[]), task(1, &[])])).unwrap_err();
        assert!(matches!(err, TaskdagError::ConfigError(msg) if msg.contains("more than once")));
    }

    #[test]
    fn duplicate_after_entries_are_rejected() {
        let err =
            GraphFile::try_from(raw(vec![task(1, &[]), task(2, &[1, 1])])).unwrap_err();
        assert!(matches!(err, TaskdagError::ConfigError(msg) if msg.contains("dependency 1")));
    }

    #[test]
    fn cycles_report_their_path() {
        let err = GraphFile::try_from(raw(vec![
            task(1, &[3]),
            task(2, &[1]),
            task(3, &[2]),
        ]))
        .unwrap_err();
        match err {
            TaskdagError::DagCycle(path) => assert_eq!(path, vec![1, 3, 2, 1]),
            other => panic!("expected DagCycle, got {other:?}"),
        }
    }
}
