// src/lib.rs

//! Task dependency graph engine.
//!
//! The core lives in [`dag`]: cycle-checked edge admission and cascading
//! status derivation over an in-memory graph. [`engine`] commits those
//! decisions; [`config`] loads and saves the TOML graph file the CLI works on.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod report;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{GraphFile, TaskConfig, default_graph_path, load_and_validate, save_to_path};
use crate::engine::{TaskGraphEngine, TaskRemoval};

pub use crate::dag::{DagGraph, StatusChanges};
pub use crate::errors::{DependencyError, TaskdagError};
pub use crate::types::{TaskId, TaskStatus};

/// High-level entry point used by `main.rs`.
///
/// Loads the graph file, runs one command against an engine built from it,
/// prints the outcome and, for mutations run with `--write`, saves the file.
pub fn run(args: CliArgs) -> Result<()> {
    let path = args.file.clone().unwrap_or_else(default_graph_path);
    let allow_missing = matches!(args.command, Command::AddTask { .. });
    let mut file = load_graph_file(&path, allow_missing)?;
    let mut engine = TaskGraphEngine::from_graph_file(&file);

    let write = match args.command {
        Command::Check => {
            let drift = dag::reconcile(TaskGraphEngine::from_stored(&file).graph());
            println!(
                "ok: {} tasks, {} dependencies",
                engine.graph().len(),
                engine.graph().edge_count()
            );
            if !drift.is_empty() {
                println!("statuses out of date with their dependencies:");
                print!("{}", report::format_changes(&drift));
            }
            false
        }
        Command::Show => {
            print!("{}", report::format_tasks(&engine, &file));
            false
        }
        Command::Graph => {
            print!("{}", report::export_graph(&engine, &file)?);
            false
        }
        Command::AddTask {
            id,
            title,
            description,
            status,
            write,
        } => {
            engine.create_task(id, status)?;
            file.upsert_task(TaskConfig {
                title,
                description,
                status: engine.status_of(id).unwrap_or_default(),
                ..TaskConfig::new(id)
            });
            println!("created task {id}");
            write
        }
        Command::AddDep {
            task,
            depends_on,
            write,
        } => {
            let changes = engine.add_dependency(task, depends_on)?;
            println!("task {task} now depends on task {depends_on}");
            print!("{}", report::format_changes(&changes));
            write
        }
        Command::RemoveDep {
            task,
            depends_on,
            write,
        } => {
            let changes = engine.remove_dependency(task, depends_on)?;
            println!("task {task} no longer depends on task {depends_on}");
            print!("{}", report::format_changes(&changes));
            write
        }
        Command::SetStatus {
            task,
            status,
            write,
        } => {
            let changes = engine.set_status(task, status)?;
            print!("{}", report::format_changes(&changes));
            write
        }
        Command::RemoveTask { task, force, write } => match engine.remove_task(task, force)? {
            TaskRemoval::HasDependents(dependents) => {
                println!(
                    "warning: {} task(s) depend on task {task}: {:?}; rerun with --force to remove it",
                    dependents.len(),
                    dependents
                );
                false
            }
            TaskRemoval::Removed(changes) => {
                println!("removed task {task}");
                print!("{}", report::format_changes(&changes));
                write
            }
        },
        Command::Reconcile { write } => {
            let changes = engine.reconcile();
            print!("{}", report::format_changes(&changes));
            write
        }
    };

    if write {
        file.sync_from(&engine);
        save_to_path(&path, &file)
            .with_context(|| format!("writing task graph to {}", path.display()))?;
        info!(path = %path.display(), "saved task graph");
    } else {
        debug!("nothing written");
    }

    Ok(())
}

/// Load and validate `path`; a missing file is an empty graph when
/// `allow_missing` is set.
fn load_graph_file(path: &Path, allow_missing: bool) -> Result<GraphFile> {
    if allow_missing && !path.exists() {
        debug!(path = %path.display(), "graph file missing; starting empty");
        return Ok(GraphFile::try_from(config::RawGraphFile::default())?);
    }
    load_and_validate(path).with_context(|| format!("loading task graph from {}", path.display()))
}
