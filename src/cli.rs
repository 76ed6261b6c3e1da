// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::{TaskId, TaskStatus};

/// Command-line arguments for `taskdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskdag",
    version,
    about = "Track task dependencies, reject cycles and derive task status.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task graph file (TOML).
    ///
    /// Default: `$TASKDAG_FILE`, or `Taskdag.toml` in the current directory.
    #[arg(long, short = 'f', value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate the file and report statuses that drifted from their
    /// dependencies.
    Check,

    /// Print every task with its status, dependencies and dependents.
    Show,

    /// Print the graph's nodes and edges as TOML.
    Graph,

    /// Create a task with no dependencies.
    AddTask {
        id: TaskId,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Initial status (default: pending).
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        write: bool,
    },

    /// Make TASK depend on DEPENDS_ON, unless that would create a cycle.
    AddDep {
        task: TaskId,
        depends_on: TaskId,
        #[arg(long)]
        write: bool,
    },

    /// Remove the dependency of TASK on DEPENDS_ON.
    RemoveDep {
        task: TaskId,
        depends_on: TaskId,
        #[arg(long)]
        write: bool,
    },

    /// Change a task's status and cascade to its dependents.
    SetStatus {
        task: TaskId,
        status: TaskStatus,
        #[arg(long)]
        write: bool,
    },

    /// Remove a task. Refuses if other tasks depend on it unless --force.
    RemoveTask {
        task: TaskId,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        write: bool,
    },

    /// Bring every task's status in line with its dependencies.
    Reconcile {
        #[arg(long)]
        write: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
