#![allow(dead_code)]

use taskdag::config::{ConfigSection, GraphFile, RawGraphFile, TaskConfig};
use taskdag::engine::TaskGraphEngine;
use taskdag::types::{TaskId, TaskStatus};

/// Builder for `GraphFile` to simplify test setup.
pub struct GraphFileBuilder {
    file: RawGraphFile,
}

impl GraphFileBuilder {
    pub fn new() -> Self {
        Self {
            file: RawGraphFile {
                config: ConfigSection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.file.task.push(task);
        self
    }

    pub fn reconcile_on_load(mut self, val: bool) -> Self {
        self.file.config.reconcile_on_load = val;
        self
    }

    /// The unvalidated file, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawGraphFile {
        self.file
    }

    pub fn build(self) -> GraphFile {
        GraphFile::try_from(self.file).expect("Failed to build valid graph file from builder")
    }

    /// Shortcut: validated file straight into an engine.
    pub fn build_engine(self) -> TaskGraphEngine {
        TaskGraphEngine::from_graph_file(&self.build())
    }
}

impl Default for GraphFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(id: TaskId) -> Self {
        Self {
            task: TaskConfig::new(id),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.task.description = description.to_string();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn after(mut self, dep: TaskId) -> Self {
        self.task.after.push(dep);
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
