// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::Result;

/// Environment variable that overrides [`default_graph_path`].
pub const GRAPH_FILE_ENV: &str = "TASKDAG_FILE";

/// Load a task graph file from a given path and return the raw
/// `RawGraphFile`.
///
/// This only performs TOML deserialization; it does **not** check ids,
/// references or cycles. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawGraphFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), tasks = raw.task.len(), "read task graph file");

    Ok(raw)
}

/// Load a task graph file from path and validate it.
///
/// This is the entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - duplicate task ids,
///   - unknown, repeated or self-referencing `after` entries,
///   - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphFile> {
    let raw = load_from_path(&path)?;
    let file = GraphFile::try_from(raw)?;
    Ok(file)
}

/// Write `file` back to `path` as pretty-printed TOML.
pub fn save_to_path(path: impl AsRef<Path>, file: &GraphFile) -> Result<()> {
    let path = path.as_ref();
    let contents = toml::to_string_pretty(&file.to_raw())?;
    fs::write(path, contents)?;
    debug!(path = %path.display(), tasks = file.tasks().len(), "wrote task graph file");
    Ok(())
}

/// Resolve the default graph file path.
///
/// `TASKDAG_FILE` wins if set; otherwise `Taskdag.toml` in the current
/// working directory.
pub fn default_graph_path() -> PathBuf {
    std::env::var_os(GRAPH_FILE_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Taskdag.toml"))
}
