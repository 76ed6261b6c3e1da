// src/config/mod.rs

//! Task graph file handling.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load and save a graph file (`loader.rs`).
//! - Validate ids, references and acyclicity (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_graph_path, load_and_validate, load_from_path, save_to_path};
pub use model::{ConfigSection, GraphFile, RawGraphFile, TaskConfig};
