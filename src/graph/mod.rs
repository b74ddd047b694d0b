//! Import graph extraction.
//!
//! This module turns a batch of file paths into per-file import edges,
//! each split into workspace-local and external dependencies.

pub mod import_graph;

pub use import_graph::{extract_import_graph, ImportGraphBuilder};
