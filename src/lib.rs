//! codescope-tools - batch import-graph and complexity runner
//!
//! This crate answers one JSON request per process: it either extracts and
//! classifies the imports of a list of files, or scores the complexity of
//! the Python files among them.

pub mod analysis;
pub mod complexity;
pub mod config;
pub mod dispatch;
pub mod graph;
pub mod logging;
pub mod protocol;
