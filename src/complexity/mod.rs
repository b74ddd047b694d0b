//! Per-function complexity for Python sources.
//!
//! Two engines sit behind the [`MetricsEngine`] trait:
//!
//! - [`TreeSitterEngine`] parses the file and reports cyclomatic complexity
//!   for every function, method and class plus a maintainability index.
//! - [`RoughEngine`] counts branching keywords over the whole file and
//!   reports a single `(file)` entry.
//!
//! [`select_engine`] probes once per request. The rough engine is used only
//! when the Python grammar cannot be loaded or the caller forces it.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use codescope_tools::complexity::{select_engine, ComplexityAnalyzer};
//!
//! let mut analyzer = ComplexityAnalyzer::new(select_engine(false));
//! for record in analyzer.analyze(&["src/app.py"]) {
//!     for entry in &record.complexity {
//!         println!("{}:{} {} = {}", record.file_path, entry.line, entry.name, entry.complexity);
//!     }
//! }
//! ```

pub mod cyclomatic;
pub mod maintainability;
pub mod rough;

use std::fmt;

use thiserror::Error;

use crate::analysis::{ensure_file, extension_of, read_lossy, resolve_path};
use crate::protocol::{ComplexityEntry, ComplexityRecord};

pub use cyclomatic::TreeSitterEngine;
pub use rough::RoughEngine;

/// Note attached to records of files that are not Python.
pub const UNSUPPORTED_NOTE: &str = "complexity only supported for Python files";

/// Errors that can occur while scoring a file.
#[derive(Error, Debug)]
pub enum ComplexityError {
    #[error("Tree-sitter language initialization failed")]
    LanguageInit,

    #[error("Failed to parse source")]
    ParseError,

    #[error("invalid syntax at line {line}")]
    Syntax { line: usize },
}

/// Result type for complexity operations.
pub type ComplexityResult<T> = Result<T, ComplexityError>;

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    TreeSitter,
    Rough,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::TreeSitter => write!(f, "tree-sitter"),
            EngineKind::Rough => write!(f, "rough"),
        }
    }
}

/// What an engine reports for one file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileMetrics {
    pub functions: Vec<ComplexityEntry>,
    pub maintainability_index: Option<f64>,
    pub note: Option<String>,
}

/// The operations the analyzer needs from a metrics engine.
pub trait MetricsEngine {
    /// Which engine this is.
    fn kind(&self) -> EngineKind;

    /// Score one Python source text.
    fn analyze(&mut self, source: &str) -> ComplexityResult<FileMetrics>;
}

/// Pick the engine for a whole request.
///
/// Returns the tree-sitter engine unless `force_rough` is set or the
/// Python grammar fails to load.
pub fn select_engine(force_rough: bool) -> Box<dyn MetricsEngine> {
    if force_rough {
        tracing::info!("rough complexity forced by configuration");
        return Box::new(RoughEngine);
    }

    match TreeSitterEngine::new() {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            tracing::warn!(error = %e, "python metrics engine unavailable, using rough scores");
            Box::new(RoughEngine)
        }
    }
}

/// Scores a batch of files with one engine.
pub struct ComplexityAnalyzer {
    engine: Box<dyn MetricsEngine>,
}

impl ComplexityAnalyzer {
    pub fn new(engine: Box<dyn MetricsEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Build one record per path, preserving input order.
    pub fn analyze<S: AsRef<str>>(&mut self, file_paths: &[S]) -> Vec<ComplexityRecord> {
        file_paths
            .iter()
            .map(|path| self.analyze_file(path.as_ref()))
            .collect()
    }

    /// Build the record for a single path.
    pub fn analyze_file(&mut self, raw_path: &str) -> ComplexityRecord {
        let path = resolve_path(raw_path);
        let file_path = path.display().to_string();

        if let Err(e) = ensure_file(&path) {
            return ComplexityRecord::failed(file_path, e);
        }
        if extension_of(&path) != "py" {
            return ComplexityRecord::noted(file_path, UNSUPPORTED_NOTE);
        }

        let text = match read_lossy(&path) {
            Ok(text) => text,
            Err(e) => return ComplexityRecord::failed(file_path, e),
        };

        match self.engine.analyze(&text) {
            Ok(metrics) => {
                tracing::debug!(
                    path = %file_path,
                    engine = %self.engine.kind(),
                    units = metrics.functions.len(),
                    "scored file"
                );
                ComplexityRecord {
                    file_path,
                    complexity: metrics.functions,
                    maintainability_index: metrics.maintainability_index,
                    note: metrics.note,
                    error: None,
                }
            }
            Err(e) => {
                tracing::debug!(path = %file_path, error = %e, "could not score file");
                ComplexityRecord::failed(file_path, e)
            }
        }
    }
}

/// Score every path in `file_paths` with the engine chosen by the probe.
pub fn analyze_complexity<S: AsRef<str>>(
    file_paths: &[S],
    force_rough: bool,
) -> Vec<ComplexityRecord> {
    ComplexityAnalyzer::new(select_engine(force_rough)).analyze(file_paths)
}
