//! Source analysis for codescope-tools.
//!
//! This module provides the per-file building blocks shared by both
//! analyses: loading text, extracting raw import specifiers, and deciding
//! whether a specifier points inside the workspace.
//!
//! # Features
//!
//! - Parse Python `import` / `from ... import` statements with tree-sitter
//! - Scan JavaScript/TypeScript for `import ... from`, bare `import` and `require()`
//! - Classify specifiers as local or external with filesystem probes
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use codescope_tools::analysis::{Dialect, ImportExtractor, LocalityClassifier};
//!
//! let mut extractor = ImportExtractor::new();
//! let imports = extractor.extract("from .models import User\nimport os", Dialect::Python);
//!
//! let classifier = LocalityClassifier::new("/srv/app");
//! for spec in &imports {
//!     println!("{spec}: {:?}", classifier.classify(spec, Path::new("/srv/app/views.py")));
//! }
//! ```

pub mod imports;
pub mod locality;
pub mod source;
pub mod walk;

// Re-export main types for convenience
pub use imports::{dedup_first, Dialect, ImportExtractor};
pub use locality::{Locality, LocalityClassifier, CANDIDATE_SUFFIXES};
pub use source::{ensure_file, extension_of, read_lossy, resolve_path, SourceError};
pub use walk::preorder;
