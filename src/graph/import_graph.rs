//! Per-file import edges for a batch of files.
//!
//! Each requested path yields exactly one [`ImportRecord`], in request
//! order. A bad path is reported in its own record and never stops the
//! batch. No cross-file graph is assembled.

use std::path::Path;

use crate::analysis::{
    ensure_file, extension_of, read_lossy, resolve_path, Dialect, ImportExtractor,
    LocalityClassifier,
};
use crate::protocol::ImportRecord;

/// Builds import records against one workspace root.
pub struct ImportGraphBuilder {
    extractor: ImportExtractor,
    classifier: LocalityClassifier,
}

impl ImportGraphBuilder {
    /// Create a builder for `workspace_root`.
    ///
    /// The root is canonicalized when it exists so that probes and record
    /// paths agree on symlinked locations.
    pub fn new(workspace_root: &Path) -> Self {
        let root = workspace_root
            .to_str()
            .map(resolve_path)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        Self {
            extractor: ImportExtractor::new(),
            classifier: LocalityClassifier::new(root),
        }
    }

    /// Build one record per path, preserving input order.
    pub fn build<S: AsRef<str>>(&mut self, file_paths: &[S]) -> Vec<ImportRecord> {
        file_paths
            .iter()
            .map(|path| self.build_file(path.as_ref()))
            .collect()
    }

    /// Build the record for a single path.
    pub fn build_file(&mut self, raw_path: &str) -> ImportRecord {
        let path = resolve_path(raw_path);
        let file_path = path.display().to_string();

        if let Err(e) = ensure_file(&path) {
            tracing::debug!(path = %file_path, error = %e, "skipping file");
            return ImportRecord::failed(file_path, e);
        }

        let Some(dialect) = Dialect::from_extension(&extension_of(&path)) else {
            tracing::debug!(path = %file_path, "no import extractor for extension");
            return ImportRecord::empty(file_path);
        };

        let text = match read_lossy(&path) {
            Ok(text) => text,
            Err(e) => return ImportRecord::failed(file_path, e),
        };

        let imports = self.extractor.extract(&text, dialect);
        let (local_deps, external_deps): (Vec<String>, Vec<String>) = imports
            .iter()
            .cloned()
            .partition(|spec| self.classifier.is_local(spec, &path));

        tracing::debug!(
            path = %file_path,
            imports = imports.len(),
            local = local_deps.len(),
            "extracted imports"
        );

        ImportRecord {
            file_path,
            imports,
            local_deps,
            external_deps,
            error: None,
        }
    }
}

/// Extract and classify imports for every path in `file_paths`.
pub fn extract_import_graph<S: AsRef<str>>(
    file_paths: &[S],
    workspace_root: &Path,
) -> Vec<ImportRecord> {
    ImportGraphBuilder::new(workspace_root).build(file_paths)
}
