//! Local-vs-external classification of import specifiers.
//!
//! This is a filesystem-existence heuristic, not module resolution: no
//! manifest lookup, no `node_modules` search, no Python path list.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

/// Suffixes tried, in order, when the bare specifier is not a path.
pub const CANDIDATE_SUFFIXES: [&str; 7] = [
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    ".py",
    "/index.ts",
    "/index.js",
];

/// Where a specifier was found to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    /// Resolves inside the workspace.
    Local,
    /// Anything else, typically a third-party package.
    External,
}

/// Classifies specifiers against one workspace root.
#[derive(Debug, Clone)]
pub struct LocalityClassifier {
    workspace_root: PathBuf,
}

impl LocalityClassifier {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// Classify `specifier` as written in `importing_file`. First match wins:
    ///
    /// 1. a leading `.` (relative import) is local;
    /// 2. the specifier as a path under the workspace root exists;
    /// 3. the specifier plus one of [`CANDIDATE_SUFFIXES`] exists;
    /// 4. otherwise external.
    pub fn classify(&self, specifier: &str, importing_file: &Path) -> Locality {
        let locality = if specifier.starts_with('.') {
            Locality::Local
        } else if self.exists_as_path(specifier) || self.exists_with_suffix(specifier) {
            Locality::Local
        } else {
            Locality::External
        };

        tracing::trace!(
            file = %importing_file.display(),
            specifier,
            ?locality,
            "classified import"
        );
        locality
    }

    /// Shorthand for `classify(..) == Locality::Local`.
    pub fn is_local(&self, specifier: &str, importing_file: &Path) -> bool {
        self.classify(specifier, importing_file) == Locality::Local
    }

    fn exists_as_path(&self, specifier: &str) -> bool {
        let normalized = specifier.replace('/', MAIN_SEPARATOR_STR);
        self.workspace_root.join(normalized).exists()
    }

    fn exists_with_suffix(&self, specifier: &str) -> bool {
        CANDIDATE_SUFFIXES
            .iter()
            .any(|suffix| self.workspace_root.join(format!("{specifier}{suffix}")).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        fs::write(dir.path().join("src/api.ts"), "").unwrap();
        fs::write(dir.path().join("src/components/index.js"), "").unwrap();
        fs::write(dir.path().join("helpers.py"), "").unwrap();
        dir
    }

    #[test]
    fn test_relative_is_always_local() {
        let classifier = LocalityClassifier::new("/definitely/not/a/real/root");
        let file = Path::new("/definitely/not/a/real/root/a.py");
        assert!(classifier.is_local("./missing", file));
        assert!(classifier.is_local("../also/missing", file));
        assert!(classifier.is_local("..utils", file));
        assert!(classifier.is_local(".", file));
    }

    #[test]
    fn test_existing_path_is_local() {
        let ws = workspace();
        let classifier = LocalityClassifier::new(ws.path());
        let file = ws.path().join("main.ts");
        assert_eq!(classifier.classify("src/api.ts", &file), Locality::Local);
        assert_eq!(classifier.classify("src", &file), Locality::Local);
    }

    #[test]
    fn test_suffix_candidates_are_local() {
        let ws = workspace();
        let classifier = LocalityClassifier::new(ws.path());
        let file = ws.path().join("main.ts");
        assert!(classifier.is_local("src/api", &file));
        assert!(classifier.is_local("helpers", &file));
        assert!(classifier.is_local("src/components", &file));
    }

    #[test]
    fn test_nested_index_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/index.ts"), "").unwrap();
        let classifier = LocalityClassifier::new(dir.path());
        assert!(classifier.is_local("lib/index", &dir.path().join("a.ts")));
    }

    #[test]
    fn test_unknown_is_external() {
        let ws = workspace();
        let classifier = LocalityClassifier::new(ws.path());
        let file = ws.path().join("main.py");
        assert_eq!(classifier.classify("lodash", &file), Locality::External);
        assert_eq!(classifier.classify("os", &file), Locality::External);
    }

    #[test]
    fn test_dotted_python_names_are_not_normalized() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/mod.py"), "").unwrap();
        let classifier = LocalityClassifier::new(dir.path());
        let file = dir.path().join("main.py");
        assert!(!classifier.is_local("pkg.mod", &file));
        assert!(classifier.is_local("pkg", &file));
    }
}
