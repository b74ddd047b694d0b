//! Loading source files for analysis.
//!
//! Both analyses resolve each requested path the same way and read text
//! with lossy UTF-8 decoding, so a file with stray bytes still produces
//! results instead of an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a source file.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file not found")]
    NotFound,

    #[error("not a regular file")]
    NotAFile,

    #[error("Failed to read file: {0}")]
    FileRead(#[from] io::Error),
}

/// Resolve a requested path to an absolute path.
///
/// Relative paths are taken against the process working directory. Paths
/// that exist are canonicalized; the rest are made absolute lexically so
/// the caller can still report them.
pub fn resolve_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Check that `path` names an existing regular file.
pub fn ensure_file(path: &Path) -> Result<(), SourceError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(SourceError::NotAFile),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SourceError::NotFound),
        Err(e) => Err(SourceError::FileRead(e)),
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences.
pub fn read_lossy(path: &Path) -> Result<String, SourceError> {
    ensure_file(path)?;
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lowercased extension of `path`, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
