//! Shared types for the request/response envelope.
//!
//! The wire format is loose JSON; it is deserialized into [`RawRequest`]
//! and validated into a [`Request`] before anything else sees it. Result
//! records are built fresh for each file and serialized once.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The request object as it arrives on the wire.
///
/// Every field is optional here; [`super::request::validate`] decides what
/// a missing field means.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRequest {
    /// Name of the analysis to run.
    #[serde(alias = "tool")]
    pub operation: Option<String>,

    /// Operation arguments.
    #[serde(default)]
    pub args: Option<RawArgs>,

    /// Root directory used to classify imports.
    #[serde(rename = "workspaceRoot", alias = "workspacePath")]
    pub workspace_root: Option<String>,
}

/// Arguments object inside a [`RawRequest`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawArgs {
    #[serde(rename = "filePaths")]
    pub file_paths: Option<Vec<String>>,
}

/// The analyses this runner knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Extract and classify imports per file.
    ImportGraph,
    /// Score per-function complexity of Python files.
    Complexity,
}

impl Operation {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ImportGraph => "extract_import_graph",
            Operation::Complexity => "analyze_complexity",
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extract_import_graph" => Ok(Operation::ImportGraph),
            "analyze_complexity" => Ok(Operation::Complexity),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub operation: Operation,
    /// Paths exactly as given, duplicates included.
    pub file_paths: Vec<String>,
    pub workspace_root: PathBuf,
}

/// Imports found in one file.
///
/// `local_deps` and `external_deps` partition `imports`, each keeping the
/// extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub file_path: String,
    pub imports: Vec<String>,
    pub local_deps: Vec<String>,
    pub external_deps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportRecord {
    /// A record with no imports.
    pub fn empty(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// A record with no imports and an error message.
    pub fn failed(file_path: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::empty(file_path)
        }
    }
}

/// Complexity of one function-like unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityEntry {
    pub name: String,
    pub complexity: u32,
    /// 1-based line where the unit begins.
    pub line: usize,
}

/// Complexity results for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityRecord {
    pub file_path: String,
    pub complexity: Vec<ComplexityEntry>,
    pub maintainability_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComplexityRecord {
    pub fn empty(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    pub fn failed(file_path: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::empty(file_path)
        }
    }

    pub fn noted(file_path: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::empty(file_path)
        }
    }
}

/// Per-file results of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Imports(Vec<ImportRecord>),
    Complexity(Vec<ComplexityRecord>),
}

/// The response envelope: `{ok: true, result}` or `{ok: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(result: AnalysisOutput) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}
