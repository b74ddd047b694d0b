//! Request/response envelope for codescope-tools.
//!
//! A caller sends one JSON object and receives one JSON object back:
//!
//! ```text
//! {"operation": "extract_import_graph", "args": {"filePaths": ["src/app.py"]}, "workspaceRoot": "/srv/app"}
//! {"ok": true, "result": [{"filePath": "/srv/app/src/app.py", "imports": [...], ...}]}
//! ```
//!
//! `tool` and `workspacePath` are accepted as aliases of `operation` and
//! `workspaceRoot`.

pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types for convenience
pub use request::{parse_str, read_from, validate, RequestError, RequestResult};
pub use response::write_response;
pub use types::{
    AnalysisOutput, ComplexityEntry, ComplexityRecord, ImportRecord, Operation, RawArgs,
    RawRequest, Request, Response,
};
