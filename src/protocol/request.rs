//! Reading and validating the request envelope.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::types::{Operation, RawRequest, Request};

/// Errors that can occur while reading a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Failed to read the request stream.
    #[error("Failed to read request: {0}")]
    IoError(#[from] std::io::Error),

    /// The request is not a JSON object of the expected shape.
    #[error("Failed to parse request: {0}")]
    JsonError(#[from] serde_json::Error),

    /// No operation name was given.
    #[error("missing tool")]
    MissingOperation,

    /// The operation name is not one this runner handles.
    #[error("unknown tool: {0}")]
    UnknownOperation(String),
}

/// Result type alias for request handling.
pub type RequestResult<T> = Result<T, RequestError>;

/// Read the whole of `reader` and parse it as a raw request.
pub fn read_from<R: Read>(mut reader: R) -> RequestResult<RawRequest> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_str(&content)
}

/// Parse a raw request from a string. Blank input is an empty request.
///
/// # Example
///
/// ```
/// use codescope_tools::protocol::request::parse_str;
///
/// let raw = parse_str(r#"{"operation": "analyze_complexity"}"#).unwrap();
/// assert_eq!(raw.operation.as_deref(), Some("analyze_complexity"));
/// assert!(parse_str("   ").unwrap().operation.is_none());
/// ```
pub fn parse_str(content: &str) -> RequestResult<RawRequest> {
    if content.trim().is_empty() {
        return Ok(RawRequest::default());
    }
    Ok(serde_json::from_str(content)?)
}

/// Turn a raw request into a typed one.
///
/// A missing or empty workspace root falls back to `default_root`; missing
/// file paths mean an empty batch.
pub fn validate(raw: RawRequest, default_root: &Path) -> RequestResult<Request> {
    let name = raw
        .operation
        .filter(|name| !name.is_empty())
        .ok_or(RequestError::MissingOperation)?;
    let operation = name
        .parse::<Operation>()
        .map_err(RequestError::UnknownOperation)?;

    let file_paths = raw.args.and_then(|a| a.file_paths).unwrap_or_default();
    let workspace_root = raw
        .workspace_root
        .filter(|root| !root.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_root.to_path_buf());

    Ok(Request {
        operation,
        file_paths,
        workspace_root,
    })
}
