//! Writing the response envelope.
//!
//! The response is always a single JSON document followed by a newline.

use std::io::{self, Write};

use super::types::Response;

/// Write `response` to `writer` as one line of JSON.
///
/// With `pretty` set the document is indented; it is still one document
/// terminated by a single newline.
pub fn write_response<W: Write>(response: &Response, writer: &mut W, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, response)?;
    } else {
        serde_json::to_writer(&mut *writer, response)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()
}
