//! NDJSON movement input for `run` and `resolve`.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::domain::RawMovement;
use crate::error::Result;

pub type MovementLines = Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

/// Open a file, or stdin for `None` and `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn open(path: Option<&Path>) -> Result<MovementLines> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = match path {
        Some(path) if path != Path::new("-") => Box::new(tokio::fs::File::open(path).await?),
        _ => Box::new(tokio::io::stdin()),
    };
    Ok(BufReader::new(reader).lines())
}

/// Parse one NDJSON line; blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<RawMovement>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line).map_err(Into::into))
}
