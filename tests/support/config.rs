use std::path::PathBuf;

use tempfile::TempDir;

/// Write `content` as `config.toml` in a fresh temp dir.
///
/// Keep the returned dir alive for as long as the path is used.
pub fn write_temp_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

/// Write NDJSON lines to `movements.ndjson` inside `dir`.
pub fn write_movements(dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = dir.path().join("movements.ndjson");
    std::fs::write(&path, lines.join("\n")).expect("write movements");
    path
}

pub const NORMAL_LINE: &str = r#"{"destination":"2352","sourceLocation":"960","destinationLocation":"2352","servicingNodes":["960","1001","1002"],"status":"PLANNED"}"#;

pub const REVERSE_LINE: &str = r#"{"destination":"960","sourceLocation":"2352","destinationLocation":"960","servicingNodes":["960","1001","1002"],"status":"PLANNED"}"#;

pub const SELF_LOOP_LINE: &str = r#"{"destination":"2352","sourceLocation":"2352","destinationLocation":"2352","servicingNodes":["960"],"status":"PLANNED"}"#;
