//! Text file read/write helpers with contextual errors.
//!
//! Content is treated as newline-delimited UTF-8 text throughout the
//! engine, so plain string reads are all we need.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a file's full text.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Overwrite a file with `text`.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
