//! Content fingerprinting and hash-based file grouping.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::infra::io::read_text;

/// A set of file paths sharing byte-identical content at the time the
/// group was formed, keyed by content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// blake3 digest of the content, fixed-width lowercase hex
    pub hash: String,
    /// Member paths in input order; never empty
    pub paths: Vec<PathBuf>,
}

/// Fingerprint the UTF-8 bytes of `text` as a blake3 hex digest.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Read every path and partition the set into groups of identical content.
///
/// Unreadable files are warned about and excluded; the run continues with
/// the rest. Returns the groups (in first-seen order, paths in input
/// order) and the number of files skipped. `on_file` is invoked once per
/// path for progress reporting.
pub fn group_files<F>(paths: &[PathBuf], mut on_file: F) -> (Vec<FileGroup>, usize)
where
    F: FnMut(&Path),
{
    let mut groups: Vec<FileGroup> = Vec::new();
    let mut skipped = 0usize;

    for path in paths {
        on_file(path);
        match read_text(path) {
            Ok(text) => {
                let hash = fingerprint(&text);
                if let Some(group) = groups.iter_mut().find(|g| g.hash == hash) {
                    group.paths.push(path.clone());
                } else {
                    debug!(hash = %hash, path = %path.display(), "new content group");
                    groups.push(FileGroup {
                        hash,
                        paths: vec![path.clone()],
                    });
                }
            }
            Err(err) => {
                warn!("skipping {}: {err:#}", path.display());
                skipped += 1;
            }
        }
    }

    (groups, skipped)
}
