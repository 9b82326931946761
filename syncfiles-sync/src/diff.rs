//! Unified diff preview of what a copy would change.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

/// Rendered difference between a destination and the master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDiff {
    /// Line diff from the destination's current text to the master's.
    Text { path: PathBuf, unified_diff: String },
    /// One side is not valid UTF-8.
    Binary { path: PathBuf },
}

/// Diff `dest` against `master` as it would look after the copy.
///
/// A missing destination diffs against empty text.
pub fn diff_against_master(master: &Path, dest: &Path) -> std::io::Result<FileDiff> {
    let new = std::fs::read(master)?;
    let old = read_existing_or_empty(dest)?;

    let (Ok(old), Ok(new)) = (String::from_utf8(old), String::from_utf8(new)) else {
        return Ok(FileDiff::Binary {
            path: dest.to_path_buf(),
        });
    };

    let old_header = format!("a/{}", dest.display());
    let new_header = format!("b/{}", master.display());
    let unified = TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(FileDiff::Text {
        path: dest.to_path_buf(),
        unified_diff: unified,
    })
}

fn read_existing_or_empty(path: &Path) -> std::io::Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}
