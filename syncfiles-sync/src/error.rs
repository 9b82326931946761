//! Error types for syncfiles-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a synchronization run.
///
/// Per-file trouble during master selection and failed content comparisons
/// are not represented here; they only exclude a candidate or force a copy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// None of the listed paths had a readable modification time.
    #[error("No files exist")]
    NoFilesExist,

    /// Copying the master onto a destination failed. Propagation stops here.
    #[error("failed to copy {from} -> {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Copy`].
pub(crate) fn copy_err(
    from: impl Into<PathBuf>,
    to: impl Into<PathBuf>,
    source: std::io::Error,
) -> SyncError {
    SyncError::Copy {
        from: from.into(),
        to: to.into(),
        source,
    }
}
