//! Newest-wins synchronization.
//!
//! A run has two phases:
//!
//! 1. **Select** the master: the existing path with the latest modification
//!    time. Unreadable paths are skipped; equal times keep the earlier path.
//! 2. **Propagate**: copy the master onto every other path whose contents
//!    differ. A failed comparison counts as "differs"; a failed copy ends the
//!    run.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::error::{copy_err, SyncError};
use crate::fs::{FileSystem, LocalFs};

/// Knobs for a synchronization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Select and compare as usual but never copy.
    pub dry_run: bool,
}

/// Progress notifications, delivered as the run happens.
///
/// `Differs` fires before the copy is attempted, so an observer can inspect
/// the destination while it still holds its old contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent<'a> {
    MasterSelected { master: &'a Path },
    Differs { master: &'a Path, path: &'a Path },
    Copied { from: &'a Path, to: &'a Path },
    WouldCopy { from: &'a Path, to: &'a Path },
}

/// What happened to one entry of the synchronization set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The entry names the master itself.
    Master { path: PathBuf },
    /// Contents already matched the master.
    Unchanged { path: PathBuf },
    /// The master was copied onto this path.
    Copied { path: PathBuf },
    /// `dry_run`: the master *would* have been copied onto this path.
    WouldCopy { path: PathBuf },
}

impl SyncOutcome {
    pub fn path(&self) -> &Path {
        match self {
            SyncOutcome::Master { path }
            | SyncOutcome::Unchanged { path }
            | SyncOutcome::Copied { path }
            | SyncOutcome::WouldCopy { path } => path,
        }
    }
}

/// Summary of a successful run. `outcomes` follows input order, one entry per
/// input path (duplicates included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub master: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    /// Paths that were (or, in a dry run, would have been) overwritten.
    pub fn copied(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SyncOutcome::Copied { .. } | SyncOutcome::WouldCopy { .. }))
            .map(SyncOutcome::path)
            .collect()
    }

    /// Paths whose contents already matched the master.
    pub fn unchanged(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SyncOutcome::Unchanged { .. }))
            .map(SyncOutcome::path)
            .collect()
    }
}

/// Pick the most recently modified existing path.
///
/// Paths whose modification time cannot be read are ignored. On equal times
/// the earliest path in `paths` wins.
pub fn select_master<F, P>(fs: &F, paths: &[P]) -> Result<PathBuf, SyncError>
where
    F: FileSystem + ?Sized,
    P: AsRef<Path>,
{
    let mut newest: Option<(&Path, SystemTime)> = None;
    for path in paths {
        let path = path.as_ref();
        let mtime = match fs.modified(path) {
            Ok(mtime) => mtime,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", path.display());
                continue;
            }
        };
        match newest {
            Some((_, best)) if mtime <= best => {}
            _ => newest = Some((path, mtime)),
        }
    }
    newest
        .map(|(path, _)| path.to_path_buf())
        .ok_or(SyncError::NoFilesExist)
}

/// Synchronize `paths` on the local filesystem.
pub fn synchronize<P: AsRef<Path>>(paths: &[P]) -> Result<SyncReport, SyncError> {
    synchronize_with(LocalFs, paths, SyncOptions::default(), |_| {})
}

/// Synchronize `paths` through `fs`, reporting progress to `on_event`.
///
/// Stops at the first failed copy; destinations after it are left alone.
pub fn synchronize_with<F, P, E>(
    fs: F,
    paths: &[P],
    options: SyncOptions,
    mut on_event: E,
) -> Result<SyncReport, SyncError>
where
    F: FileSystem,
    P: AsRef<Path>,
    E: FnMut(&SyncEvent<'_>),
{
    let master = select_master(&fs, paths)?;
    tracing::debug!("master: {}", master.display());
    on_event(&SyncEvent::MasterSelected { master: &master });

    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if path.as_os_str() == master.as_os_str() {
            outcomes.push(SyncOutcome::Master {
                path: path.to_path_buf(),
            });
            continue;
        }

        let same = fs.same_contents(&master, path).unwrap_or_else(|e| {
            tracing::debug!("cannot compare {}: {e}", path.display());
            false
        });
        if same {
            tracing::debug!("unchanged: {}", path.display());
            outcomes.push(SyncOutcome::Unchanged {
                path: path.to_path_buf(),
            });
            continue;
        }

        on_event(&SyncEvent::Differs {
            master: &master,
            path,
        });

        if options.dry_run {
            tracing::info!("[dry-run] would copy: {} -> {}", master.display(), path.display());
            on_event(&SyncEvent::WouldCopy {
                from: &master,
                to: path,
            });
            outcomes.push(SyncOutcome::WouldCopy {
                path: path.to_path_buf(),
            });
            continue;
        }

        fs.copy(&master, path)
            .map_err(|e| copy_err(&master, path, e))?;
        tracing::info!("copied: {} -> {}", master.display(), path.display());
        on_event(&SyncEvent::Copied {
            from: &master,
            to: path,
        });
        outcomes.push(SyncOutcome::Copied {
            path: path.to_path_buf(),
        });
    }

    Ok(SyncReport {
        master,
        dry_run: options.dry_run,
        outcomes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
