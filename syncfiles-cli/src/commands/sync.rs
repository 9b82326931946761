//! `syncfiles <file> <file> ...` — propagate the newest file to the rest.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use syncfiles_sync::{
    diff::{diff_against_master, FileDiff},
    synchronize_with, LocalFs, SyncError, SyncEvent, SyncOptions, SyncReport,
};

use crate::{EX_NOINPUT, EX_USAGE, USAGE};

/// Arguments for a synchronization run.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Files to synchronize; the most recently modified one wins.
    #[arg(value_name = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Show what would be copied without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Print a unified diff for every file that is (or would be) overwritten.
    #[arg(long, conflicts_with = "json")]
    pub diff: bool,

    /// Print a JSON summary instead of the usual messages.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<ExitCode> {
        // Counted here rather than by clap so flags may sit between files.
        if self.files.len() < 2 {
            eprintln!("Usage: {USAGE}");
            return Ok(ExitCode::from(EX_USAGE));
        }

        let options = SyncOptions {
            dry_run: self.dry_run,
        };
        let narrate = !self.json;
        let show_diff = self.diff;

        let result = synchronize_with(LocalFs, &self.files, options, |event| {
            if show_diff {
                if let SyncEvent::Differs { master, path } = event {
                    print_diff(master, path);
                }
            }
            if narrate {
                print_event(event);
            }
        });

        let report = match result {
            Ok(report) => report,
            Err(SyncError::NoFilesExist) => {
                eprintln!("Error: No files exist");
                return Ok(ExitCode::from(EX_NOINPUT));
            }
            Err(err) => return Err(err).context("synchronization stopped"),
        };

        if self.json {
            print_json(&report)?;
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn print_event(event: &SyncEvent<'_>) {
    match event {
        SyncEvent::MasterSelected { master } => println!("Master file: {}", master.display()),
        SyncEvent::Copied { from, to } => {
            println!("Copied: {} -> {}", from.display(), to.display())
        }
        SyncEvent::WouldCopy { from, to } => {
            println!("[dry-run] Would copy: {} -> {}", from.display(), to.display())
        }
        SyncEvent::Differs { .. } => {}
    }
}

fn print_diff(master: &Path, path: &Path) {
    match diff_against_master(master, path) {
        Ok(FileDiff::Text { unified_diff, .. }) => print!("{unified_diff}"),
        Ok(FileDiff::Binary { path }) => println!(
            "Binary files {} and {} differ",
            path.display(),
            master.display()
        ),
        Err(err) => tracing::warn!("cannot diff {}: {err}", path.display()),
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    master: &'a Path,
    dry_run: bool,
    copied: Vec<&'a Path>,
    unchanged: Vec<&'a Path>,
}

fn print_json(report: &SyncReport) -> Result<()> {
    let summary = JsonSummary {
        master: &report.master,
        dry_run: report.dry_run,
        copied: report.copied(),
        unchanged: report.unchanged(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to serialize sync summary")?
    );
    Ok(())
}
