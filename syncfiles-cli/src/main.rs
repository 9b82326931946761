//! syncfiles — make a set of files match the most recently modified one.
//!
//! # Usage
//!
//! ```text
//! syncfiles <file> <file> [<file> ...]
//! ```
//!
//! Options (`--dry-run`, `--diff`, `--json`) may appear anywhere among the
//! files; `--diff` and `--json` are mutually exclusive.
//!
//! Exit status follows `sysexits.h`: 0 on success, 64 on a usage error,
//! 66 when none of the files exist, 74 when a copy fails.

mod commands;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use commands::sync::SyncArgs;

pub(crate) const USAGE: &str = "syncfiles <file> <file> [<file> ...]";

pub(crate) const EX_USAGE: u8 = 64;
pub(crate) const EX_NOINPUT: u8 = 66;
pub(crate) const EX_IOERR: u8 = 74;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "syncfiles",
    version,
    about = "Copy the newest of several files onto all the others",
    override_usage = USAGE,
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EX_USAGE),
            };
        }
    };

    init_tracing();

    match cli.sync.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EX_IOERR)
        }
    }
}

/// Log to stderr so stdout carries only the sync narration.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
