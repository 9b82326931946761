//! # syncfiles-sync
//!
//! Newest-wins file mirroring.
//!
//! Call [`synchronize`] to make every listed path hold the contents of the
//! most recently modified one, or [`synchronize_with`] to supply a custom
//! [`FileSystem`], [`SyncOptions`] and an event observer.

pub mod diff;
pub mod error;
pub mod fs;
pub mod synchronizer;

pub use error::SyncError;
pub use fs::{FileSystem, LocalFs};
pub use synchronizer::{
    select_master, synchronize, synchronize_with, SyncEvent, SyncOptions, SyncOutcome, SyncReport,
};
