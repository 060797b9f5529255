//! # steam-fixer
//!
//! Detects and repairs common Steam library misconfigurations using the
//! [`vdf_core`] codec:
//!
//! - games whose updates stage in a different (or vanished) library
//! - leftover download data in secondary libraries
//! - library folders that no longer exist on disk
//!
//! Files are backed up before they are rewritten and can be restored later.
//!
//! ## Modules
//!
//! - [`scanner`] — read `libraryfolders.vdf` and app manifests, classify issues
//! - [`fixer`] — apply repairs, one independent item at a time
//! - [`backup`] — create, list, restore and prune backups
//! - [`steam`] — install discovery and naming conventions
//! - [`report`] — progress reporting sink
//! - [`config`] — runtime settings
//! - [`error`] — [`FixerError`]

pub mod backup;
pub mod config;
pub mod error;
pub mod fixer;
pub mod report;
pub mod scanner;
pub mod steam;

pub use backup::{BackupEntry, BackupManager, BackupManifest};
pub use config::FixerConfig;
pub use error::{FixerError, Result};
pub use fixer::{FixSummary, Fixer};
pub use report::{LogReporter, MemoryReporter, Reporter};
pub use scanner::{
    GameInfo, GameIssue, IssueKind, LibraryInfo, OrphanedDownload, ScanReport, ScanSummary,
    Scanner, Severity,
};
