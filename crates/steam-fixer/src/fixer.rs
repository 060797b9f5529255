//! Fixer — applies repairs for the problems found by a scan.
//!
//! Every repair is an independent item: a failure is reported and counted, and
//! processing moves on to the next item. Before anything is written, all files
//! that will be modified are copied into a single backup; if that backup cannot
//! be taken, nothing is touched.

use crate::backup::BackupManager;
use crate::config::FixerConfig;
use crate::error::Result;
use crate::report::Reporter;
use crate::scanner::{GameIssue, LibraryInfo, OrphanedDownload, ScanReport};
use crate::steam::format_bytes;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Manifest field that selects the library used for staging updates.
pub const STAGING_FOLDER_PATH: [&str; 2] = ["AppState", "StagingFolder"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixSummary {
    pub fixed: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub backup_id: Option<String>,
}

pub struct Fixer<'a> {
    report: &'a ScanReport,
    backups: &'a BackupManager,
    dry_run: bool,
    summary: FixSummary,
}

impl<'a> Fixer<'a> {
    pub fn new(report: &'a ScanReport, backups: &'a BackupManager, config: &FixerConfig) -> Self {
        Self {
            report,
            backups,
            dry_run: config.dry_run,
            summary: FixSummary {
                dry_run: config.dry_run,
                ..FixSummary::default()
            },
        }
    }

    /// Repair everything in the report.
    ///
    /// Only a failed pre-fix backup is returned as an error; per-item failures
    /// are counted in [`FixSummary::failed`].
    pub fn fix_all(mut self, reporter: &mut dyn Reporter) -> Result<FixSummary> {
        reporter.heading("Fixing Issues");

        if !self.dry_run {
            let files = self.files_to_backup();
            if !files.is_empty() {
                reporter.info(&format!("Creating backup of {} files...", files.len()));
                let id = self.backups.create_backup(&files, "Pre-fix backup")?;
                reporter.success(&format!("Backup created: {id}"));
                self.summary.backup_id = Some(id);
            }
        }

        let report = self.report;
        for issue in &report.issues {
            self.fix_staging_folder(issue, reporter);
        }

        for orphaned in &report.orphaned_downloads {
            self.clean_orphaned_download(orphaned, reporter);
        }

        let dead: Vec<&LibraryInfo> = report.dead_libraries().collect();
        if !dead.is_empty() {
            self.remove_dead_libraries(&dead, reporter);
        }

        Ok(self.summary)
    }

    /// Every file a non-dry run may rewrite, without duplicates.
    pub fn files_to_backup(&self) -> Vec<PathBuf> {
        let mut files = BTreeSet::new();
        if self.report.dead_libraries().next().is_some() {
            files.insert(self.report.library_vdf_path.clone());
        }
        for issue in &self.report.issues {
            files.insert(issue.manifest_path.clone());
        }
        files.into_iter().collect()
    }

    fn fix_staging_folder(&mut self, issue: &GameIssue, reporter: &mut dyn Reporter) {
        reporter.info(&format!(
            "Fixing {} (App ID: {})",
            issue.game_name, issue.app_id
        ));
        reporter.debug(&format!("  Issue: {}", issue.description));
        reporter.debug(&format!("  Current: StagingFolder = {}", issue.current_value));
        reporter.debug(&format!("  Expected: StagingFolder = {}", issue.expected_value));

        if self.dry_run {
            reporter.info(&format!(
                "  [DRY RUN] Would change StagingFolder from {} to {}",
                issue.current_value, issue.expected_value
            ));
            self.summary.fixed += 1;
            return;
        }

        match set_manifest_field(&issue.manifest_path, &STAGING_FOLDER_PATH, &issue.expected_value) {
            Ok(()) => {
                reporter.success(&format!("  Fixed StagingFolder for {}", issue.game_name));
                self.summary.fixed += 1;
            }
            Err(e) => {
                reporter.error(&format!("  Error fixing {}: {e}", issue.game_name));
                self.summary.failed += 1;
            }
        }
    }

    fn clean_orphaned_download(&mut self, orphaned: &OrphanedDownload, reporter: &mut dyn Reporter) {
        let report = self.report;
        let game_name = report
            .game(&orphaned.app_id)
            .map(|g| g.name.as_str())
            .unwrap_or("Unknown");
        let count = orphaned.files.len();
        let size = format_bytes(orphaned.total_size);

        reporter.info(&format!(
            "Cleaning orphaned downloads for {game_name} (App ID: {})",
            orphaned.app_id
        ));
        reporter.debug(&format!("  Location: {}", orphaned.library_path.display()));
        reporter.debug(&format!("  Files: {count}, Size: {size}"));

        if self.dry_run {
            reporter.info(&format!(
                "  [DRY RUN] Would delete {count} orphaned files ({size})"
            ));
            self.summary.fixed += 1;
            return;
        }

        let root = &orphaned.root;
        let removed = if root.is_dir() {
            std::fs::remove_dir_all(root)
        } else {
            std::fs::remove_file(root)
        };
        match removed {
            Ok(()) => reporter.success(&format!("  Cleaned {count} orphaned files")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                reporter.debug(&format!("  Already gone: {}", root.display()));
            }
            Err(e) => reporter.warn(&format!("  Failed to delete {}: {e}", root.display())),
        }
        self.summary.fixed += 1;
    }

    fn remove_dead_libraries(&mut self, dead: &[&LibraryInfo], reporter: &mut dyn Reporter) {
        reporter.info(&format!("Removing {} dead library entries", dead.len()));
        for lib in dead {
            reporter.debug(&format!("  Library {}: {}", lib.id, lib.path.display()));
        }

        if self.dry_run {
            reporter.info(&format!(
                "  [DRY RUN] Would remove {} library entries",
                dead.len()
            ));
            self.summary.fixed += 1;
            return;
        }

        let ids: Vec<&str> = dead.iter().map(|lib| lib.id.as_str()).collect();
        match remove_library_entries(&self.report.library_vdf_path, &ids) {
            Ok(()) => {
                reporter.success(&format!("  Removed {} dead library entries", dead.len()));
                self.summary.fixed += 1;
            }
            Err(e) => {
                reporter.error(&format!("  Error removing dead libraries: {e}"));
                self.summary.failed += 1;
            }
        }
    }
}

/// Load a VDF file, overwrite one existing field and write it back.
pub fn set_manifest_field(path: &Path, field: &[&str], value: &str) -> vdf_core::Result<()> {
    let mut doc = vdf_core::load(path)?;
    doc.set_scalar(field, value)?;
    vdf_core::save(&doc, path)
}

/// Drop library folders by id from `libraryfolders.vdf`.
pub fn remove_library_entries(path: &Path, ids: &[&str]) -> vdf_core::Result<()> {
    let mut doc = vdf_core::load(path)?;
    for id in ids {
        doc.delete(&["libraryfolders", *id]);
    }
    vdf_core::save(&doc, path)
}
