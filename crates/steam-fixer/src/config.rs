//! Runtime settings shared by the scanner, fixer and backup manager.

use std::path::PathBuf;

pub const DEFAULT_BACKUP_DIR: &str = "backups";
/// Backups retained by `cleanup-backups` unless `--keep` says otherwise.
pub const DEFAULT_KEEP_BACKUPS: usize = 10;

#[derive(Debug, Clone)]
pub struct FixerConfig {
    /// Steam install root (the directory containing `steamapps`).
    pub steam_path: PathBuf,
    pub backup_dir: PathBuf,
    /// Report what would change without touching any file.
    pub dry_run: bool,
}

impl FixerConfig {
    pub fn new(steam_path: impl Into<PathBuf>) -> Self {
        Self {
            steam_path: steam_path.into(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            dry_run: false,
        }
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
