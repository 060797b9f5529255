//! Backups of Steam configuration files taken before they are rewritten.
//!
//! Layout on disk:
//!
//! ```text
//! <backup dir>/
//!   backup_20240101_120000/
//!     manifest.json
//!     appmanifest_570.acf
//!     libraryfolders.vdf
//! ```
//!
//! `manifest.json` records where each file came from so that
//! [`BackupManager::restore_backup`] can put it back.

use crate::error::{FixerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub original_path: PathBuf,
    /// Copy location, relative to the backup's own directory.
    pub backup_path: PathBuf,
    pub timestamp: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_id: String,
    pub timestamp: String,
    pub steam_path: PathBuf,
    pub files: Vec<BackupEntry>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    /// Use `dir` as the backup root, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| FixerError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `files` into a new backup and return its id.
    ///
    /// Files that do not exist are skipped. The Steam root recorded in the
    /// manifest is inferred from the first file (`<steam>/steamapps/<file>`).
    pub fn create_backup(&self, files: &[PathBuf], description: &str) -> Result<String> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let (backup_id, backup_dir) = self.allocate_backup_dir(&timestamp)?;

        let mut entries = Vec::new();
        let mut used_names = HashSet::from([MANIFEST_FILE.to_string()]);
        for file in files {
            let Ok(meta) = fs::metadata(file) else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }

            let name = unique_file_name(file, &mut used_names);
            fs::copy(file, backup_dir.join(&name)).map_err(|e| FixerError::io(file, e))?;

            entries.push(BackupEntry {
                original_path: file.clone(),
                backup_path: PathBuf::from(name),
                timestamp: timestamp.clone(),
                file_size: meta.len(),
            });
        }

        let steam_path = files
            .first()
            .and_then(|f| f.parent()?.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let description = if description.is_empty() {
            format!("Backup created at {timestamp}")
        } else {
            description.to_string()
        };

        let manifest = BackupManifest {
            backup_id: backup_id.clone(),
            timestamp,
            steam_path,
            files: entries,
            description,
        };
        let manifest_path = backup_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest).map_err(|source| {
            FixerError::Manifest {
                path: manifest_path.clone(),
                source,
            }
        })?;
        fs::write(&manifest_path, json).map_err(|e| FixerError::io(&manifest_path, e))?;

        Ok(backup_id)
    }

    /// Copy every file of backup `backup_id` back to its original location.
    /// Returns the number of files restored.
    pub fn restore_backup(&self, backup_id: &str) -> Result<usize> {
        let manifest = self
            .read_manifest(backup_id)?
            .ok_or_else(|| FixerError::BackupNotFound(backup_id.to_string()))?;
        let backup_dir = self.dir.join(backup_id);

        // Check everything first so a broken backup restores nothing
        let mut pairs = Vec::with_capacity(manifest.files.len());
        for entry in &manifest.files {
            if !is_single_component(&entry.backup_path) {
                return Err(FixerError::InvalidBackupEntry(entry.backup_path.clone()));
            }
            let source = backup_dir.join(&entry.backup_path);
            if !source.is_file() {
                return Err(FixerError::BackupFileMissing(source));
            }
            pairs.push((source, &entry.original_path));
        }

        for (source, original) in &pairs {
            if let Some(parent) = original.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| FixerError::io(parent, e))?;
            }
            fs::copy(source, original).map_err(|e| FixerError::io(original, e))?;
        }

        Ok(pairs.len())
    }

    /// All readable backups, newest first.
    pub fn list_backups(&self) -> Vec<BackupManifest> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut backups: Vec<BackupManifest> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let id = e.file_name().into_string().ok()?;
                self.read_manifest(&id).ok().flatten()
            })
            .collect();
        backups.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.backup_id.cmp(&a.backup_id))
        });
        backups
    }

    pub fn get_backup(&self, backup_id: &str) -> Option<BackupManifest> {
        self.read_manifest(backup_id).ok().flatten()
    }

    pub fn latest_backup(&self) -> Option<BackupManifest> {
        self.list_backups().into_iter().next()
    }

    /// Remove a backup directory. Returns `false` if it did not exist.
    pub fn delete_backup(&self, backup_id: &str) -> Result<bool> {
        if !is_valid_id(backup_id) {
            return Ok(false);
        }
        let path = self.dir.join(backup_id);
        if !path.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&path).map_err(|e| FixerError::io(&path, e))?;
        Ok(true)
    }

    /// Delete all but the `keep` newest backups. Returns how many were deleted.
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<usize> {
        let mut deleted = 0;
        for backup in self.list_backups().into_iter().skip(keep) {
            if self.delete_backup(&backup.backup_id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// `Ok(None)` when there is no such backup; `Err` when its manifest is corrupt.
    fn read_manifest(&self, backup_id: &str) -> Result<Option<BackupManifest>> {
        if !is_valid_id(backup_id) {
            return Ok(None);
        }
        let path = self.dir.join(backup_id).join(MANIFEST_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FixerError::io(&path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| FixerError::Manifest { path, source })
    }

    /// Create `backup_<timestamp>`, or `backup_<timestamp>_N` if taken.
    fn allocate_backup_dir(&self, timestamp: &str) -> Result<(String, PathBuf)> {
        let base = format!("backup_{timestamp}");
        let mut id = base.clone();
        let mut n = 1;
        loop {
            let path = self.dir.join(&id);
            match fs::create_dir(&path) {
                Ok(()) => return Ok((id, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    id = format!("{base}_{n}");
                    n += 1;
                }
                Err(e) => return Err(FixerError::io(&path, e)),
            }
        }
    }
}

/// Backup ids are single path components.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

/// Copies live directly inside their backup directory.
fn is_single_component(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// The file's own name, prefixed with a counter if another file in the same
/// backup already uses it.
fn unique_file_name(file: &Path, used: &mut HashSet<String>) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let mut candidate = name.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{n}_{name}");
        n += 1;
    }
    candidate
}
