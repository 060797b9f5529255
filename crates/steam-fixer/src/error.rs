//! Error types for scanning, fixing and backup operations.

use std::path::PathBuf;
use thiserror::Error;
use vdf_core::VdfError;

#[derive(Error, Debug)]
pub enum FixerError {
    /// Loading, saving or editing a VDF file failed.
    #[error(transparent)]
    Vdf(#[from] VdfError),

    /// A filesystem operation outside the VDF codec failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a Steam installation (no steamapps directory): {}", .0.display())]
    InvalidSteamPath(PathBuf),

    #[error("backup not found: {0}")]
    BackupNotFound(String),

    #[error("backed up file is missing: {}", .0.display())]
    BackupFileMissing(PathBuf),

    /// A manifest entry points outside its backup directory.
    #[error("invalid file entry in backup manifest: {}", .0.display())]
    InvalidBackupEntry(PathBuf),

    #[error("invalid backup manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FixerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixerError>;
