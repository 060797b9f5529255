//! Error types for VDF file and document operations.
//!
//! Parsing itself never fails: malformed lines are absorbed into a partial tree.
//! Errors only come from the filesystem or from path-based mutations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or mutating a VDF document.
#[derive(Error, Debug)]
pub enum VdfError {
    /// The source file does not exist.
    #[error("VDF file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A mutation addressed a key whose parent section does not exist.
    /// `path` is the full key path joined with `.`.
    #[error("path not found in document: {path}")]
    PathNotFound { path: String },

    /// A mutation was given an empty path or an empty final key.
    #[error("invalid document path")]
    InvalidPath,

    /// Reading or writing the underlying file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout vdf-core.
pub type Result<T> = std::result::Result<T, VdfError>;
