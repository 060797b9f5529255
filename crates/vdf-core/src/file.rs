//! File codec: read a VDF file into a [`Document`] and write one back.
//!
//! `save` overwrites the whole file in place. There is no temp-file rename, so
//! callers that cannot tolerate a truncated file on interruption should back
//! the file up first.

use crate::decoder::parse;
use crate::encoder::serialize;
use crate::error::{Result, VdfError};
use crate::types::Document;
use std::io::ErrorKind;
use std::path::Path;

/// Read and parse a VDF file.
///
/// A missing file is reported as [`VdfError::NotFound`]; any other read
/// failure (permissions, invalid UTF-8, ...) as [`VdfError::Io`].
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            VdfError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            VdfError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse(&text))
}

/// Serialize `doc` and overwrite `path` with it.
pub fn save(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, serialize(doc)).map_err(|source| VdfError::Io {
        path: path.to_path_buf(),
        source,
    })
}
