//! # vdf-core
//!
//! Parser, document model and writer for Valve's text **KeyValues** format (VDF),
//! as used by Steam in `libraryfolders.vdf` and `appmanifest_*.acf`.
//!
//! The parser is permissive: malformed lines are skipped and unterminated
//! sections yield a partial tree, so hand-edited files still load. The writer
//! emits a canonical rendering of the logical tree. Scalars are stored as the
//! exact text from the file; numeric views are available through typed
//! accessors on [`Value`].
//!
//! ## Quick start
//!
//! ```rust
//! use vdf_core::{parse, serialize, Value};
//!
//! let text = r#"
//! "AppState"
//! {
//!     "name"          "Example Game"
//!     "StagingFolder" "2"
//! }
//! "#;
//!
//! let mut doc = parse(text);
//! assert_eq!(doc.get(&["AppState", "StagingFolder"]), Some(&Value::scalar("2")));
//!
//! doc.set_scalar(&["AppState", "StagingFolder"], "0").unwrap();
//! let back = parse(&serialize(&doc));
//! assert_eq!(back.get_str(&["AppState", "StagingFolder"]), Some("0"));
//! assert_eq!(back.get_str(&["AppState", "name"]), Some("Example Game"));
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`] — one line → tokens
//! - [`decoder`] — text → [`Document`]
//! - [`types`] — [`Value`], [`Document`] and the path API
//! - [`encoder`] — [`Document`] → text
//! - [`file`] — `load` / `save` on the filesystem
//! - [`error`] — [`VdfError`]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod file;
pub mod tokenizer;
pub mod types;

pub use decoder::{parse, LineCursor};
pub use encoder::{encode, serialize};
pub use error::{Result, VdfError};
pub use file::{load, save};
pub use tokenizer::tokenize;
pub use types::{Document, Value};
