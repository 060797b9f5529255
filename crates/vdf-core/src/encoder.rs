//! VDF Encoder — renders a [`Document`] as canonical VDF text.
//!
//! The writer reproduces the logical tree only. Comments, blank lines and the
//! original quoting style are not preserved. Output shape:
//!
//! ```text
//! "AppState"
//! {
//! 	"appid"		"570"
//! 	"UserConfig"
//! 	{
//! 		"language"		"english"
//! 	}
//! }
//! ```
//!
//! - Keys and scalar values are always quoted.
//! - One tab of indentation per nesting level.
//! - Key and scalar value are separated by two tabs.
//! - Lines are joined with `\n`; there is no trailing newline.

use crate::types::{Document, Value};

/// Serialize a document to VDF text.
///
/// ```
/// use vdf_core::{serialize, Document};
///
/// let mut doc = Document::new();
/// doc.insert("name", "Example Game");
/// assert_eq!(serialize(&doc), "\"name\"\t\t\"Example Game\"");
/// ```
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    encode_entries(doc, 0, &mut out);
    out
}

/// Alias of [`serialize`], named to pair with [`crate::parse`] in codec-style call sites.
pub fn encode(doc: &Document) -> String {
    serialize(doc)
}

/// Emit every entry of `doc` at `depth`, each on its own line.
fn encode_entries(doc: &Document, depth: usize, out: &mut String) {
    for (key, value) in doc.iter() {
        match value {
            Value::Scalar(text) => {
                push_line_start(depth, out);
                push_quoted(key, out);
                out.push_str("\t\t");
                push_quoted(text, out);
            }
            Value::Section(nested) => {
                push_line_start(depth, out);
                push_quoted(key, out);
                push_line_start(depth, out);
                out.push('{');
                encode_entries(nested, depth + 1, out);
                push_line_start(depth, out);
                out.push('}');
            }
        }
    }
}

/// Start a new line (unless this is the very first) and indent it.
fn push_line_start(depth: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push('\t');
    }
}

fn push_quoted(s: &str, out: &mut String) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}
