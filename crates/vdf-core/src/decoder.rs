//! VDF Decoder — recursive-descent parser from text to [`Document`].
//!
//! The format is line oriented: each statement is either a key/value pair on
//! one line, a bare key whose section opens with `{` on a following line, or a
//! closing `}`. The parser is intentionally permissive because files in the
//! wild are hand edited:
//!
//! - Blank lines and `//` comment lines are skipped.
//! - Lines with three or more tokens are dropped.
//! - A `{` with no preceding key is dropped.
//! - Two bare keys in a row: the first is discarded.
//! - A stray `}` closes the current section early; at the root it ends parsing.
//! - Input that ends inside a section yields everything parsed so far.
//!
//! Parsing therefore never fails. Repeated keys at one level keep the last
//! value.
//!
//! # Key design decisions
//!
//! - **Shared cursor**: nested sections borrow the same [`LineCursor`], so a
//!   recursive call leaves the cursor just past its closing brace and the
//!   caller resumes from there without index bookkeeping.
//! - **No type inference**: scalars are stored exactly as written.

use crate::tokenizer::tokenize;
use crate::types::{Document, Value};

/// Parse VDF text into a document.
///
/// ```
/// use vdf_core::parse;
///
/// let doc = parse("\"AppState\"\n{\n\t\"appid\"\t\t\"570\"\n}");
/// assert_eq!(doc.get_str(&["AppState", "appid"]), Some("570"));
/// ```
pub fn parse(text: &str) -> Document {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut cursor = LineCursor::new(text);
    parse_section(&mut cursor)
}

/// Forward-only cursor over the physical lines of a VDF text.
///
/// `str::lines` handles both `\n` and `\r\n` endings.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// The current line, if any, without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Consume and return the current line.
    pub fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Zero-based index of the next line to be consumed.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Parse entries until the closing `}` of the current section or end of input.
///
/// On return the cursor sits on the line after the closing brace.
pub fn parse_section(cursor: &mut LineCursor<'_>) -> Document {
    let mut doc = Document::new();
    let mut pending_key: Option<String> = None;

    while let Some(line) = cursor.advance() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        if trimmed == "}" {
            break;
        }

        let mut tokens = tokenize(trimmed);
        match tokens.len() {
            0 => {}
            _ if tokens[0] == "{" => {
                // A brace with no owning key is dropped
                if let Some(key) = pending_key.take() {
                    let nested = parse_section(cursor);
                    doc.insert(key, Value::Section(nested));
                }
            }
            1 => {
                // Replaces any stale pending key
                let key = tokens.swap_remove(0);
                pending_key = (!key.is_empty()).then_some(key);
            }
            2 => {
                let value = tokens.swap_remove(1);
                let key = tokens.swap_remove(0);
                if !key.is_empty() {
                    doc.insert(key, Value::Scalar(value));
                }
            }
            _ => {}
        }
    }

    doc
}
