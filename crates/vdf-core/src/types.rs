//! In-memory VDF document tree and its path API.
//!
//! A [`Document`] is an ordered mapping from key to [`Value`]. Values are either
//! scalars, kept exactly as the token text appeared in the file, or nested
//! sections. Numeric interpretation happens only on demand through the typed
//! accessors on [`Value`], so a parse → serialize round trip never rewrites a
//! value such as `"007"`.

use crate::error::{Result, VdfError};
use indexmap::IndexMap;

/// A single node in a VDF tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Leaf text value, verbatim.
    Scalar(String),
    /// Nested ordered section.
    Section(Document),
}

impl Value {
    /// Shorthand for building a scalar.
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&Document> {
        match self {
            Value::Section(doc) => Some(doc),
            Value::Scalar(_) => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Section(doc) => Some(doc),
            Value::Scalar(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Value::Section(_))
    }

    /// Interpret a scalar as a signed integer. Surrounding whitespace is ignored.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_str()?.trim().parse().ok()
    }

    /// Interpret a scalar as an unsigned integer (sizes, ids, timestamps).
    pub fn as_u64(&self) -> Option<u64> {
        self.as_str()?.trim().parse().ok()
    }

    /// Interpret a scalar as a float.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_str()?.trim().parse().ok()
    }

    /// Interpret a scalar as a flag. VDF encodes booleans as `"1"`/`"0"`;
    /// `true`/`false` are accepted as well.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_str()?.trim() {
            "1" => Some(true),
            "0" => Some(false),
            s if s.eq_ignore_ascii_case("true") => Some(true),
            s if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Section(doc)
    }
}

/// Ordered key → value mapping.
///
/// Inserting an existing key replaces its value in place: the entry keeps the
/// position of its first insertion and the latest value wins.
///
/// Equality is order sensitive: two documents are equal only if they hold the
/// same entries in the same order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a direct child.
    pub fn child(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert or replace a direct child, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a direct child, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve a path of keys from this document.
    ///
    /// Returns `None` when any key is missing, when an intermediate value is a
    /// scalar, or when the path is empty.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (last, prefix) = path.split_last()?;
        self.section_at(prefix)?.entries.get(*last)
    }

    pub fn get_mut(&mut self, path: &[&str]) -> Option<&mut Value> {
        let (last, prefix) = path.split_last()?;
        self.section_at_mut(prefix)?.entries.get_mut(*last)
    }

    /// Resolve a path to scalar text.
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Resolve a path to a nested section.
    pub fn get_section(&self, path: &[&str]) -> Option<&Document> {
        self.get(path)?.as_section()
    }

    /// Create or overwrite the scalar at `path`.
    ///
    /// Every key but the last must already name a section; intermediate
    /// structure is never created. On failure the document is unchanged.
    ///
    /// ```
    /// use vdf_core::{parse, Value, VdfError};
    ///
    /// let mut doc = parse("\"AppState\"\n{\n\"StagingFolder\" \"2\"\n}");
    /// doc.set_scalar(&["AppState", "StagingFolder"], "0").unwrap();
    /// assert_eq!(doc.get(&["AppState", "StagingFolder"]), Some(&Value::scalar("0")));
    ///
    /// let err = doc.set_scalar(&["AppState", "Missing", "X"], "1").unwrap_err();
    /// assert!(matches!(err, VdfError::PathNotFound { .. }));
    /// ```
    pub fn set_scalar(&mut self, path: &[&str], text: impl Into<String>) -> Result<()> {
        let (last, prefix) = path.split_last().ok_or(VdfError::InvalidPath)?;
        if last.is_empty() {
            return Err(VdfError::InvalidPath);
        }
        let parent = self
            .section_at_mut(prefix)
            .ok_or_else(|| VdfError::PathNotFound {
                path: path.join("."),
            })?;
        parent
            .entries
            .insert((*last).to_string(), Value::Scalar(text.into()));
        Ok(())
    }

    /// Remove the value at `path`, returning it if it was present.
    ///
    /// A missing entry (or missing parent) is not an error: the entry is
    /// already absent.
    pub fn delete(&mut self, path: &[&str]) -> Option<Value> {
        let (last, prefix) = path.split_last()?;
        self.section_at_mut(prefix)?.entries.shift_remove(*last)
    }

    /// Walk `path` through nested sections. An empty path is `self`.
    fn section_at(&self, path: &[&str]) -> Option<&Document> {
        path.iter()
            .try_fold(self, |doc, key| doc.entries.get(*key)?.as_section())
    }

    fn section_at_mut(&mut self, path: &[&str]) -> Option<&mut Document> {
        path.iter().try_fold(self, |doc, key| {
            doc.entries.get_mut(*key)?.as_section_mut()
        })
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Document {}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
