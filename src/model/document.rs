//! Document-level types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Paragraph;
use crate::error::Result;

/// A fully resolved document.
///
/// Built once by the parsing pipeline and never mutated afterward; render
/// backends consume it read-only. `refs` holds only bibliography entries
/// that were actually cited, each carrying its citation key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document title, empty if absent.
    pub title: String,

    /// Document author, empty if absent.
    pub author: String,

    /// Merged macro definitions, later sources having won on collision.
    pub macros: BTreeMap<String, String>,

    /// Cited bibliography entries keyed by id.
    pub refs: BTreeMap<String, RefEntry>,

    /// Paragraphs in source order; position is the paragraph number.
    pub body: Vec<Paragraph>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paragraphs in the body.
    pub fn paragraph_count(&self) -> u32 {
        self.body.len() as u32
    }

    /// Get a paragraph by number (1-indexed). Number `0` is the sentinel
    /// for an unresolved reference and never names a paragraph.
    pub fn paragraph(&self, number: u32) -> Option<&Paragraph> {
        if number == 0 {
            return None;
        }
        self.body.get((number - 1) as usize)
    }

    /// Number of the first paragraph whose label set contains `label`.
    /// Later paragraphs carrying the same label are unreachable under it.
    pub fn find_label(&self, label: &str) -> Option<u32> {
        self.body
            .iter()
            .position(|par| par.has_label(label))
            .map(|i| i as u32 + 1)
    }

    /// Cited bibliography entries ordered by citation key.
    pub fn sorted_refs(&self) -> Vec<&RefEntry> {
        let mut entries: Vec<&RefEntry> = self.refs.values().collect();
        entries.sort_by_key(|r| r.key.unwrap_or(0));
        entries
    }

    /// Whether the document has any paragraphs.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Concatenated text content of the whole body.
    pub fn plain_text(&self) -> String {
        self.body
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Serialize the resolved model to pretty-printed JSON, the hand-off
    /// format for render backends.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntry {
    /// The id external citations use to cite this entry.
    pub id: String,

    /// Free-form named fields (author, title, journal, ...).
    pub fields: BTreeMap<String, String>,

    /// Citation key, assigned during finalization to cited entries only.
    pub key: Option<u32>,
}

impl RefEntry {
    /// Create an entry with no fields and no key.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
            key: None,
        }
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}
