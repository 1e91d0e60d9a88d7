//! The resolved document model.
//!
//! This module defines the renderer-agnostic representation produced by the
//! parsing pipeline: a document with merged head data, numbered paragraphs,
//! and a pruned, renumbered bibliography. Render backends consume it
//! read-only; the whole model serializes to JSON.

mod document;
mod node;
mod paragraph;

pub use document::{Document, RefEntry};
pub use node::{BlockKind, CiteState, InlineVariant, Node};
pub use paragraph::{labels_from_attr, ParKind, Paragraph};
