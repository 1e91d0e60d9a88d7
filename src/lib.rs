//! # hypertex
//!
//! Parser and cross-reference resolver for the hypertex math markup
//! format.
//!
//! A hypertex document is tag-based markup: a `head` with title, author,
//! macro definitions, and bibliography file references, and a `body` of
//! paragraphs. Paragraphs carry labels; citations and terms cite those
//! labels (possibly in another document) or cite bibliography entries by
//! id. Parsing resolves every symbolic reference into concrete paragraph
//! numbers and a pruned, renumbered bibliography, producing a
//! renderer-agnostic [`Document`].
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> hypertex::Result<()> {
//!     let output = hypertex::parse_file("notes.xml")?;
//!
//!     println!("{} paragraphs", output.document.paragraph_count());
//!     for diagnostic in &output.diagnostics {
//!         eprintln!("warning: {}", diagnostic.message);
//!     }
//!
//!     // Hand the resolved model to a render backend.
//!     let json = output.document.to_json()?;
//!     std::fs::write("notes.json", json)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution model
//!
//! Cross-references resolve in three stages. Document-qualified tags
//! (`other-doc/label`) resolve eagerly while the tree is built, by
//! recursively loading the other document. Same-document tags wait until
//! the full paragraph list exists, so forward references work. External
//! citations then match against the bibliography, which is pruned to the
//! cited entries, sorted by author and title, and renumbered.
//!
//! Broken references never abort a parse: they degrade to a sentinel
//! resolution and are reported in [`ParseOutput::diagnostics`], in order.
//! Only structurally unparsable markup is fatal.

pub mod diag;
pub mod error;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use diag::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result};
pub use model::{
    BlockKind, CiteState, Document, InlineVariant, Node, ParKind, Paragraph, RefEntry,
};
pub use parser::{DocumentLoader, FsLoader, ParseOptions};

use std::path::Path;

/// Result of one top-level parse: the resolved document plus every
/// diagnostic recorded along the way, in the order it occurred.
#[derive(Debug)]
pub struct ParseOutput {
    /// The fully resolved document.
    pub document: Document,

    /// Recoverable problems encountered while parsing, in order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a document from markup source with default options.
///
/// External macro files, ref files, and cited documents resolve against
/// the current working directory.
pub fn parse_str(src: &str) -> Result<ParseOutput> {
    parse_str_with_options(src, ParseOptions::default())
}

/// Parse a document from markup source with custom options.
pub fn parse_str_with_options(src: &str, options: ParseOptions) -> Result<ParseOutput> {
    let mut loader = FsLoader::new(options.clone());
    parse_str_with_loader(src, options, &mut loader)
}

/// Parse a document from markup source with a custom document loader.
///
/// The loader is the seam for cross-document resolution: tests and hosting
/// environments can supply documents from memory or any other store.
pub fn parse_str_with_loader(
    src: &str,
    options: ParseOptions,
    loader: &mut dyn DocumentLoader,
) -> Result<ParseOutput> {
    let mut diagnostics = diag::Diagnostics::new();
    let document = parser::parse_document(src, &options, loader, &mut diagnostics)?;
    Ok(ParseOutput {
        document,
        diagnostics: diagnostics.into_vec(),
    })
}

/// Parse a document file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseOutput> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a document file with custom options.
///
/// Reading the top-level document is the one place file I/O is fatal;
/// everything the document references degrades to diagnostics instead.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParseOutput> {
    let src = std::fs::read_to_string(path)?;
    parse_str_with_options(&src, options)
}
