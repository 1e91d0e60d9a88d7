//! The hypertex parsing pipeline.
//!
//! Normalizer, element tree, head resolution, tree building with eager
//! cross-document resolution (Stage A), same-document resolution over the
//! finished paragraph list (Stage B), bibliography resolution (Stage C),
//! and finalization into an immutable [`Document`](crate::model::Document).
//! The whole pipeline is single-threaded and depth-first; resolution order
//! is deterministic.

mod head;
mod loader;
mod normalize;
mod options;
mod resolve;
mod tree;
mod xml;

pub use loader::{DocumentLoader, FsLoader};
pub use options::ParseOptions;

use crate::diag::Diagnostics;
use crate::error::Result;
use crate::model::Document;

/// Run the full pipeline over one document source.
///
/// Reentrant: the loader re-invokes this for every document-qualified
/// reference, with the same diagnostics sink.
pub(crate) fn parse_document(
    src: &str,
    options: &ParseOptions,
    loader: &mut dyn DocumentLoader,
    diagnostics: &mut Diagnostics,
) -> Result<Document> {
    let normalized = normalize::normalize_angle_brackets(src);
    let root = xml::parse_root(&normalized)?;

    let head = head::resolve_head(root.find("head"), options, diagnostics);

    let mut builder = tree::TreeBuilder {
        loader: &mut *loader,
        diagnostics: &mut *diagnostics,
    };
    let pars = match root.find("body") {
        Some(body) => builder.collect_paragraphs(body),
        None => Vec::new(),
    };

    let pars = resolve::resolve_internal(pars, diagnostics);
    let (pars, cited) = resolve::resolve_refs(pars, &head.refs, diagnostics);
    let refs = resolve::finalize_refs(head.refs, &cited);

    Ok(Document {
        title: head.title,
        author: head.author,
        macros: head.macros,
        refs,
        body: pars,
    })
}
