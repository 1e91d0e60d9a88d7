//! Head resolution: title, author, macro merging, bibliography merging.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::model::RefEntry;

use super::options::ParseOptions;
use super::xml::{self, Element};

/// Resolved contents of a document head.
#[derive(Debug, Default)]
pub(crate) struct Head {
    pub title: String,
    pub author: String,
    pub macros: BTreeMap<String, String>,
    pub refs: BTreeMap<String, RefEntry>,
}

/// Resolve the head element: title and author from the first matching
/// children, macros from inline definitions then macro files in document
/// order, refs from ref files in document order. Later sources win on
/// collision. Every file problem is reported and contributes nothing.
pub(crate) fn resolve_head(
    head: Option<&Element>,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Head {
    let Some(head) = head else {
        return Head::default();
    };

    let title = head.find("title").map(|e| e.text.clone()).unwrap_or_default();
    let author = head
        .find("author")
        .map(|e| e.text.clone())
        .unwrap_or_default();

    let mut macros = BTreeMap::new();
    for el in head.find_all("macro") {
        if let Some(name) = el.attr("name") {
            macros.insert(name.to_string(), el.attr("value").unwrap_or("").to_string());
        }
    }
    for el in head.find_all("macros") {
        merge_macros_from_file(&mut macros, el.attr("src").unwrap_or(""), options, diagnostics);
    }

    let mut refs = BTreeMap::new();
    for el in head.find_all("refs") {
        merge_refs_from_file(&mut refs, el.attr("src").unwrap_or(""), options, diagnostics);
    }

    Head {
        title,
        author,
        macros,
        refs,
    }
}

fn merge_macros_from_file(
    macros: &mut BTreeMap<String, String>,
    fname: &str,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) {
    let Some(root) = read_definition_file("macro", fname, options, diagnostics) else {
        return;
    };
    for el in root.find_all("macro") {
        if let Some(name) = el.attr("name") {
            macros.insert(name.to_string(), el.attr("value").unwrap_or("").to_string());
        }
    }
}

fn merge_refs_from_file(
    refs: &mut BTreeMap<String, RefEntry>,
    fname: &str,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) {
    let Some(root) = read_definition_file("reference", fname, options, diagnostics) else {
        return;
    };
    for el in root.find_all("ref") {
        let Some(id) = el.attr("id") else { continue };
        let mut entry = RefEntry::new(id);
        for child in &el.children {
            entry.set_field(&child.element.name, child.element.text.clone());
        }
        refs.insert(id.to_string(), entry);
    }
}

/// Read and parse one definition file, reporting every failure mode and
/// returning `None` so the caller contributes nothing.
fn read_definition_file(
    kind_label: &str,
    fname: &str,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Option<Element> {
    let src_dir = &options.src_dir;
    if !src_dir.is_dir() {
        diagnostics.report_in(
            DiagnosticKind::MissingDirectory,
            format!("the given path {} is not a directory", src_dir.display()),
            src_dir.display().to_string(),
        );
    }
    let path: PathBuf = src_dir.join(fname);
    if !path.is_file() {
        diagnostics.report_in(
            DiagnosticKind::MissingFile,
            format!(
                "a {} file could not be found at the path: {}",
                kind_label,
                path.display()
            ),
            path.display().to_string(),
        );
        return None;
    }
    let src = match fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => {
            diagnostics.report_in(
                DiagnosticKind::UnreadableFile,
                format!(
                    "{} definitions could not be loaded from {}: {}",
                    kind_label,
                    path.display(),
                    err
                ),
                path.display().to_string(),
            );
            return None;
        }
    };
    match xml::parse_root(&src) {
        Ok(root) => Some(root),
        Err(err) => {
            diagnostics.report_in(
                DiagnosticKind::MalformedDefinitionFile,
                format!(
                    "{} definitions at {} could not be parsed: {}",
                    kind_label,
                    path.display(),
                    err
                ),
                path.display().to_string(),
            );
            None
        }
    }
}
