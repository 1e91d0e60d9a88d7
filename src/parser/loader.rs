//! Loading of externally referenced documents.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::model::Document;

use super::options::ParseOptions;

/// Resolves a document name to a fully parsed and resolved [`Document`].
///
/// Stage A calls this from inside nested recursive parses, so
/// implementations must be reentrant. Diagnostics produced while parsing
/// the loaded document land in the shared sink passed through `load`.
pub trait DocumentLoader {
    /// Load the document known under `name`.
    fn load(&mut self, name: &str, diagnostics: &mut Diagnostics) -> Result<Document>;
}

/// Filesystem loader: resolves `name` to `{src_dir}/{name}.xml` and
/// re-enters the full parsing pipeline.
///
/// Completed documents are memoized for the lifetime of the loader, so a
/// document referenced from several places parses once per top-level
/// resolution. The stack of in-progress loads doubles as the cycle guard:
/// re-entering a document already being loaded fails with [`Error::Cycle`]
/// instead of recursing forever.
#[derive(Debug, Default)]
pub struct FsLoader {
    options: ParseOptions,
    cache: HashMap<String, Document>,
    loading: Vec<String>,
}

impl FsLoader {
    /// Create a loader rooted at the options' source directory.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
            loading: Vec::new(),
        }
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.options.src_dir.join(format!("{}.xml", name))
    }
}

impl DocumentLoader for FsLoader {
    fn load(&mut self, name: &str, diagnostics: &mut Diagnostics) -> Result<Document> {
        if self.loading.iter().any(|n| n == name) {
            let mut chain = self.loading.clone();
            chain.push(name.to_string());
            return Err(Error::Cycle(chain.join(" -> ")));
        }
        if let Some(doc) = self.cache.get(name) {
            log::debug!("document '{}' served from cache", name);
            return Ok(doc.clone());
        }

        if !self.options.src_dir.is_dir() {
            return Err(Error::MissingDirectory(self.options.src_dir.clone()));
        }
        let path = self.document_path(name);
        if !path.is_file() {
            return Err(Error::MissingFile(path));
        }
        let src = std::fs::read_to_string(&path)?;

        let options = self.options.clone();
        self.loading.push(name.to_string());
        let result = super::parse_document(&src, &options, self, diagnostics);
        self.loading.pop();

        let doc = result?;
        self.cache.insert(name.to_string(), doc.clone());
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let options = ParseOptions::new().with_src_dir("/nonexistent/dir");
        let mut loader = FsLoader::new(options);
        let mut diags = Diagnostics::new();
        let err = loader.load("doc", &mut diags).unwrap_err();
        assert!(matches!(err, Error::MissingDirectory(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = ParseOptions::new().with_src_dir(dir.path());
        let mut loader = FsLoader::new(options);
        let mut diags = Diagnostics::new();
        let err = loader.load("doc", &mut diags).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn test_load_parses_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(
            &path,
            "<document><head><title>T</title></head>\
             <body><par tag=\"a\">text</par></body></document>",
        )
        .unwrap();

        let options = ParseOptions::new().with_src_dir(dir.path());
        let mut loader = FsLoader::new(options);
        let mut diags = Diagnostics::new();

        let doc = loader.load("doc", &mut diags).unwrap();
        assert_eq!(doc.title, "T");
        assert_eq!(doc.find_label("a"), Some(1));

        // Second load answers from the cache even after the file is gone.
        std::fs::remove_file(&path).unwrap();
        let again = loader.load("doc", &mut diags).unwrap();
        assert_eq!(again, doc);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_self_cycle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ParseOptions::new().with_src_dir(dir.path());
        let mut loader = FsLoader::new(options);
        loader.loading.push("doc".to_string());

        let mut diags = Diagnostics::new();
        let err = loader.load("doc", &mut diags).unwrap_err();
        assert!(matches!(err, Error::Cycle(_)));
        assert_eq!(err.to_string(), "Cyclic document reference: doc -> doc");
    }
}
