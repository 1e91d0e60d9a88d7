//! Error types for the hypertex library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hypertex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing and resolving documents.
///
/// Only a structurally unparsable top-level document is fatal to a parse;
/// every other failure degrades to a placeholder resolution and is recorded
/// in the diagnostics list instead. The variants below surface at the API
/// boundary (top-level file I/O, markup syntax) and inside the document
/// loader, whose errors the resolver downgrades to diagnostics.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a document or definition file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The markup is not structurally well-formed.
    #[error("Markup error: {0}")]
    Markup(String),

    /// The configured source root is not a directory.
    #[error("The given path {0} is not a directory")]
    MissingDirectory(PathBuf),

    /// A referenced document file does not exist.
    #[error("No document could be found at the path: {0}")]
    MissingFile(PathBuf),

    /// Recursive document loading re-entered a document already being
    /// loaded.
    #[error("Cyclic document reference: {0}")]
    Cycle(String),

    /// Error serializing the document model.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Markup(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Markup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingFile(PathBuf::from("src/other.xml"));
        assert_eq!(
            err.to_string(),
            "No document could be found at the path: src/other.xml"
        );

        let err = Error::Cycle("a -> b -> a".to_string());
        assert_eq!(err.to_string(), "Cyclic document reference: a -> b -> a");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
