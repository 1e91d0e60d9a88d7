//! Parsing options and configuration.

use std::path::PathBuf;

/// Options for parsing hypertex documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Directory against which external macro files, ref files, and
    /// document references resolve.
    pub src_dir: PathBuf,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source directory.
    pub fn with_src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dir = dir.into();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("."),
        }
    }
}
