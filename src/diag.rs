//! Structured diagnostics collected during parsing.
//!
//! Broken references degrade to placeholder output instead of aborting the
//! parse. Each degradation is recorded here, in the order it occurred, and
//! the full list is returned alongside the parsed document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a recoverable parse problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The configured source root is not a directory.
    MissingDirectory,
    /// A referenced macro, ref, or document file does not exist.
    MissingFile,
    /// A referenced file exists but could not be read.
    UnreadableFile,
    /// A macro or ref definition file is not well-formed.
    MalformedDefinitionFile,
    /// A citation or term names a label no paragraph carries.
    UnresolvedLabel,
    /// A document-qualified citation names a document that failed to load.
    UnresolvedDocument,
    /// An external citation names a ref id absent from the bibliography.
    UnresolvedRefId,
    /// Recursive document loading re-entered a document in progress.
    CycleDetected,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MissingDirectory => "missing directory",
            DiagnosticKind::MissingFile => "missing file",
            DiagnosticKind::UnreadableFile => "unreadable file",
            DiagnosticKind::MalformedDefinitionFile => "malformed definition file",
            DiagnosticKind::UnresolvedLabel => "unresolved label",
            DiagnosticKind::UnresolvedDocument => "unresolved document",
            DiagnosticKind::UnresolvedRefId => "unresolved ref id",
            DiagnosticKind::CycleDetected => "cycle detected",
        };
        f.write_str(name)
    }
}

/// A single recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,

    /// Human-readable description.
    pub message: String,

    /// Where it was noticed: a file path, document name, or citation tag.
    pub context: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} [{}]: {}", self.kind, context, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Ordered sink for diagnostics recorded during one top-level parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem without location context.
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(kind, message.into(), None);
    }

    /// Record a problem noticed at a specific file, document, or tag.
    pub fn report_in(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.push(kind, message.into(), Some(context.into()));
    }

    fn push(&mut self, kind: DiagnosticKind, message: String, context: Option<String>) {
        log::warn!("{}: {}", kind, message);
        self.entries.push(Diagnostic {
            kind,
            message,
            context,
        });
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over recorded diagnostics in order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Consume the sink, yielding the ordered diagnostic list.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
