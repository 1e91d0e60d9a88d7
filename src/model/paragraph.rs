//! Paragraph-level types.

use serde::{Deserialize, Serialize};

use super::Node;

/// A body-level paragraph.
///
/// A paragraph's number is its 1-based position in the document body; it is
/// never stored, so it can never drift from source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Which paragraph construct this is.
    pub kind: ParKind,

    /// Labels this paragraph can be cited under. An untagged paragraph
    /// carries a single empty label.
    pub labels: Vec<String>,

    /// Content in source order.
    pub content: Vec<Node>,
}

impl Paragraph {
    /// Create an empty paragraph of the given kind with no labels.
    pub fn new(kind: ParKind) -> Self {
        Self {
            kind,
            labels: labels_from_attr(None),
            content: Vec::new(),
        }
    }

    /// Whether this paragraph can be cited under `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Concatenated text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content.iter().map(Node::plain_text).collect()
    }
}

/// Kinds of body-level paragraphs: a plain paragraph or a theorem-like
/// construct standing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParKind {
    /// A plain paragraph (`par`).
    Plain,
    /// A definition (`def`).
    Definition,
    /// A theorem (`thm`).
    Theorem,
    /// A proposition (`prp`).
    Proposition,
    /// A lemma (`lem`).
    Lemma,
    /// A corollary (`cor`).
    Corollary,
    /// A remark (`rmk`).
    Remark,
    /// An example (`exm`).
    Example,
    /// A proof (`prf`).
    Proof,
}

impl ParKind {
    /// Map a markup tag name to its paragraph kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "par" => Some(ParKind::Plain),
            "def" => Some(ParKind::Definition),
            "thm" => Some(ParKind::Theorem),
            "prp" => Some(ParKind::Proposition),
            "lem" => Some(ParKind::Lemma),
            "cor" => Some(ParKind::Corollary),
            "rmk" => Some(ParKind::Remark),
            "exm" => Some(ParKind::Example),
            "prf" => Some(ParKind::Proof),
            _ => None,
        }
    }
}

/// Parse a `tag` attribute into a label set: `;`-separated labels, or a
/// single empty label when the attribute is absent.
pub fn labels_from_attr(attr: Option<&str>) -> Vec<String> {
    match attr {
        Some(value) => value.split(';').map(str::to_string).collect(),
        None => vec![String::new()],
    }
}
