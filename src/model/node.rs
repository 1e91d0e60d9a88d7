//! Content nodes: text, block constructs, and inline constructs.

use serde::{Deserialize, Serialize};

use super::RefEntry;

/// A node in a paragraph's content tree.
///
/// Content is an ordered interleaving of text segments and nested
/// constructs, preserving the original source order exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A literal text segment.
    Text {
        /// The text content.
        text: String,
    },

    /// A block-level construct (theorem, proof, ...).
    Block {
        /// Which block construct this is.
        kind: BlockKind,
        /// Content in source order.
        children: Vec<Node>,
    },

    /// An inline construct (bold, citation, formula, ...).
    Inline {
        /// Which inline construct this is.
        variant: InlineVariant,
        /// Content in source order.
        children: Vec<Node>,
    },
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Create an inline node.
    pub fn inline(variant: InlineVariant, children: Vec<Node>) -> Self {
        Node::Inline { variant, children }
    }

    /// Child nodes, empty for text.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text { .. } => &[],
            Node::Block { children, .. } | Node::Inline { children, .. } => children,
        }
    }

    /// Concatenated text content of this subtree.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            _ => self.children().iter().map(Node::plain_text).collect(),
        }
    }
}

/// Block-level construct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
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

impl BlockKind {
    /// Map a markup tag name to its block kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "def" => Some(BlockKind::Definition),
            "thm" => Some(BlockKind::Theorem),
            "prp" => Some(BlockKind::Proposition),
            "lem" => Some(BlockKind::Lemma),
            "cor" => Some(BlockKind::Corollary),
            "rmk" => Some(BlockKind::Remark),
            "exm" => Some(BlockKind::Example),
            "prf" => Some(BlockKind::Proof),
            _ => None,
        }
    }

    /// The markup tag name for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Definition => "def",
            BlockKind::Theorem => "thm",
            BlockKind::Proposition => "prp",
            BlockKind::Lemma => "lem",
            BlockKind::Corollary => "cor",
            BlockKind::Remark => "rmk",
            BlockKind::Example => "exm",
            BlockKind::Proof => "prf",
        }
    }
}

/// Inline construct kinds.
///
/// `Citation` and `Term` carry an addressing state; `ExternalCitation`
/// carries the matched bibliography entry once Stage C has run. Tags the
/// vocabulary does not recognize become `Unknown`, a transparent wrapper
/// around content only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum InlineVariant {
    /// Bold text (`b`).
    Bold,
    /// Italic text (`i`).
    Italic,
    /// Underlined text (`u`).
    Underline,
    /// A defined-term span (`d`).
    Definition,
    /// A citation of a labeled paragraph (`cite` with a `tag` attribute).
    Citation {
        /// Addressing state.
        target: CiteState,
    },
    /// A bibliography citation (`cite` with a `ref` attribute).
    ExternalCitation {
        /// The cited bibliography id.
        refid: String,
        /// The matched entry, present once resolved.
        entry: Option<RefEntry>,
    },
    /// A term occurrence pointing back at its defining paragraph (`term`).
    Term {
        /// Addressing state.
        target: CiteState,
    },
    /// A formula (`frml`), rendered as text or as an image.
    Formula {
        /// Whether the formula is rendered as an image.
        as_image: bool,
        /// Trimmed formula source text.
        raw: String,
    },
    /// An ordered list (`ol`).
    OrderedList,
    /// An unordered list (`ul`).
    UnorderedList,
    /// A list item (`li`).
    ListItem,
    /// Subscript (`sub`).
    Subscript,
    /// Superscript (`sup`).
    Superscript,
    /// An unrecognized tag; contributes its content and nothing else.
    Unknown,
}

/// Addressing state of a citation or term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CiteState {
    /// Not yet resolved against the current document's labels.
    Unresolved {
        /// The raw tag, possibly document-qualified.
        tag: String,
    },
    /// Resolved to a paragraph number. Paragraph `0` means the reference
    /// could not be resolved and a diagnostic was recorded.
    Resolved {
        /// The target document, `None` for the current document.
        document: Option<String>,
        /// The 1-based paragraph number, or `0` for a reported miss.
        paragraph: u32,
    },
}

impl CiteState {
    /// Whether this state still awaits resolution.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, CiteState::Unresolved { .. })
    }

    /// The resolved paragraph number, if resolution has happened.
    pub fn paragraph(&self) -> Option<u32> {
        match self {
            CiteState::Unresolved { .. } => None,
            CiteState::Resolved { paragraph, .. } => Some(*paragraph),
        }
    }
}
