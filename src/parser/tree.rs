//! Tree building: markup elements to content nodes.
//!
//! This is also where Stage A of reference resolution happens: a
//! document-qualified citation or term can be resolved the moment it is
//! built, because the other document parses as a self-contained recursive
//! load. Same-document tags stay `Unresolved` until the whole paragraph
//! list exists (Stage B), which is what makes forward references work.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::Error;
use crate::model::{labels_from_attr, BlockKind, CiteState, InlineVariant, Node, ParKind, Paragraph};

use super::loader::DocumentLoader;
use super::xml::Element;

/// Split a paragraph tag on the first `/` into `(document, label)`.
///
/// One part means the label addresses the current document. An empty
/// document part (`/label`) also addresses the current document.
pub(crate) fn split_partag(tag: &str) -> (Option<&str>, &str) {
    match tag.split_once('/') {
        Some(("", label)) => (None, label),
        Some((doc, label)) => (Some(doc), label),
        None => (None, tag),
    }
}

pub(crate) struct TreeBuilder<'a> {
    pub loader: &'a mut dyn DocumentLoader,
    pub diagnostics: &'a mut Diagnostics,
}

impl TreeBuilder<'_> {
    /// Filter body children to recognized paragraph kinds, in order.
    /// Position among retained elements is the paragraph number; nothing
    /// else in the body contributes a paragraph.
    pub fn collect_paragraphs(&mut self, body: &Element) -> Vec<Paragraph> {
        let mut pars = Vec::new();
        for child in &body.children {
            let el = &child.element;
            let Some(kind) = ParKind::from_tag(&el.name) else {
                continue;
            };
            pars.push(Paragraph {
                kind,
                labels: labels_from_attr(el.attr("tag")),
                content: self.content(el),
            });
        }
        pars
    }

    /// Content of an element: leading text, then each child followed by
    /// its trailing text, preserving original order.
    fn content(&mut self, element: &Element) -> Vec<Node> {
        let mut nodes = Vec::new();
        if !element.text.is_empty() {
            nodes.push(Node::text(&element.text));
        }
        for child in &element.children {
            nodes.push(self.build(&child.element));
            if !child.tail.is_empty() {
                nodes.push(Node::text(&child.tail));
            }
        }
        nodes
    }

    /// Build one node from an element by tag-name dispatch.
    fn build(&mut self, element: &Element) -> Node {
        let children = self.content(element);
        if let Some(kind) = BlockKind::from_tag(&element.name) {
            return Node::Block { kind, children };
        }
        match element.name.as_str() {
            "b" => Node::inline(InlineVariant::Bold, children),
            "i" => Node::inline(InlineVariant::Italic, children),
            "u" => Node::inline(InlineVariant::Underline, children),
            "d" => Node::inline(InlineVariant::Definition, children),
            "cite" => self.build_cite(element, children),
            "term" => self.build_term(element, children),
            "frml" => build_formula(element, children),
            "ol" => Node::inline(InlineVariant::OrderedList, children),
            "ul" => Node::inline(InlineVariant::UnorderedList, children),
            "li" => Node::inline(InlineVariant::ListItem, children),
            "sub" => Node::inline(InlineVariant::Subscript, children),
            "sup" => Node::inline(InlineVariant::Superscript, children),
            _ => Node::inline(InlineVariant::Unknown, children),
        }
    }

    /// A `cite` with a non-empty `tag` cites a paragraph; with a `ref` it
    /// cites a bibliography entry.
    fn build_cite(&mut self, element: &Element, children: Vec<Node>) -> Node {
        match element.attr("tag") {
            Some(tag) if !tag.is_empty() => Node::inline(
                InlineVariant::Citation {
                    target: self.resolve_tag(tag),
                },
                children,
            ),
            _ => match element.attr("ref") {
                Some(refid) if !refid.is_empty() => Node::inline(
                    InlineVariant::ExternalCitation {
                        refid: refid.to_string(),
                        entry: None,
                    },
                    children,
                ),
                _ => Node::inline(
                    InlineVariant::Citation {
                        target: self.resolve_tag(""),
                    },
                    children,
                ),
            },
        }
    }

    fn build_term(&mut self, element: &Element, children: Vec<Node>) -> Node {
        let tag = element.attr("tag").unwrap_or("");
        Node::inline(
            InlineVariant::Term {
                target: self.resolve_tag(tag),
            },
            children,
        )
    }

    /// Stage A: resolve a document-qualified tag through the loader right
    /// away; leave same-document tags for Stage B.
    fn resolve_tag(&mut self, tag: &str) -> CiteState {
        let (doc, label) = split_partag(tag);
        let Some(doc) = doc else {
            return CiteState::Unresolved {
                tag: tag.to_string(),
            };
        };
        match self.loader.load(doc, self.diagnostics) {
            Ok(target) => match target.find_label(label) {
                Some(paragraph) => CiteState::Resolved {
                    document: Some(doc.to_string()),
                    paragraph,
                },
                None => {
                    self.diagnostics.report_in(
                        DiagnosticKind::UnresolvedLabel,
                        format!("could not resolve tag ({}, {})", doc, label),
                        tag.to_string(),
                    );
                    CiteState::Resolved {
                        document: Some(doc.to_string()),
                        paragraph: 0,
                    }
                }
            },
            Err(Error::Cycle(chain)) => {
                self.diagnostics.report_in(
                    DiagnosticKind::CycleDetected,
                    format!("cyclic document reference: {}", chain),
                    tag.to_string(),
                );
                CiteState::Resolved {
                    document: Some(doc.to_string()),
                    paragraph: 0,
                }
            }
            Err(err) => {
                self.diagnostics.report_in(
                    DiagnosticKind::UnresolvedDocument,
                    format!("document '{}' could not be loaded: {}", doc, err),
                    tag.to_string(),
                );
                CiteState::Resolved {
                    document: Some(doc.to_string()),
                    paragraph: 0,
                }
            }
        }
    }
}

/// A formula trims whitespace from each of its text segments; `raw` is the
/// concatenated result, handed to the formula-rendering collaborator.
fn build_formula(element: &Element, children: Vec<Node>) -> Node {
    let as_image = element.attr("img").is_some_and(|v| !v.is_empty());
    let children: Vec<Node> = children
        .into_iter()
        .filter_map(|node| match node {
            Node::Text { text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Node::text(trimmed))
                }
            }
            other => Some(other),
        })
        .collect();
    let raw: String = children.iter().map(Node::plain_text).collect();
    Node::Inline {
        variant: InlineVariant::Formula { as_image, raw },
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::Document;
    use crate::parser::xml;

    /// Loader that answers from a fixed set of documents.
    struct MapLoader(std::collections::HashMap<String, Document>);

    impl DocumentLoader for MapLoader {
        fn load(&mut self, name: &str, _diagnostics: &mut Diagnostics) -> Result<Document> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| Error::MissingFile(format!("{}.xml", name).into()))
        }
    }

    fn build_body(src: &str, loader: &mut dyn DocumentLoader) -> (Vec<Paragraph>, Diagnostics) {
        let root = xml::parse_root(src).unwrap();
        let mut diagnostics = Diagnostics::new();
        let pars = TreeBuilder {
            loader,
            diagnostics: &mut diagnostics,
        }
        .collect_paragraphs(&root);
        (pars, diagnostics)
    }

    fn empty_loader() -> MapLoader {
        MapLoader(std::collections::HashMap::new())
    }

    #[test]
    fn test_split_partag() {
        assert_eq!(split_partag("label"), (None, "label"));
        assert_eq!(split_partag("doc/label"), (Some("doc"), "label"));
        assert_eq!(split_partag("doc/a/b"), (Some("doc"), "a/b"));
        assert_eq!(split_partag("/label"), (None, "label"));
        assert_eq!(split_partag(""), (None, ""));
    }

    #[test]
    fn test_collector_skips_unrecognized_children() {
        let (pars, diags) = build_body(
            "<body><par>one</par><junk>skip</junk><thm tag=\"t\">two</thm></body>",
            &mut empty_loader(),
        );
        assert_eq!(pars.len(), 2);
        assert_eq!(pars[0].kind, ParKind::Plain);
        assert_eq!(pars[0].labels, vec![String::new()]);
        assert_eq!(pars[1].kind, ParKind::Theorem);
        assert_eq!(pars[1].labels, vec!["t".to_string()]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_content_preserves_interleaving() {
        let (pars, _) = build_body(
            "<body><par>lead <b>bold</b> mid <i>it</i> trail</par></body>",
            &mut empty_loader(),
        );
        let content = &pars[0].content;
        assert_eq!(content.len(), 5);
        assert_eq!(content[0], Node::text("lead "));
        assert!(matches!(
            &content[1],
            Node::Inline {
                variant: InlineVariant::Bold,
                ..
            }
        ));
        assert_eq!(content[2], Node::text(" mid "));
        assert_eq!(content[4], Node::text(" trail"));
    }

    #[test]
    fn test_unknown_tag_is_transparent() {
        let (pars, _) = build_body(
            "<body><par><weird>inside</weird></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Unknown,
                children,
            } => assert_eq!(children[0], Node::text("inside")),
            other => panic!("expected transparent wrapper, got {:?}", other),
        }
    }

    #[test]
    fn test_same_document_cite_stays_unresolved() {
        let (pars, diags) = build_body(
            "<body><par><cite tag=\"euler\">see</cite></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Citation { target },
                ..
            } => assert_eq!(
                target,
                &CiteState::Unresolved {
                    tag: "euler".to_string()
                }
            ),
            other => panic!("expected citation, got {:?}", other),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_qualified_cite_resolves_through_loader() {
        let mut other = Document::new();
        other.body.push(Paragraph {
            kind: ParKind::Plain,
            labels: labels_from_attr(Some("first")),
            content: Vec::new(),
        });
        other.body.push(Paragraph {
            kind: ParKind::Theorem,
            labels: labels_from_attr(Some("euler")),
            content: Vec::new(),
        });
        let mut loader = MapLoader(
            [("other".to_string(), other)]
                .into_iter()
                .collect(),
        );

        let (pars, diags) = build_body(
            "<body><par><cite tag=\"other/euler\">see</cite></par></body>",
            &mut loader,
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Citation { target },
                ..
            } => assert_eq!(
                target,
                &CiteState::Resolved {
                    document: Some("other".to_string()),
                    paragraph: 2
                }
            ),
            other => panic!("expected citation, got {:?}", other),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_document_degrades_to_zero() {
        let (pars, diags) = build_body(
            "<body><par><cite tag=\"gone/euler\">see</cite></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Citation { target },
                ..
            } => assert_eq!(
                target,
                &CiteState::Resolved {
                    document: Some("gone".to_string()),
                    paragraph: 0
                }
            ),
            other => panic!("expected citation, got {:?}", other),
        }
        let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::UnresolvedDocument]);
    }

    #[test]
    fn test_external_citation_is_built_unannotated() {
        let (pars, _) = build_body(
            "<body><par><cite ref=\"serre1965\"/></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::ExternalCitation { refid, entry },
                ..
            } => {
                assert_eq!(refid, "serre1965");
                assert!(entry.is_none());
            }
            other => panic!("expected external citation, got {:?}", other),
        }
    }

    #[test]
    fn test_formula_trims_text_segments() {
        let (pars, _) = build_body(
            "<body><par><frml>  e^{i\\pi} + 1 = 0  </frml></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Formula { as_image, raw },
                children,
            } => {
                assert!(!as_image);
                assert_eq!(raw, "e^{i\\pi} + 1 = 0");
                assert_eq!(children[0], Node::text("e^{i\\pi} + 1 = 0"));
            }
            other => panic!("expected formula, got {:?}", other),
        }
    }

    #[test]
    fn test_formula_img_attribute() {
        let (pars, _) = build_body(
            "<body><par><frml img=\"true\">x</frml></par></body>",
            &mut empty_loader(),
        );
        match &pars[0].content[0] {
            Node::Inline {
                variant: InlineVariant::Formula { as_image, .. },
                ..
            } => assert!(as_image),
            other => panic!("expected formula, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_block_inside_paragraph() {
        let (pars, _) = build_body(
            "<body><par>intro <prf>proof text</prf></par></body>",
            &mut empty_loader(),
        );
        assert!(matches!(
            &pars[0].content[1],
            Node::Block {
                kind: BlockKind::Proof,
                ..
            }
        ));
    }
}
