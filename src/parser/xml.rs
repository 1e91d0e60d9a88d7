//! Minimal XML element tree built from quick-xml events.
//!
//! Elements keep the text/tail interleaving model: `text` is the text
//! between the opening tag and the first child, and each child carries the
//! text that follows it. The tree builder reconstructs exact content order
//! from this.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// An element with attributes, leading text, and ordered children.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    /// Tag name.
    pub name: String,
    /// Attribute name/value pairs.
    pub attrs: HashMap<String, String>,
    /// Text between the opening tag and the first child element.
    pub text: String,
    /// Child elements, each with its trailing text.
    pub children: Vec<Child>,
}

/// A child element together with the text that follows it.
#[derive(Debug, Clone)]
pub(crate) struct Child {
    pub element: Element,
    pub tail: String,
}

impl Element {
    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// First child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Child elements with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |e| e.name == name)
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().map(|c| &c.element)
    }
}

/// Parse a complete markup document into its root element.
///
/// This is the only place a parse can fail structurally: syntax errors,
/// mismatched or unclosed tags, and multiple root elements are fatal.
pub(crate) fn parse_root(src: &str) -> Result<Element> {
    let mut reader = Reader::from_str(src);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(element_from_start(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                // quick-xml has already checked that the end tag matches
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Markup("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::Markup(err.to_string()))?;
                append_text(&mut stack, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_text(&mut stack, &text);
            }
            Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Markup(format!(
                    "{} at byte {}",
                    e,
                    reader.error_position()
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Markup(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| Error::Markup("document has no root element".to_string()))
}

/// Attach a completed element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Child {
            element,
            tail: String::new(),
        });
    } else if root.is_some() {
        return Err(Error::Markup("multiple root elements".to_string()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Append text to the innermost open element: to the last child's tail if
/// one exists, otherwise to the element's leading text. Text outside the
/// root is dropped.
fn append_text(stack: &mut [Element], text: &str) {
    if let Some(top) = stack.last_mut() {
        match top.children.last_mut() {
            Some(child) => child.tail.push_str(text),
            None => top.text.push_str(text),
        }
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::Markup(err.to_string()))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(Element {
        name,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}
