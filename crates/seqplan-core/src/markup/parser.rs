//! Tree parser built on the `quick-xml` pull reader.
//!
//! Turns markup text into an [`Element`] tree. The reader only tokenizes;
//! well-formedness (single root, balanced tags, no stray text outside the
//! root) is enforced here while the tree is assembled.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::node::{Attribute, Element, Node};

/// Errors produced while parsing markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup syntax error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("end tag </{found}> does not match open element <{expected}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("end tag </{0}> has no matching start tag")]
    UnmatchedEndTag(String),

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("document has no root element")]
    MissingRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("content outside the root element: {0:?}")]
    ContentOutsideRoot(String),

    #[error("markup is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Parse `text` as a markup document and return its root element.
///
/// Whitespace, comments, declarations and processing instructions may
/// surround the root element; anything else outside it is rejected.
pub fn parse_document(text: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = true;

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(start_element(&start)?),
            Event::Empty(start) => {
                let element = start_element(&start)?;
                close_element(&mut open, &mut root, element)?;
            }
            Event::End(end) => {
                let name = std::str::from_utf8(end.name().as_ref())?.to_owned();
                let element = open
                    .pop()
                    .ok_or_else(|| MarkupError::UnmatchedEndTag(name.clone()))?;
                if element.name != name {
                    return Err(MarkupError::MismatchedEndTag {
                        expected: element.name,
                        found: name,
                    });
                }
                close_element(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                push_text(&mut open, Node::Text(text))?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)?.to_owned();
                push_text(&mut open, Node::Text(text))?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = open.last_mut() {
                    let text = std::str::from_utf8(&comment)?.to_owned();
                    parent.children.push(Node::Comment(text));
                }
            }
            Event::Eof => break,
            // Declarations, processing instructions and doctypes carry no
            // plan content.
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(MarkupError::UnclosedElement(unclosed.name));
    }
    root.ok_or(MarkupError::MissingRoot)
}

/// Build an element (without children) from a start or empty tag.
fn start_element(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_owned();

    // `attributes()` checks for duplicate names by default.
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        attributes.push(Attribute {
            name: std::str::from_utf8(attribute.key.as_ref())?.to_owned(),
            value: attribute.unescape_value()?.into_owned(),
        });
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Attach a completed element to its parent, or make it the root.
fn close_element(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), MarkupError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => return Err(MarkupError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}

/// Attach text to the innermost open element. Outside the root only
/// whitespace is allowed, and it is dropped.
fn push_text(open: &mut [Element], node: Node) -> Result<(), MarkupError> {
    match (open.last_mut(), node) {
        (Some(parent), node) => parent.children.push(node),
        (None, Node::Text(text)) if text.trim().is_empty() => {}
        (None, Node::Text(text)) => return Err(MarkupError::ContentOutsideRoot(text)),
        (None, _) => {}
    }
    Ok(())
}
