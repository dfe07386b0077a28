//! Owned element tree built from quick-xml events.

use crate::common::bom::decode_text;
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A decoded XML element.
///
/// Names and attribute keys are stored by local name. Text is the
/// concatenation of the element's own text and CDATA children, trimmed once
/// the element closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Local name of the element.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content directly inside this element.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order.
    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value by local name, or an empty string.
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a path of child names from this element.
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text at the end of a child path, or an empty string.
    pub fn text_at(&self, path: &[&str]) -> String {
        self.descend(path)
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    /// All descendants (not including self) with the given local name, in
    /// document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.name == name {
                found.push(node);
            }
            pending.extend(node.children.iter().rev());
        }
        found
    }

    fn from_start(e: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            // Namespace declarations are not data.
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            // Undeclared entities (`&nbsp;` from HTML exporters) keep the raw value.
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            attributes.push((local, value));
        }

        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    fn finish(mut self) -> Self {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
        self
    }
}

/// Deepest element nesting [`parse_document`] accepts.
pub const MAX_NESTING: usize = 512;

/// Decode a whole document into its root element.
///
/// Fails with [`Error::MalformedXml`] when the bytes are not well-formed:
/// mismatched or unclosed tags, several root elements, or no root at all.
/// Elements nested deeper than [`MAX_NESTING`] fail with
/// [`Error::TreeTooDeep`] before the tree is built.
pub fn parse_document(data: &[u8]) -> Result<XmlNode> {
    let text = decode_text(data);
    let mut reader = Reader::from_str(&text);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let node = XmlNode::from_start(e)?;
                check_nesting(&stack, &node)?;
                stack.push(node);
            },
            Ok(Event::Empty(ref e)) => {
                let node = XmlNode::from_start(e)?.finish();
                check_nesting(&stack, &node)?;
                attach(&mut stack, &mut root, node)?;
            },
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedXml("unexpected closing tag".to_string()))?
                    .finish();
                attach(&mut stack, &mut root, node)?;
            },
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            },
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            },
            Ok(Event::GeneralRef(r)) => {
                if let Some(top) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&r).into_owned();
                    push_entity(&mut top.text, &name);
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedXml(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )));
            },
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedXml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| Error::MalformedXml("document has no root element".to_string()))
}

fn check_nesting(stack: &[XmlNode], node: &XmlNode) -> Result<()> {
    let depth = stack.len() + 1;
    if depth > MAX_NESTING {
        return Err(Error::TreeTooDeep {
            identifier: node.name.clone(),
            depth,
        });
    }
    Ok(())
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::MalformedXml(format!(
            "second root element <{}>",
            node.name
        )));
    }
    *root = Some(node);
    Ok(())
}

/// Append the replacement text of an entity or character reference.
/// Unknown named entities are kept literally.
fn push_entity(text: &mut String, name: &str) {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };

    match resolved {
        Some(ch) => text.push(ch),
        None => {
            text.push('&');
            text.push_str(name);
            text.push(';');
        },
    }
}
