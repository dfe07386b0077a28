//! Typed content documents.
//!
//! Resources of the structured families point at an XML document with a
//! family-specific root element. Each document type implements
//! [`ContentDocument`], which pairs the expected root element with a
//! permissive mapping from the decoded element tree.

use crate::common::{Error, Result, XmlNode, parse_document};
use serde::Serialize;

pub mod assignment;
pub mod lti;
pub mod quiz;
pub mod topic;
pub mod weblink;

pub use assignment::Assignment;
pub use lti::{ExtensionSet, ExternalToolLink, Property, Vendor};
pub use quiz::{Choice, MetadataField, Quiz, QuizItem, Section};
pub use topic::Topic;
pub use weblink::{WebLink, WebLinkUrl};

/// A document decoded from a resource's backing file.
pub trait ContentDocument: Sized {
    /// Local name of the root element.
    const ROOT: &'static str;

    /// Map a root element onto the document. Missing children leave fields
    /// empty.
    fn from_node(root: &XmlNode) -> Self;

    /// Decode a file read from `path`.
    ///
    /// The root element is checked before mapping, so a companion file in
    /// the same folder (an HTML description next to `assignment.xml`, say)
    /// is rejected instead of decoding into an empty document.
    fn decode(path: &str, data: &[u8]) -> Result<Self> {
        let root = parse_document(data).map_err(|e| Error::decode(path, e.to_string()))?;
        if root.name() != Self::ROOT {
            return Err(Error::decode(
                path,
                format!("expected <{}> root element, found <{}>", Self::ROOT, root.name()),
            ));
        }
        Ok(Self::from_node(&root))
    }
}

/// Text with its declared MIME type (`texttype` attribute).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichText {
    pub texttype: String,
    pub content: String,
}

impl RichText {
    pub(crate) fn from_node(node: Option<&XmlNode>) -> Self {
        node.map(|n| Self {
            texttype: n.attr_or_empty("texttype"),
            content: n.text().to_string(),
        })
        .unwrap_or_default()
    }

    /// Whether the content is HTML.
    pub fn is_html(&self) -> bool {
        self.texttype.eq_ignore_ascii_case("text/html")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A file attached to a topic or assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub href: String,
    pub role: String,
}

pub(crate) fn attachments(root: &XmlNode) -> Vec<Attachment> {
    root.child("attachments")
        .map(|a| {
            a.children_named("attachment")
                .map(|n| Attachment {
                    href: n.attr_or_empty("href"),
                    role: n.attr_or_empty("role"),
                })
                .collect()
        })
        .unwrap_or_default()
}
