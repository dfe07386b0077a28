//! Discussion topic documents (`imsdt_xmlv1pN`).

use super::{Attachment, ContentDocument, RichText, attachments};
use crate::common::XmlNode;
use serde::Serialize;

/// A discussion topic prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub title: String,
    pub text: RichText,
    pub attachments: Vec<Attachment>,
}

impl ContentDocument for Topic {
    const ROOT: &'static str = "topic";

    fn from_node(root: &XmlNode) -> Self {
        Self {
            title: root.text_at(&["title"]),
            text: RichText::from_node(root.child("text")),
            attachments: attachments(root),
        }
    }
}
