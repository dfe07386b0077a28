//! Assignment documents (`assignment_xmlv1pN`, the cartridge assignment
//! extension).

use super::{Attachment, ContentDocument, RichText, attachments};
use crate::common::XmlNode;
use serde::Serialize;

/// A gradable assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub identifier: String,
    pub title: String,
    pub text: RichText,
    pub instructor_text: RichText,
    pub gradable: bool,
    /// Raw `points_possible` attribute of `<gradable>`
    pub points_possible: String,
    /// Accepted submission types (`html`, `file`, `url`, `text`)
    pub submission_formats: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl Assignment {
    /// Points possible as a number, when the attribute holds one.
    pub fn points(&self) -> Option<f64> {
        self.points_possible.trim().parse().ok()
    }
}

impl ContentDocument for Assignment {
    const ROOT: &'static str = "assignment";

    fn from_node(root: &XmlNode) -> Self {
        let gradable = root.child("gradable");

        Self {
            identifier: root.attr_or_empty("identifier"),
            title: root.text_at(&["title"]),
            text: RichText::from_node(root.child("text")),
            instructor_text: RichText::from_node(root.child("instructor_text")),
            gradable: gradable.is_some_and(|g| g.text().eq_ignore_ascii_case("true")),
            points_possible: gradable.map(|g| g.attr_or_empty("points_possible")).unwrap_or_default(),
            submission_formats: root
                .child("submission_formats")
                .map(|f| f.children_named("format").map(|n| n.attr_or_empty("type")).collect())
                .unwrap_or_default(),
            attachments: attachments(root),
        }
    }
}
