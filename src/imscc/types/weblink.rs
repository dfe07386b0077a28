//! Web link documents (`imswl_xmlv1pN`).

use super::ContentDocument;
use crate::common::XmlNode;
use serde::Serialize;

/// A link to an external web page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebLink {
    pub title: String,
    pub url: WebLinkUrl,
}

/// The `<url>` element of a web link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebLinkUrl {
    pub href: String,
    pub target: String,
    pub window_features: String,
}

impl WebLink {
    /// Link target.
    #[inline]
    pub fn href(&self) -> &str {
        &self.url.href
    }
}

impl ContentDocument for WebLink {
    const ROOT: &'static str = "webLink";

    fn from_node(root: &XmlNode) -> Self {
        let url = root
            .child("url")
            .map(|u| WebLinkUrl {
                href: u.attr_or_empty("href"),
                target: u.attr_or_empty("target"),
                window_features: u.attr_or_empty("windowFeatures"),
            })
            .unwrap_or_default();

        Self {
            title: root.text_at(&["title"]),
            url,
        }
    }
}
