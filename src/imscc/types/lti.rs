//! Basic LTI link documents (`imsbasiclti_xmlv1pN`).

use super::ContentDocument;
use crate::common::XmlNode;
use serde::Serialize;

/// A link to an external tool launched over LTI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalToolLink {
    pub title: String,
    pub description: String,
    pub launch_url: String,
    pub secure_launch_url: String,
    pub icon: String,
    pub secure_icon: String,
    pub vendor: Vendor,
    /// `<blti:custom>` launch parameters
    pub custom: Vec<Property>,
    pub extensions: Vec<ExtensionSet>,
    /// Resource identifier of the bundled cartridge, if any
    pub cartridge_bundle: String,
    /// Resource identifier of the bundled icon, if any
    pub cartridge_icon: String,
}

/// Tool vendor details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vendor {
    pub code: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub contact_email: String,
}

/// A named property (`<lticm:property name="...">value</lticm:property>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Platform-specific extension properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionSet {
    pub platform: String,
    pub properties: Vec<Property>,
}

impl ExternalToolLink {
    /// Launch URL to use, preferring the secure one.
    pub fn effective_launch_url(&self) -> &str {
        if self.secure_launch_url.is_empty() {
            &self.launch_url
        } else {
            &self.secure_launch_url
        }
    }

    /// Custom parameter by name.
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

impl ContentDocument for ExternalToolLink {
    const ROOT: &'static str = "cartridge_basiclti_link";

    fn from_node(root: &XmlNode) -> Self {
        let vendor = root
            .child("vendor")
            .map(|v| Vendor {
                code: v.text_at(&["code"]),
                name: v.text_at(&["name"]),
                description: v.text_at(&["description"]),
                url: v.text_at(&["url"]),
                contact_email: v.text_at(&["contact", "email"]),
            })
            .unwrap_or_default();

        Self {
            title: root.text_at(&["title"]),
            description: root.text_at(&["description"]),
            launch_url: root.text_at(&["launch_url"]),
            secure_launch_url: root.text_at(&["secure_launch_url"]),
            icon: root.text_at(&["icon"]),
            secure_icon: root.text_at(&["secure_icon"]),
            vendor,
            custom: root.child("custom").map(properties).unwrap_or_default(),
            extensions: root
                .children_named("extensions")
                .map(|e| ExtensionSet {
                    platform: e.attr_or_empty("platform"),
                    properties: properties(e),
                })
                .collect(),
            cartridge_bundle: root
                .child("cartridge_bundle")
                .map(|n| n.attr_or_empty("identifierref"))
                .unwrap_or_default(),
            cartridge_icon: root
                .child("cartridge_icon")
                .map(|n| n.attr_or_empty("identifierref"))
                .unwrap_or_default(),
        }
    }
}

fn properties(node: &XmlNode) -> Vec<Property> {
    node.children_named("property")
        .map(|p| Property {
            name: p.attr_or_empty("name"),
            value: p.text().to_string(),
        })
        .collect()
}
