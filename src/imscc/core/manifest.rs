//! Cartridge manifest (`imsmanifest.xml`) object model.
//!
//! The manifest carries three things: LOM metadata describing the course,
//! one organization whose item tree is the table of contents, and the flat
//! catalog of resources the items point at.
//!
//! Decoding is permissive. Real exports omit optional metadata all the time,
//! so a missing element leaves the matching field empty instead of failing
//! the load; only XML that is not well-formed, or that nests past
//! [`crate::common::xml::MAX_NESTING`], is rejected.

use crate::common::{Result, XmlNode, parse_document};
use serde::Serialize;
use tracing::{debug, warn};

/// Item depth kept by [`Manifest::parse`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Root of a parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub identifier: String,
    pub metadata: ManifestMetadata,
    /// Root item of the (single) organization. Structural; its children
    /// are the top-level entries of the table of contents.
    pub organization: Item,
    pub resources: Vec<Resource>,
}

/// Course-level metadata from the `<metadata>` node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestMetadata {
    pub schema: String,
    pub schema_version: String,
    pub title: String,
    pub language: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// Raw LOM `dateTime` of the first contribution
    pub contribution_date: String,
    /// Whether `copyrightAndOtherRestrictions` is `yes`
    pub copyright: bool,
    pub copyright_description: String,
}

/// A node of the organization tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub identifier: String,
    /// Identifier of the referenced resource; empty for folders
    pub identifier_ref: String,
    pub title: String,
    pub children: Vec<Item>,
}

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub identifier: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub href: String,
    pub files: Vec<ResourceFile>,
    pub dependencies: Vec<Dependency>,
}

/// A `<file href>` entry of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceFile {
    pub href: String,
}

/// A `<dependency identifierref>` entry of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub identifier_ref: String,
}

impl Manifest {
    /// Parse manifest XML, keeping items up to [`DEFAULT_MAX_DEPTH`].
    ///
    /// # Errors
    /// [`crate::Error::MalformedXml`] if the bytes are not well-formed XML.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_max_depth(data, DEFAULT_MAX_DEPTH)
    }

    /// Parse manifest XML, keeping items up to `max_depth` levels below
    /// the organization root.
    ///
    /// Items one level past the limit are kept without their children, so
    /// tree building still sees that the limit was crossed.
    ///
    /// # Errors
    /// [`crate::Error::MalformedXml`] if the bytes are not well-formed XML,
    /// [`crate::Error::TreeTooDeep`] if elements nest past
    /// [`crate::common::xml::MAX_NESTING`].
    pub fn parse_with_max_depth(data: &[u8], max_depth: usize) -> Result<Self> {
        let root = parse_document(data)?;
        Ok(Self::from_node(&root, max_depth))
    }

    /// Build the model from an already decoded `<manifest>` element.
    pub fn from_node(root: &XmlNode, max_depth: usize) -> Self {
        if root.name() != "manifest" {
            warn!(root = root.name(), "manifest root element is not <manifest>");
        }

        let metadata = root
            .child("metadata")
            .map(ManifestMetadata::from_node)
            .unwrap_or_default();

        let organization = root
            .child("organizations")
            .map(|o| organization_root(o, max_depth))
            .unwrap_or_default();

        let resources: Vec<Resource> = root
            .child("resources")
            .map(|r| r.children_named("resource").map(Resource::from_node).collect())
            .unwrap_or_default();

        debug!(
            identifier = root.attr("identifier").unwrap_or_default(),
            resources = resources.len(),
            top_level_items = organization.children.len(),
            "decoded manifest"
        );

        Self {
            identifier: root.attr_or_empty("identifier"),
            metadata,
            organization,
            resources,
        }
    }

    /// Look up a resource by exact identifier.
    pub fn resource(&self, identifier: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.identifier == identifier)
    }

    /// Top-level items of the organization.
    #[inline]
    pub fn top_level_items(&self) -> &[Item] {
        &self.organization.children
    }
}

impl ManifestMetadata {
    fn from_node(node: &XmlNode) -> Self {
        let lom = node.child("lom");
        let general = lom.and_then(|l| l.child("general"));
        let rights = lom.and_then(|l| l.child("rights"));
        let lom_string = |parent: Option<&XmlNode>, path: &[&str]| {
            parent.map(|p| p.text_at(path)).unwrap_or_default()
        };

        let keywords = general
            .map(|g| {
                g.children_named("keyword")
                    .flat_map(|k| k.children_named("string"))
                    .map(|s| s.text().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let copyright = lom_string(rights, &["copyrightAndOtherRestrictions", "value"]);

        Self {
            schema: node.text_at(&["schema"]),
            schema_version: node.text_at(&["schemaversion"]),
            title: lom_string(general, &["title", "string"]),
            language: lom_string(general, &["language"]),
            description: lom_string(general, &["description", "string"]),
            keywords,
            contribution_date: lom_string(lom, &["lifeCycle", "contribute", "date", "dateTime"]),
            copyright: copyright.eq_ignore_ascii_case("yes"),
            copyright_description: lom_string(rights, &["description", "string"]),
        }
    }
}

/// Root item of the first organization.
///
/// The format allows one root `<item>` per organization. Exports that put
/// several items directly under `<organization>` get a synthetic root
/// carrying the organization identifier so none of them are lost.
fn organization_root(organizations: &XmlNode, max_depth: usize) -> Item {
    let mut organizations_iter = organizations.children_named("organization");
    let Some(organization) = organizations_iter.next() else {
        return Item::default();
    };
    if organizations_iter.next().is_some() {
        warn!("manifest declares several organizations; using the first");
    }

    let roots: Vec<&XmlNode> = organization.children_named("item").collect();
    match roots.len() {
        1 => Item::from_node(roots[0], 0, max_depth),
        0 => Item {
            identifier: organization.attr_or_empty("identifier"),
            title: organization.text_at(&["title"]),
            ..Item::default()
        },
        n => {
            debug!(roots = n, "wrapping organization items in a synthetic root");
            Item {
                identifier: organization.attr_or_empty("identifier"),
                title: organization.text_at(&["title"]),
                identifier_ref: String::new(),
                children: roots.iter().map(|r| Item::from_node(r, 1, max_depth)).collect(),
            }
        },
    }
}

impl Item {
    fn from_node(node: &XmlNode, depth: usize, max_depth: usize) -> Self {
        let identifier = node.attr_or_empty("identifier");
        let children = if depth <= max_depth {
            node.children_named("item")
                .map(|child| Item::from_node(child, depth + 1, max_depth))
                .collect()
        } else {
            if node.child("item").is_some() {
                debug!(item = %identifier, depth, "not decoding items past the depth limit");
            }
            Vec::new()
        };

        Self {
            identifier,
            identifier_ref: node.attr_or_empty("identifierref"),
            title: node.text_at(&["title"]),
            children,
        }
    }

    /// The referenced resource identifier, if this item points at one.
    pub fn resource_ref(&self) -> Option<&str> {
        Some(self.identifier_ref.as_str()).filter(|r| !r.is_empty())
    }

    /// Whether this item only groups other items.
    #[inline]
    pub fn is_folder(&self) -> bool {
        self.identifier_ref.is_empty()
    }

    /// A copy of this item without its children.
    pub fn header(&self) -> Item {
        Item {
            identifier: self.identifier.clone(),
            identifier_ref: self.identifier_ref.clone(),
            title: self.title.clone(),
            children: Vec::new(),
        }
    }

    /// This item and all descendants in document pre-order.
    pub fn walk(&self) -> Vec<&Item> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(item) = pending.pop() {
            out.push(item);
            pending.extend(item.children.iter().rev());
        }
        out
    }
}

impl Resource {
    fn from_node(node: &XmlNode) -> Self {
        Self {
            identifier: node.attr_or_empty("identifier"),
            resource_type: node.attr_or_empty("type"),
            href: node.attr_or_empty("href"),
            files: node
                .children_named("file")
                .map(|f| ResourceFile {
                    href: f.attr_or_empty("href"),
                })
                .collect(),
            dependencies: node
                .children_named("dependency")
                .map(|d| Dependency {
                    identifier_ref: d.attr_or_empty("identifierref"),
                })
                .collect(),
        }
    }

    /// The path to decode: `href` when set, otherwise the first file.
    pub fn primary_path(&self) -> Option<&str> {
        if !self.href.is_empty() {
            return Some(&self.href);
        }
        self.files
            .first()
            .map(|f| f.href.as_str())
            .filter(|h| !h.is_empty())
    }

    /// All non-empty paths the resource declares, `href` first.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::with_capacity(self.files.len() + 1);
        if !self.href.is_empty() {
            paths.push(&self.href);
        }
        for file in &self.files {
            if !file.href.is_empty() && !paths.contains(&file.href.as_str()) {
                paths.push(&file.href);
            }
        }
        paths
    }
}
