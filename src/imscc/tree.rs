//! Item/resource correlation.
//!
//! The organization tree and the resource catalog are separate lists in the
//! manifest, joined only by `identifierref`. [`Correlator`] walks the tree
//! and pairs every item with the catalog entries it references.
//!
//! The join is by containment: a resource belongs to an item when its
//! identifier occurs inside the item's `identifier_ref`. Producers that
//! qualify references (`course1:res_3`) still correlate this way; exact
//! references are the common special case.

use crate::common::{Error, Result};
use crate::imscc::core::{Item, Manifest, Resource};
use crate::imscc::options::{ErrorPolicy, LoadOptions};
use crate::imscc::resolver::ResolvedResource;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// An item together with the resources it references and its correlated
/// children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FullItem {
    /// The item itself; `children` is always empty, see [`FullItem::children`]
    pub item: Item,
    pub resources: Vec<Resource>,
    pub children: Vec<FullItem>,
}

impl FullItem {
    /// This node and all descendants in document pre-order.
    pub fn walk(&self) -> Vec<&FullItem> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            out.push(node);
            pending.extend(node.children.iter().rev());
        }
        out
    }
}

/// A resolved resource with the item that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullResource {
    /// Catalog identifier of the resource
    pub identifier: String,
    pub resource: ResolvedResource,
    /// First item, in document order, referencing the resource
    pub item: Option<Item>,
    /// Why typed decoding failed, when `resource` is the raw fallback
    /// for a structured resource
    pub decode_error: Option<String>,
}

pub struct Correlator<'a> {
    manifest: &'a Manifest,
    policy: ErrorPolicy,
    max_depth: usize,
}

impl<'a> Correlator<'a> {
    pub fn new(manifest: &'a Manifest, options: &LoadOptions) -> Self {
        Self {
            manifest,
            policy: options.error_policy,
            max_depth: options.max_depth,
        }
    }

    /// Correlate the top-level items of the organization.
    ///
    /// The organization root is structural and not part of the result.
    /// Under [`ErrorPolicy::Lenient`] a subtree that cannot be built is kept
    /// as its item and resources with no children; under
    /// [`ErrorPolicy::Strict`] the error is returned.
    ///
    /// # Errors
    /// [`Error::TreeTooDeep`] (strict only) when items nest deeper than
    /// [`LoadOptions::max_depth`].
    pub fn build_tree(&self) -> Result<Vec<FullItem>> {
        self.manifest
            .top_level_items()
            .iter()
            .map(|item| self.build_child(item, 1))
            .collect()
    }

    fn build_child(&self, item: &Item, depth: usize) -> Result<FullItem> {
        match self.build(item, depth) {
            Ok(full) => Ok(full),
            Err(e) if self.policy == ErrorPolicy::Strict => Err(e),
            Err(e) => {
                warn!(item = %item.identifier, error = %e, "dropping children of item");
                Ok(FullItem {
                    item: item.header(),
                    resources: self.attached_resources(item),
                    children: Vec::new(),
                })
            },
        }
    }

    fn build(&self, item: &Item, depth: usize) -> Result<FullItem> {
        if depth > self.max_depth {
            return Err(Error::TreeTooDeep {
                identifier: item.identifier.clone(),
                depth,
            });
        }

        let children = item
            .children
            .iter()
            .map(|child| self.build_child(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(FullItem {
            item: item.header(),
            resources: self.attached_resources(item),
            children,
        })
    }

    /// Catalog resources whose identifier occurs in the item's reference,
    /// in catalog order.
    pub fn attached_resources(&self, item: &Item) -> Vec<Resource> {
        let Some(reference) = item.resource_ref() else {
            return Vec::new();
        };
        self.manifest
            .resources
            .iter()
            .filter(|r| !r.identifier.is_empty() && reference.contains(r.identifier.as_str()))
            .cloned()
            .collect()
    }
}

/// Map each attached resource identifier to the first item (pre-order)
/// that references it.
pub fn first_owners(tree: &[FullItem]) -> HashMap<String, Item> {
    let mut owners = HashMap::new();
    for node in tree.iter().flat_map(FullItem::walk) {
        for resource in &node.resources {
            owners
                .entry(resource.identifier.clone())
                .or_insert_with(|| node.item.clone());
        }
    }
    owners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imscc::testing::{self, manifest_with};

    fn nested(depth: usize) -> Manifest {
        let mut xml = String::from(r#"<manifest><organizations><organization identifier="org"><item identifier="root">"#);
        for i in 0..depth {
            xml.push_str(&format!(r#"<item identifier="level_{i}" identifierref="res_{i:04}">"#));
        }
        xml.push_str(&"</item>".repeat(depth));
        xml.push_str("</item></organization></organizations><resources>");
        for i in 0..depth {
            xml.push_str(&format!(r#"<resource identifier="res_{i:04}" type="webcontent"/>"#));
        }
        xml.push_str("</resources></manifest>");
        Manifest::parse(xml.as_bytes()).unwrap()
    }

    fn depth_of(items: &[FullItem]) -> usize {
        items.iter().map(|i| 1 + depth_of(&i.children)).max().unwrap_or(0)
    }

    #[test]
    fn test_loaded_course_shape() {
        let entries = testing::loaded_course();
        let manifest = Manifest::parse(&entries[0].1).unwrap();
        let tree = Correlator::new(&manifest, &LoadOptions::default()).build_tree().unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 11);
        assert_eq!(tree[1].children.len(), 1);
        assert!(tree[0].resources.is_empty());
        assert!(tree[0].item.children.is_empty());
        assert_eq!(tree[1].children[0].resources[0].identifier, "web_012");
    }

    #[test]
    fn test_attachment_is_exactly_containment() {
        let entries = testing::loaded_course();
        let manifest = Manifest::parse(&entries[0].1).unwrap();
        let tree = Correlator::new(&manifest, &LoadOptions::default()).build_tree().unwrap();

        for node in tree.iter().flat_map(FullItem::walk) {
            let mut attached: Vec<&str> = node.resources.iter().map(|r| r.identifier.as_str()).collect();
            let mut expected: Vec<&str> = if node.item.identifier_ref.is_empty() {
                Vec::new()
            } else {
                manifest
                    .resources
                    .iter()
                    .map(|r| r.identifier.as_str())
                    .filter(|id| node.item.identifier_ref.contains(id))
                    .collect()
            };
            attached.sort();
            expected.sort();
            assert_eq!(attached, expected, "item {}", node.item.identifier);
        }
    }

    #[test]
    fn test_qualified_reference() {
        let manifest = Manifest::parse(
            manifest_with(
                r#"<resource identifier="res_3" type="webcontent"/>
                   <resource identifier="res_4" type="webcontent"/>
                   <resource identifier="" type="webcontent"/>"#,
                &["course1:res_3", "", "unknown"],
            )
            .as_bytes(),
        )
        .unwrap();
        let tree = Correlator::new(&manifest, &LoadOptions::default()).build_tree().unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].resources.len(), 1);
        assert_eq!(tree[0].resources[0].identifier, "res_3");
        assert!(tree[1].resources.is_empty());
        assert!(tree[2].resources.is_empty());
    }

    #[test]
    fn test_empty_organization() {
        let manifest = Manifest::parse(b"<manifest/>").unwrap();
        let tree = Correlator::new(&manifest, &LoadOptions::default()).build_tree().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_depth_limit_lenient() {
        let manifest = nested(10);
        let options = LoadOptions::new().with_max_depth(4);
        let tree = Correlator::new(&manifest, &options).build_tree().unwrap();

        // The item past the limit is kept but loses its children.
        assert_eq!(depth_of(&tree), 5);
        let deepest = tree[0].walk().into_iter().last().unwrap();
        assert_eq!(deepest.item.identifier, "level_4");
        assert_eq!(deepest.resources[0].identifier, "res_0004");
    }

    #[test]
    fn test_depth_limit_strict() {
        let manifest = nested(10);
        let options = LoadOptions::new()
            .with_max_depth(4)
            .with_error_policy(ErrorPolicy::Strict);
        match Correlator::new(&manifest, &options).build_tree() {
            Err(Error::TreeTooDeep { identifier, depth }) => {
                assert_eq!(identifier, "level_4");
                assert_eq!(depth, 5);
            },
            other => panic!("unexpected result: {:?}", other),
        }

        let within = LoadOptions::new()
            .with_max_depth(10)
            .with_error_policy(ErrorPolicy::Strict);
        let tree = Correlator::new(&manifest, &within).build_tree().unwrap();
        assert_eq!(depth_of(&tree), 10);
    }

    #[test]
    fn test_first_owner_wins() {
        let manifest = Manifest::parse(
            manifest_with(
                r#"<resource identifier="shared" type="webcontent"/>"#,
                &["shared", "shared"],
            )
            .as_bytes(),
        )
        .unwrap();
        let tree = Correlator::new(&manifest, &LoadOptions::default()).build_tree().unwrap();
        let owners = first_owners(&tree);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners["shared"].identifier, "item_0");
    }
}
