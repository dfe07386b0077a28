//! Typed resource resolution.
//!
//! A resource is resolved in two steps: its type tag is classified, then,
//! for the structured families, the backing file is read from the archive
//! and decoded. Everything else (plain web content, learning application
//! resources, unknown tags, resources without files) resolves to the raw
//! catalog entry.

use crate::common::{Error, Result};
use crate::imscc::core::archive::{Archive, EntryReader, entry_candidates, join_entry_path};
use crate::imscc::core::{Manifest, Resource};
use crate::imscc::kind::ResourceKind;
use crate::imscc::options::ErrorPolicy;
use crate::imscc::types::{Assignment, ContentDocument, ExternalToolLink, Quiz, Topic, WebLink};
use serde::Serialize;
use tracing::{debug, warn};

/// A resource in its decoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ResolvedResource {
    Topic(Topic),
    WebLink(WebLink),
    Assignment(Assignment),
    Quiz(Quiz),
    ExternalToolLink(ExternalToolLink),
    /// The catalog entry itself, for resources with no structured document
    Raw(Resource),
}

impl ResolvedResource {
    /// The family this value was decoded as. Raw resources report
    /// the classification of their type tag.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResolvedResource::Topic(_) => ResourceKind::Topic,
            ResolvedResource::WebLink(_) => ResourceKind::WebLink,
            ResolvedResource::Assignment(_) => ResourceKind::Assignment,
            ResolvedResource::Quiz(_) => ResourceKind::Quiz,
            ResolvedResource::ExternalToolLink(_) => ResourceKind::ExternalToolLink,
            ResolvedResource::Raw(r) => ResourceKind::classify(&r.resource_type),
        }
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        matches!(self, ResolvedResource::Raw(_))
    }

    pub fn as_topic(&self) -> Option<&Topic> {
        match self {
            ResolvedResource::Topic(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_weblink(&self) -> Option<&WebLink> {
        match self {
            ResolvedResource::WebLink(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_assignment(&self) -> Option<&Assignment> {
        match self {
            ResolvedResource::Assignment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_quiz(&self) -> Option<&Quiz> {
        match self {
            ResolvedResource::Quiz(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_external_tool_link(&self) -> Option<&ExternalToolLink> {
        match self {
            ResolvedResource::ExternalToolLink(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Resource> {
        match self {
            ResolvedResource::Raw(r) => Some(r),
            _ => None,
        }
    }
}

type Decoder = fn(&str, &[u8]) -> Result<ResolvedResource>;

/// Typed decoder of a family; `None` for families that stay raw.
fn decoder(kind: ResourceKind) -> Option<Decoder> {
    let decode: Decoder = match kind {
        ResourceKind::Topic => |path, data| Topic::decode(path, data).map(ResolvedResource::Topic),
        ResourceKind::WebLink => |path, data| WebLink::decode(path, data).map(ResolvedResource::WebLink),
        ResourceKind::Assignment => |path, data| Assignment::decode(path, data).map(ResolvedResource::Assignment),
        ResourceKind::Quiz => |path, data| Quiz::decode(path, data).map(ResolvedResource::Quiz),
        ResourceKind::ExternalToolLink => {
            |path, data| ExternalToolLink::decode(path, data).map(ResolvedResource::ExternalToolLink)
        },
        ResourceKind::WebContent | ResourceKind::AssociatedContent | ResourceKind::Unknown => return None,
    };
    Some(decode)
}

/// Resolves catalog entries against the archive they were loaded from.
pub struct Resolver<'a, A: Archive + ?Sized> {
    archive: &'a A,
    manifest: &'a Manifest,
    /// Directory holding the manifest
    base: &'a str,
}

impl<'a, A: Archive + ?Sized> Resolver<'a, A> {
    pub fn new(archive: &'a A, manifest: &'a Manifest, base: &'a str) -> Self {
        Self {
            archive,
            manifest,
            base,
        }
    }

    /// Resolve the resource with exactly this identifier.
    ///
    /// # Errors
    /// [`Error::ResourceNotFound`] if no resource has the identifier, plus
    /// everything [`Resolver::resolve_resource`] returns.
    pub fn resolve(&self, identifier: &str) -> Result<ResolvedResource> {
        let resource = self
            .manifest
            .resource(identifier)
            .ok_or_else(|| Error::ResourceNotFound(identifier.to_string()))?;
        self.resolve_resource(resource)
    }

    /// Resolve a catalog entry.
    ///
    /// The primary path (`href`, else the first file) is decoded. When it
    /// holds some other document, such as an HTML description listed ahead
    /// of the XML, the remaining declared paths are tried before the
    /// original decode error is returned.
    ///
    /// # Errors
    /// [`Error::FileNotFound`] if the primary path is not in the archive,
    /// [`Error::Decode`] if no declared path decodes as the family's
    /// document.
    pub fn resolve_resource(&self, resource: &Resource) -> Result<ResolvedResource> {
        let Some(primary) = resource.primary_path() else {
            debug!(resource = %resource.identifier, "resource has no file, returning it raw");
            return Ok(ResolvedResource::Raw(resource.clone()));
        };

        let kind = ResourceKind::classify(&resource.resource_type);
        let Some(decode) = decoder(kind) else {
            return Ok(ResolvedResource::Raw(resource.clone()));
        };

        match self.decode_path(decode, primary) {
            Err(err @ Error::Decode { .. }) => {
                for path in resource.paths().into_iter().filter(|p| *p != primary) {
                    match self.decode_path(decode, path) {
                        Ok(resolved) => {
                            debug!(resource = %resource.identifier, path, "decoded from secondary path");
                            return Ok(resolved);
                        },
                        Err(e) => debug!(resource = %resource.identifier, path, error = %e, "secondary path rejected"),
                    }
                }
                Err(err)
            },
            other => other,
        }
    }

    /// Open the first file of the resource with this identifier, falling
    /// back to its `href`.
    ///
    /// # Errors
    /// [`Error::ResourceNotFound`] if no resource has the identifier and
    /// [`Error::FileNotFound`] if it declares no path or the path is absent.
    pub fn resolve_file(&self, identifier: &str) -> Result<EntryReader> {
        let resource = self
            .manifest
            .resource(identifier)
            .ok_or_else(|| Error::ResourceNotFound(identifier.to_string()))?;

        let path = resource
            .files
            .iter()
            .map(|f| f.href.as_str())
            .find(|h| !h.is_empty())
            .or_else(|| Some(resource.href.as_str()).filter(|h| !h.is_empty()))
            .ok_or_else(|| Error::FileNotFound(format!("resource {} declares no file", identifier)))?;

        let (entry, data) = self.read_candidates(path)?;
        Ok(EntryReader::new(&entry, data))
    }

    /// Read a manifest-relative path from the archive.
    pub fn read_path(&self, href: &str) -> Result<Vec<u8>> {
        self.read_candidates(href).map(|(_, data)| data)
    }

    /// Decode every document of one family.
    ///
    /// Each path of each matching resource is tried; documents whose root
    /// element belongs to another family are skipped. Missing files are
    /// skipped with a warning under [`ErrorPolicy::Lenient`] and returned
    /// under [`ErrorPolicy::Strict`].
    pub fn collect<T: ContentDocument>(&self, kind: ResourceKind, policy: ErrorPolicy) -> Result<Vec<T>> {
        let mut documents = Vec::new();
        for resource in &self.manifest.resources {
            if ResourceKind::classify(&resource.resource_type) != kind {
                continue;
            }
            for path in resource.paths() {
                let data = match self.read_path(path) {
                    Ok(data) => data,
                    Err(e) if policy == ErrorPolicy::Strict => return Err(e),
                    Err(e) => {
                        warn!(resource = %resource.identifier, path, error = %e, "skipping unreadable file");
                        continue;
                    },
                };
                match T::decode(path, &data) {
                    Ok(doc) => documents.push(doc),
                    Err(e) => debug!(resource = %resource.identifier, path, error = %e, "not a {} document", kind),
                }
            }
        }
        Ok(documents)
    }

    fn decode_path(&self, decode: Decoder, path: &str) -> Result<ResolvedResource> {
        let data = self.read_path(path)?;
        decode(path, &data)
    }

    fn read_candidates(&self, href: &str) -> Result<(String, Vec<u8>)> {
        for candidate in entry_candidates(self.base, href) {
            match self.archive.read_entry(&candidate) {
                Ok(data) => return Ok((candidate, data)),
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::FileNotFound(join_entry_path(self.base, href)))
    }
}
