//! Loaded cartridge API.

use crate::common::Result;
use crate::imscc::core::{
    Archive, EntryReader, Item, Manifest, ManifestLocation, ZipPackage, load_manifest,
};
use crate::imscc::kind::ResourceKind;
use crate::imscc::metadata::MetadataSummary;
use crate::imscc::options::LoadOptions;
use crate::imscc::resolver::{ResolvedResource, Resolver};
use crate::imscc::tree::{Correlator, FullItem, FullResource, first_owners};
use crate::imscc::types::{Assignment, ContentDocument, ExternalToolLink, Quiz, Topic, WebLink};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::warn;

/// An IMS Common Cartridge (.imscc).
///
/// The manifest is decoded once when the cartridge is loaded and is
/// read-only afterwards. Everything else (the correlated item tree, typed
/// documents, file handles) is produced fresh by each call and owned by
/// the caller.
///
/// # Examples
///
/// ```no_run
/// use imscc::Cartridge;
///
/// # fn main() -> imscc::Result<()> {
/// let cartridge = Cartridge::open("course.imscc")?;
/// println!("Title: {}", cartridge.title());
///
/// for item in cartridge.items()? {
///     println!("{} ({} children)", item.item.title, item.children.len());
/// }
///
/// for link in cartridge.weblinks()? {
///     println!("{} -> {}", link.title, link.href());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Cartridge<A = ZipPackage<BufReader<File>>> {
    archive: A,
    manifest: Manifest,
    location: ManifestLocation,
    options: LoadOptions,
}

impl Cartridge {
    /// Open a cartridge file with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read ([`crate::Error::NotFound`], [`crate::Error::Io`])
    /// - The file is not a ZIP archive ([`crate::Error::Zip`])
    /// - No manifest entry exists ([`crate::Error::NotFound`])
    /// - The manifest is not well-formed ([`crate::Error::MalformedXml`])
    /// - The manifest nests past [`crate::common::xml::MAX_NESTING`]
    ///   elements ([`crate::Error::TreeTooDeep`])
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, LoadOptions::default())
    }

    /// Open a cartridge file with custom options.
    pub fn open_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let archive = ZipPackage::open(path)?;
        Self::from_archive(archive, options)
    }
}

impl Cartridge<ZipPackage<Cursor<Vec<u8>>>> {
    /// Load a cartridge from the bytes of a ZIP archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_archive(ZipPackage::from_bytes(data)?, LoadOptions::default())
    }
}

impl<A: Archive> Cartridge<A> {
    /// Load a cartridge from any archive.
    ///
    /// # Arguments
    ///
    /// * `archive` - Container holding the manifest and resource files
    /// * `options` - Manifest name, error policy and depth limit
    pub fn from_archive(archive: A, options: LoadOptions) -> Result<Self> {
        let (manifest, location) = load_manifest(&archive, &options.manifest_name, options.max_depth)?;
        Ok(Self {
            archive,
            manifest,
            location,
            options,
        })
    }

    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Where the manifest was found in the archive.
    #[inline]
    pub fn manifest_location(&self) -> &ManifestLocation {
        &self.location
    }

    #[inline]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Names of all file entries in the archive.
    pub fn entries(&self) -> Vec<String> {
        self.archive.entry_names()
    }

    /// Course title; empty when the manifest declares none.
    #[inline]
    pub fn title(&self) -> &str {
        &self.manifest.metadata.title
    }

    /// Course metadata.
    pub fn metadata(&self) -> MetadataSummary {
        MetadataSummary::from(&self.manifest.metadata)
    }

    /// Course metadata as a JSON object.
    pub fn metadata_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.metadata())?)
    }

    /// Top-level items of the organization, each correlated with its
    /// resources and children.
    ///
    /// # Errors
    /// Only under [`crate::ErrorPolicy::Strict`], see
    /// [`Correlator::build_tree`].
    pub fn items(&self) -> Result<Vec<FullItem>> {
        Correlator::new(&self.manifest, &self.options).build_tree()
    }

    /// Every catalog resource, resolved, with the item referencing it.
    ///
    /// Exactly one entry per catalog resource, in catalog order. A
    /// structured resource that fails to resolve is returned raw with
    /// [`FullResource::decode_error`] set, or fails the call under
    /// [`crate::ErrorPolicy::Strict`].
    pub fn resources(&self) -> Result<Vec<FullResource>> {
        let owners = first_owners(&self.items()?);
        let resolver = self.resolver();

        let mut out = Vec::with_capacity(self.manifest.resources.len());
        for resource in &self.manifest.resources {
            let item = owners.get(&resource.identifier).cloned();
            let entry = match resolver.resolve_resource(resource) {
                Ok(resolved) => FullResource {
                    identifier: resource.identifier.clone(),
                    resource: resolved,
                    item,
                    decode_error: None,
                },
                Err(e) if self.options.is_strict() => return Err(e),
                Err(e) => {
                    warn!(resource = %resource.identifier, error = %e, "keeping raw resource");
                    FullResource {
                        identifier: resource.identifier.clone(),
                        resource: ResolvedResource::Raw(resource.clone()),
                        item,
                        decode_error: Some(e.to_string()),
                    }
                },
            };
            out.push(entry);
        }
        Ok(out)
    }

    /// All discussion topics.
    pub fn topics(&self) -> Result<Vec<Topic>> {
        self.collect(ResourceKind::Topic)
    }

    /// All web links.
    pub fn weblinks(&self) -> Result<Vec<WebLink>> {
        self.collect(ResourceKind::WebLink)
    }

    /// All assignments.
    pub fn assignments(&self) -> Result<Vec<Assignment>> {
        self.collect(ResourceKind::Assignment)
    }

    /// All QTI assessments and question banks.
    pub fn quizzes(&self) -> Result<Vec<Quiz>> {
        self.collect(ResourceKind::Quiz)
    }

    /// All basic LTI links.
    pub fn external_tool_links(&self) -> Result<Vec<ExternalToolLink>> {
        self.collect(ResourceKind::ExternalToolLink)
    }

    /// Resolve the resource with exactly this identifier.
    ///
    /// Structured resources decode into their typed document; everything
    /// else, including resources without files, comes back as
    /// [`ResolvedResource::Raw`].
    ///
    /// # Errors
    /// [`crate::Error::ResourceNotFound`], [`crate::Error::FileNotFound`] or
    /// [`crate::Error::Decode`].
    pub fn find(&self, identifier: &str) -> Result<ResolvedResource> {
        self.resolver().resolve(identifier)
    }

    /// Open the first file of the resource with this identifier.
    ///
    /// The returned reader owns the file contents; drop it to close it.
    pub fn find_file(&self, identifier: &str) -> Result<EntryReader> {
        self.resolver().resolve_file(identifier)
    }

    /// First item, in document order, whose `identifier_ref` equals
    /// `identifier_ref`.
    pub fn find_item(&self, identifier_ref: &str) -> Option<&Item> {
        self.manifest
            .organization
            .walk()
            .into_iter()
            .find(|item| item.identifier_ref == identifier_ref && !item.is_folder())
    }

    /// The whole manifest as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.manifest)?)
    }

    /// The whole manifest as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.manifest)?)
    }

    fn resolver(&self) -> Resolver<'_, A> {
        Resolver::new(&self.archive, &self.manifest, &self.location.base)
    }

    fn collect<T: ContentDocument>(&self, kind: ResourceKind) -> Result<Vec<T>> {
        self.resolver().collect(kind, self.options.error_policy)
    }
}

impl<A> std::fmt::Debug for Cartridge<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("title", &self.manifest.metadata.title)
            .field("manifest", &self.location.entry)
            .field("resources", &self.manifest.resources.len())
            .finish()
    }
}
