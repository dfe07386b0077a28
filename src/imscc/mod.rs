//! IMS Common Cartridge (.imscc) support.
//!
//! A cartridge is a ZIP archive holding `imsmanifest.xml` plus the files it
//! references. The manifest is loaded once; the remaining views (typed
//! documents, the correlated item tree, file handles) are derived on demand.
//!
//! # Supported resource families
//!
//! | Type tag | Decoded as |
//! |----------|------------|
//! | `imsdt_xmlv1pN` | [`Topic`] |
//! | `imswl_xmlv1pN` | [`WebLink`] |
//! | `assignment_xmlv1pN` | [`Assignment`] |
//! | `imsqti_xmlv1pN[/imscc_xmlv1pM/assessment]` | [`Quiz`] |
//! | `imsbasiclti_xmlv1pN` | [`ExternalToolLink`] |
//! | anything else | the raw [`Resource`] |

pub mod cartridge;
pub mod core;
pub mod kind;
pub mod metadata;
pub mod options;
pub mod resolver;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cartridge::Cartridge;
pub use self::core::{
    Archive, Dependency, EntryReader, Item, MANIFEST_NAME, Manifest, ManifestLocation, ManifestMetadata,
    MemoryArchive, Resource, ResourceFile, ZipPackage,
};
pub use kind::ResourceKind;
pub use metadata::MetadataSummary;
pub use options::{ErrorPolicy, LoadOptions};
pub use resolver::{ResolvedResource, Resolver};
pub use tree::{Correlator, FullItem, FullResource};
pub use types::{
    Assignment, Attachment, ContentDocument, ExternalToolLink, Quiz, QuizItem, RichText, Topic, WebLink,
};
