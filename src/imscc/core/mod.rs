//! Core cartridge package handling.
//!
//! This module provides the building blocks the cartridge facade is made
//! of: access to the ZIP container, the manifest object model, and the
//! loader that finds and decodes `imsmanifest.xml`.
//!
//! # References
//! - IMS Common Cartridge v1.1-1.3, Profile and Implementation Guide
//! - IMS Content Packaging v1.1.4 (manifest, organizations, resources)

/// Archive access
pub mod archive;
/// Manifest location and loading
pub mod loader;
/// Manifest object model
pub mod manifest;

// Re-export main types for convenience
pub use archive::{Archive, EntryReader, MemoryArchive, ZipPackage};
pub use loader::{MANIFEST_NAME, ManifestLocation, load_manifest, locate_manifest};
pub use manifest::{DEFAULT_MAX_DEPTH, Dependency, Item, Manifest, ManifestMetadata, Resource, ResourceFile};
