//! imscc - A Rust library for reading IMS Common Cartridge packages
//!
//! Common Cartridge is the interchange format learning management systems
//! use to export and import courses. A cartridge is a ZIP archive with an
//! `imsmanifest.xml` describing the course metadata, its table of contents
//! and a catalog of resources (discussion topics, web links, assignments,
//! QTI quizzes, LTI tool links and plain files).
//!
//! # Features
//!
//! - **Manifest model**: LOM metadata, the organization tree and the
//!   resource catalog, decoded permissively
//! - **Typed resources**: resources are classified by their versioned type
//!   tag and decoded into typed documents, falling back to the raw entry
//! - **Item correlation**: the table of contents joined with the resources
//!   each entry references
//! - **Serialization**: the whole manifest as JSON via `serde`
//!
//! # Example - Inspecting a cartridge
//!
//! ```no_run
//! use imscc::{Cartridge, ResolvedResource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cartridge = Cartridge::open("course.imscc")?;
//! println!("Course: {}", cartridge.title());
//!
//! for entry in cartridge.resources()? {
//!     match &entry.resource {
//!         ResolvedResource::WebLink(link) => println!("link {}", link.href()),
//!         ResolvedResource::Quiz(quiz) => println!("quiz with {} questions", quiz.question_count()),
//!         other => println!("{} ({})", entry.identifier, other.kind()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a resource file
//!
//! ```no_run
//! use std::io::Read;
//! use imscc::Cartridge;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cartridge = Cartridge::open("course.imscc")?;
//! let mut file = cartridge.find_file("syllabus")?;
//! let mut html = String::new();
//! file.read_to_string(&mut html)?;
//! # Ok(())
//! # }
//! ```

/// Shared plumbing: errors, text decoding and the XML element tree
pub mod common;

/// IMS Common Cartridge reader
///
/// This module provides the manifest model, resource classification and
/// decoding, and the [`Cartridge`] facade tying them together.
pub mod imscc;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use imscc::{
    Cartridge, ErrorPolicy, FullItem, FullResource, Item, LoadOptions, Manifest, MetadataSummary, ResolvedResource,
    Resource, ResourceKind,
};
