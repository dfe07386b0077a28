//! Common types and utilities shared across the crate.
//!
//! This module holds the pieces that are not specific to the cartridge
//! format itself: the unified error type, byte-order-mark handling and the
//! XML element tree the format parsers read from.

// Submodule declarations
pub mod bom;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use xml::{XmlNode, parse_document};
