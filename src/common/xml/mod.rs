//! XML decoding shared by the manifest and content-document parsers.
//!
//! Cartridge documents are small and read once, so rather than driving a
//! separate event loop per document type the crate folds each document into
//! an owned [`XmlNode`] tree and lets the typed models pick fields out of it
//! by local name. Namespace prefixes are dropped: `lomimscc:title`,
//! `lom:title` and `title` all answer to `title`.

mod node;

pub use node::{MAX_NESTING, XmlNode, parse_document};
