//! Unified error types for the cartridge parser.
use thiserror::Error;

/// Main error type for cartridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An archive entry (most often the manifest) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The manifest is not well-formed XML
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// A content document does not decode into the expected structure
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// No resource in the catalog carries the requested identifier
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A path declared by a resource is absent from the archive
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The organization tree, or a document's elements, nest deeper than
    /// the configured limit
    #[error("Item tree too deep at '{identifier}' (depth {depth})")]
    TreeTooDeep { identifier: String, depth: usize },

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Serialization of the manifest failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build a [`Error::Decode`] for the given archive path.
    pub(crate) fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::ResourceNotFound(_) | Error::FileNotFound(_)
        )
    }
}

/// Result type for cartridge operations.
pub type Result<T> = std::result::Result<T, Error>;
