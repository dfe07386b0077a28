//! Unified error types for the cartridge parser.
//!
//! Every fallible operation in the crate reports through a single [`Error`]
//! enum so callers can tell a missing manifest apart from a broken quiz file
//! without downcasting.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
