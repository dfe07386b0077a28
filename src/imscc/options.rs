/// Configuration for loading and traversing cartridges.
///
/// Real-world exports are frequently inconsistent: resources list files
/// that were never packaged, organizations nest absurdly deep, quiz folders
/// hold HTML next to the QTI file. [`LoadOptions`] decides how much of that
/// the crate tolerates.
///
/// # Examples
///
/// ```rust
/// use imscc::{ErrorPolicy, LoadOptions};
///
/// // Create with defaults
/// let options = LoadOptions::default();
///
/// // Or customize
/// let options = LoadOptions::new()
///     .with_error_policy(ErrorPolicy::Strict)
///     .with_max_depth(64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// File name identifying the manifest entry
    pub manifest_name: String,
    /// What listings and tree traversal do when one entry fails
    pub error_policy: ErrorPolicy,
    /// Deepest organization item nesting decoded and traversed
    pub max_depth: usize,
}

/// How per-entry failures inside a listing or traversal are handled.
///
/// Loading the manifest and single lookups (`find`, `find_file`) always
/// fail immediately; the policy only governs operations that cover many
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Skip or degrade the failing entry, log a warning and continue.
    #[default]
    Lenient,
    /// Stop at the first failure and return it.
    Strict,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            manifest_name: crate::imscc::core::MANIFEST_NAME.to_string(),
            error_policy: ErrorPolicy::Lenient,
            max_depth: crate::imscc::core::DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoadOptions {
    /// Create a new `LoadOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the manifest file name to look for.
    #[inline]
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Set the error policy for listings and traversal.
    #[inline]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the maximum item nesting depth.
    #[inline]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[inline]
    pub(crate) fn is_strict(&self) -> bool {
        self.error_policy == ErrorPolicy::Strict
    }
}
