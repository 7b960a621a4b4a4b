//! Typed configuration consumed by the envelope assertions.

use serde::Serialize;

/// Default recursion limit applied while walking expected `data` payloads.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Upper bound accepted for [`AssertConfig::max_depth`].
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Settings that change how envelope assertions behave.
///
/// Serializes to the document shape read by [`AssertConfig::from_json`];
/// deserializing goes through that loader, so depth limits are validated.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AssertConfig {
    /// When set, error assertions also require the body's `status` field to
    /// match the expected status code.
    #[serde(rename = "status_code")]
    pub include_status_in_error: bool,
    /// Maximum nesting depth walked by the leaf-wise data check.
    pub max_depth: usize,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            include_status_in_error: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl AssertConfig {
    /// Return a copy with the status-in-error flag replaced.
    #[must_use]
    pub const fn with_status_in_error(mut self, enabled: bool) -> Self {
        self.include_status_in_error = enabled;
        self
    }

    /// Return a copy with a different depth limit.
    ///
    /// The value is not validated here; loaders reject out-of-range limits.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
