//! Error types raised while interpreting envelope documents.

use thiserror::Error;

/// Reasons a JSON document fails to match the success/error envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The top-level document was not a JSON object.
    #[error("envelope must be a JSON object")]
    NotAnObject,
    /// A field required by the selected variant was absent.
    #[error("envelope field `{field}` is missing")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// A field was present with the wrong JSON type or range.
    #[error("envelope field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The `success` flag contradicts a field carried by the document.
    #[error("envelope with success={success} must not carry `{field}`")]
    Inconsistent {
        /// Value of the `success` flag.
        success: bool,
        /// Field that belongs to the other variant.
        field: &'static str,
    },
    /// The `error` object could not be decoded.
    #[error("malformed error object")]
    MalformedError {
        /// Decoder failure detail.
        source: serde_json::Error,
    },
}

/// Convenience alias for envelope results.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
