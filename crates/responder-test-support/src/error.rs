//! Assertion failure type shared by every primitive and envelope helper.

use responder_models::EnvelopeError;
use thiserror::Error;

/// A single assertion failure.
///
/// Every check returns this on divergence; helpers propagate it unchanged so
/// the first failing primitive decides the reported cause.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The response status code differed from the expected one.
    #[error("expected status code {expected}, got {actual}")]
    StatusMismatch {
        /// Expected status code.
        expected: u16,
        /// Status code carried by the response.
        actual: u16,
    },
    /// A JSON fragment did not appear anywhere in the body.
    #[error("unable to find JSON fragment {fragment} within {body}")]
    FragmentMissing {
        /// Compact rendering of the missing fragment.
        fragment: String,
        /// Compact rendering of the response body.
        body: String,
    },
    /// The body lacked a key required by a structure description.
    #[error("JSON structure mismatch at `{path}`: {reason}")]
    StructureMismatch {
        /// JSON Pointer to the offending location.
        path: String,
        /// Machine-readable reason for the mismatch.
        reason: &'static str,
    },
    /// The body was not a superset of the expected document.
    #[error(
        "JSON subset mismatch at `{path}`: expected {expected}, found {}",
        .actual.as_deref().unwrap_or("nothing")
    )]
    SubsetMismatch {
        /// JSON Pointer to the offending location.
        path: String,
        /// Compact rendering of the expected value.
        expected: String,
        /// Compact rendering of the value found, if the location exists.
        actual: Option<String>,
    },
    /// The body was not exactly equal to the expected document.
    #[error("expected JSON body {expected}, got {actual}")]
    NotEqual {
        /// Compact rendering of the expected document.
        expected: String,
        /// Compact rendering of the response body.
        actual: String,
    },
    /// The body could not be decoded as JSON.
    #[error("response body is not valid JSON")]
    InvalidJson {
        /// Decoder failure detail.
        source: serde_json::Error,
    },
    /// A key expected at the top level of the body was absent.
    #[error("response body has no `{key}` key")]
    MissingKey {
        /// Name of the absent key.
        key: &'static str,
    },
    /// The body violated the success/error envelope contract.
    #[error("response body is not a valid envelope")]
    InvalidEnvelope {
        /// Envelope validation failure.
        source: EnvelopeError,
    },
    /// Expected data nested deeper than the configured limit.
    #[error("expected data exceeds the depth limit of {limit} at `{path}`")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
        /// JSON Pointer to the first node beyond the limit.
        path: String,
    },
    /// The response body stream failed while being drained.
    #[error("failed to read response body")]
    BodyRead {
        /// Body stream failure.
        source: axum::Error,
    },
}

/// Convenience alias for assertion results.
pub type AssertResult<T> = Result<T, AssertionError>;
