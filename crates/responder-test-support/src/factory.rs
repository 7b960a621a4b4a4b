//! Producers of the expected success response for a given payload.

use axum::http::StatusCode;
use responder_models::{DATA_KEY, SuccessEnvelope};
use serde_json::Value;

/// The response a producer would emit for some payload and status.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedResponse {
    /// Status code the producer would respond with.
    pub status: StatusCode,
    /// Full envelope body the producer would respond with.
    pub body: Value,
}

impl ExpectedResponse {
    /// The `data` member of the expected body.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.body.get(DATA_KEY)
    }
}

/// Builds the expected success response for a payload and status.
///
/// Implemented by [`EnvelopeResponder`] for the plain envelope and by any
/// `Fn(Option<Value>, StatusCode) -> ExpectedResponse`, so producers that
/// transform payloads (serializers, field renames) can be plugged in.
pub trait ResponseFactory {
    /// Produce the expected response for `data` and `status`.
    fn success(&self, data: Option<Value>, status: StatusCode) -> ExpectedResponse;
}

/// Wraps the payload unchanged in a [`SuccessEnvelope`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeResponder;

impl ResponseFactory for EnvelopeResponder {
    fn success(&self, data: Option<Value>, status: StatusCode) -> ExpectedResponse {
        ExpectedResponse {
            status,
            body: SuccessEnvelope::new(status.as_u16(), data).into_value(),
        }
    }
}

impl<F> ResponseFactory for F
where
    F: Fn(Option<Value>, StatusCode) -> ExpectedResponse,
{
    fn success(&self, data: Option<Value>, status: StatusCode) -> ExpectedResponse {
        self(data, status)
    }
}
