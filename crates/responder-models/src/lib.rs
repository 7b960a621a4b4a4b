#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Envelope types for the Responder JSON contract.
//!
//! Every API response is wrapped in one of two shapes:
//!
//! - success: `{ "success": true, "status": 200, "data": ... }`
//! - error: `{ "success": false, "status": 404, "error": { "code": "...", ... } }`
//!
//! The assertion helpers build expected bodies from these types and validate
//! captured bodies against them, so the shape lives in exactly one place.

pub mod error;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::{EnvelopeError, EnvelopeResult};

/// Name of the boolean discriminator field.
pub const SUCCESS_KEY: &str = "success";
/// Name of the HTTP status field.
pub const STATUS_KEY: &str = "status";
/// Name of the payload field on success envelopes.
pub const DATA_KEY: &str = "data";
/// Name of the error object field on error envelopes.
pub const ERROR_KEY: &str = "error";
/// Name of the machine-readable code inside the error object.
pub const CODE_KEY: &str = "code";

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessEnvelope {
    /// Always `true` for this variant.
    pub success: bool,
    /// HTTP status code mirrored into the body.
    pub status: u16,
    /// Response payload; `null` when the endpoint returns nothing.
    pub data: Value,
}

impl SuccessEnvelope {
    /// Build a success envelope, treating absent data as `null`.
    #[must_use]
    pub fn new(status: u16, data: Option<Value>) -> Self {
        Self {
            success: true,
            status,
            data: data.unwrap_or(Value::Null),
        }
    }

    /// Render the envelope as a JSON document.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut body = Map::new();
        body.insert(SUCCESS_KEY.to_string(), Value::Bool(self.success));
        body.insert(STATUS_KEY.to_string(), Value::from(self.status));
        body.insert(DATA_KEY.to_string(), self.data);
        Value::Object(body)
    }
}

/// Error object carried by [`ErrorEnvelope`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorObject {
    /// Machine-readable error code (e.g. `NOT_FOUND`).
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Human-readable message when the producer includes one.
    pub message: Option<String>,
    #[serde(flatten)]
    /// Any additional fields the producer attached.
    pub extra: Map<String, Value>,
}

/// Failed response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    /// Always `false` for this variant.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// HTTP status code, present when the producer mirrors it into error bodies.
    pub status: Option<u16>,
    /// Error details.
    pub error: ErrorObject,
}

impl ErrorEnvelope {
    /// Build an error envelope for the given code.
    #[must_use]
    pub fn new(code: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            status,
            error: ErrorObject {
                code: code.into(),
                message: None,
                extra: Map::new(),
            },
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error.message = Some(message.into());
        self
    }

    /// Render the envelope as a JSON document.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut error = self.error.extra;
        error.insert(CODE_KEY.to_string(), Value::String(self.error.code));
        if let Some(message) = self.error.message {
            error.insert("message".to_string(), Value::String(message));
        }

        let mut body = Map::new();
        body.insert(SUCCESS_KEY.to_string(), Value::Bool(self.success));
        if let Some(status) = self.status {
            body.insert(STATUS_KEY.to_string(), Value::from(status));
        }
        body.insert(ERROR_KEY.to_string(), Value::Object(error));
        Value::Object(body)
    }
}

/// A decoded envelope of either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `success: true` variant.
    Success(SuccessEnvelope),
    /// `success: false` variant.
    Error(ErrorEnvelope),
}

impl Envelope {
    /// Interpret a JSON document as an envelope.
    ///
    /// The `success` flag selects the variant and the fields required by that
    /// variant must be present; fields belonging to the other variant are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] describing the first violated rule.
    pub fn from_value(value: &Value) -> EnvelopeResult<Self> {
        let body = value.as_object().ok_or(EnvelopeError::NotAnObject)?;
        let success = match body.get(SUCCESS_KEY) {
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                return Err(EnvelopeError::InvalidField {
                    field: SUCCESS_KEY,
                    reason: "not a boolean",
                });
            }
            None => return Err(EnvelopeError::MissingField { field: SUCCESS_KEY }),
        };
        let status = parse_status(body.get(STATUS_KEY))?;

        if success {
            if body.contains_key(ERROR_KEY) {
                return Err(EnvelopeError::Inconsistent {
                    success,
                    field: ERROR_KEY,
                });
            }
            let status = status.ok_or(EnvelopeError::MissingField { field: STATUS_KEY })?;
            let data = body
                .get(DATA_KEY)
                .cloned()
                .ok_or(EnvelopeError::MissingField { field: DATA_KEY })?;
            return Ok(Self::Success(SuccessEnvelope {
                success,
                status,
                data,
            }));
        }

        if body.contains_key(DATA_KEY) {
            return Err(EnvelopeError::Inconsistent {
                success,
                field: DATA_KEY,
            });
        }
        let error = body
            .get(ERROR_KEY)
            .ok_or(EnvelopeError::MissingField { field: ERROR_KEY })?;
        if !error.is_object() {
            return Err(EnvelopeError::InvalidField {
                field: ERROR_KEY,
                reason: "not an object",
            });
        }
        let error: ErrorObject = serde_json::from_value(error.clone())
            .map_err(|source| EnvelopeError::MalformedError { source })?;
        Ok(Self::Error(ErrorEnvelope {
            success,
            status,
            error,
        }))
    }

    /// Whether this is the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Status code carried in the body, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Success(envelope) => Some(envelope.status),
            Self::Error(envelope) => envelope.status,
        }
    }
}

fn parse_status(value: Option<&Value>) -> EnvelopeResult<Option<u16>> {
    let Some(value) = value else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|raw| u16::try_from(raw).ok())
        .filter(|code| (100..=999).contains(code))
        .map(Some)
        .ok_or(EnvelopeError::InvalidField {
            field: STATUS_KEY,
            reason: "not an HTTP status code",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_renders_null_data_when_absent() {
        let body = SuccessEnvelope::new(201, None).into_value();
        assert_eq!(body, json!({"success": true, "status": 201, "data": null}));
    }

    #[test]
    fn error_envelope_renders_optional_fields() {
        let bare = ErrorEnvelope::new("NOT_FOUND", None).into_value();
        assert_eq!(bare, json!({"success": false, "error": {"code": "NOT_FOUND"}}));

        let full = ErrorEnvelope::new("NOT_FOUND", Some(404))
            .with_message("no such user")
            .into_value();
        assert_eq!(
            full,
            json!({
                "success": false,
                "status": 404,
                "error": {"code": "NOT_FOUND", "message": "no such user"}
            })
        );
    }

    #[test]
    fn from_value_accepts_both_variants() {
        let success =
            Envelope::from_value(&json!({"success": true, "status": 200, "data": {"id": 1}}))
                .expect("success envelope");
        assert!(success.is_success());
        assert_eq!(success.status(), Some(200));

        let error = Envelope::from_value(&json!({
            "success": false,
            "error": {"code": "VALIDATION_FAILED", "fields": ["name"]}
        }))
        .expect("error envelope");
        match error {
            Envelope::Error(envelope) => {
                assert_eq!(envelope.status, None);
                assert_eq!(envelope.error.code, "VALIDATION_FAILED");
                assert_eq!(envelope.error.extra.get("fields"), Some(&json!(["name"])));
            }
            Envelope::Success(_) => panic!("expected error variant"),
        }
    }

    #[test]
    fn from_value_rejects_inconsistent_flags() {
        let err = Envelope::from_value(&json!({
            "success": true,
            "status": 200,
            "data": null,
            "error": {"code": "X"}
        }))
        .expect_err("success with error must fail");
        assert!(matches!(
            err,
            EnvelopeError::Inconsistent {
                success: true,
                field: ERROR_KEY
            }
        ));

        let err = Envelope::from_value(&json!({"success": false, "data": {}}))
            .expect_err("error with data must fail");
        assert!(matches!(err, EnvelopeError::Inconsistent { field: DATA_KEY, .. }));
    }

    #[test]
    fn from_value_reports_missing_and_invalid_fields() {
        assert!(matches!(
            Envelope::from_value(&json!([])),
            Err(EnvelopeError::NotAnObject)
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"status": 200})),
            Err(EnvelopeError::MissingField { field: SUCCESS_KEY })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": "yes"})),
            Err(EnvelopeError::InvalidField {
                field: SUCCESS_KEY,
                ..
            })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": true, "data": 1})),
            Err(EnvelopeError::MissingField { field: STATUS_KEY })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": true, "status": 200})),
            Err(EnvelopeError::MissingField { field: DATA_KEY })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": true, "status": 70000, "data": 1})),
            Err(EnvelopeError::InvalidField {
                field: STATUS_KEY,
                ..
            })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": false, "error": "boom"})),
            Err(EnvelopeError::InvalidField {
                field: ERROR_KEY,
                ..
            })
        ));
        assert!(matches!(
            Envelope::from_value(&json!({"success": false, "error": {"message": "x"}})),
            Err(EnvelopeError::MalformedError { .. })
        ));
    }
}
