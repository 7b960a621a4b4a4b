//! Test fixtures and environment helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use responder_models::{ErrorEnvelope, SuccessEnvelope};
use responder_telemetry::{LoggingConfig, init_logging_once};
use serde_json::Value;

use crate::response::CapturedResponse;

/// Canonical success body for `data` and `status`.
#[must_use]
pub fn success_body(data: Value, status: StatusCode) -> Value {
    SuccessEnvelope::new(status.as_u16(), Some(data)).into_value()
}

/// Canonical error body for `code`, mirroring `status` into the body when given.
#[must_use]
pub fn error_body(code: &str, status: Option<StatusCode>) -> Value {
    ErrorEnvelope::new(code, status.map(|status| status.as_u16())).into_value()
}

/// Captured success response with a canonical body.
#[must_use]
pub fn success_response(data: Value, status: StatusCode) -> CapturedResponse {
    CapturedResponse::json(status, &success_body(data, status))
}

/// Captured error response with a canonical body.
///
/// `mirror_status` controls whether the body carries the `status` field.
#[must_use]
pub fn error_response(code: &str, status: StatusCode, mirror_status: bool) -> CapturedResponse {
    let body_status = mirror_status.then_some(status);
    CapturedResponse::json(status, &error_body(code, body_status))
}

/// Read and decode a JSON fixture file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not contain JSON.
pub fn load_json_fixture(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("fixture {} is not valid JSON", path.display()))
}

/// Route `tracing` output from assertions through libtest's captured writer.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// The format follows `RESPONDER_LOG_FORMAT` when set.
pub fn init_test_logging() {
    init_logging_once(&LoggingConfig::from_env());
}
