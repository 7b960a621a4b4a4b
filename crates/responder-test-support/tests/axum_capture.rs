//! Drives real axum handlers and asserts on their envelopes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use responder_config::AssertConfig;
use responder_models::{ErrorEnvelope, SuccessEnvelope};
use responder_test_support::{AssertionError, CapturedResponse, EnvelopeAssertions, EnvelopeResponder};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct UserView {
    id: u64,
    name: &'static str,
    teams: Vec<&'static str>,
}

#[derive(Debug)]
enum ApiError {
    NotFound,
    Conflict(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorEnvelope::new("NOT_FOUND", Some(StatusCode::NOT_FOUND.as_u16())),
            ),
            Self::Conflict(detail) => (
                StatusCode::CONFLICT,
                ErrorEnvelope::new("CONFLICT", None).with_message(detail),
            ),
        };
        (status, Json(envelope)).into_response()
    }
}

async fn show_user(id: u64) -> Result<Response, ApiError> {
    if id != 1 {
        return Err(ApiError::NotFound);
    }
    let view = UserView {
        id,
        name: "ada",
        teams: vec!["core", "infra"],
    };
    let data = serde_json::to_value(view).map_err(|_| ApiError::Conflict("encode failed"))?;
    let envelope = SuccessEnvelope::new(StatusCode::OK.as_u16(), Some(data));
    Ok((StatusCode::OK, Json(envelope)).into_response())
}

async fn capture(result: Result<Response, ApiError>) -> CapturedResponse {
    let response = result.unwrap_or_else(IntoResponse::into_response);
    CapturedResponse::from_response(response)
        .await
        .expect("body should drain")
}

#[tokio::test]
async fn handler_success_passes_envelope_checks() -> anyhow::Result<()> {
    let mut response = capture(show_user(1).await).await;

    response
        .envelope()
        .assert_success(Some(json!({"id": 1, "name": "ada"})), StatusCode::OK)?
        .assert_success_data(&json!({"teams": ["core", "infra"]}))?;

    let data = response.envelope().success_data()?;
    assert_eq!(data, json!({"id": 1, "name": "ada", "teams": ["core", "infra"]}));
    Ok(())
}

#[tokio::test]
async fn handler_not_found_passes_error_checks() -> anyhow::Result<()> {
    let mut response = capture(show_user(7).await).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    response
        .envelope()
        .assert_error("NOT_FOUND", Some(StatusCode::NOT_FOUND))?;
    assert!(response.envelope().assert_envelope().is_ok());
    Ok(())
}

#[tokio::test]
async fn unmirrored_status_requires_flag_off() -> anyhow::Result<()> {
    let mut response = capture(Err(ApiError::Conflict("name taken"))).await;

    let strict = response
        .envelope()
        .assert_error("CONFLICT", Some(StatusCode::CONFLICT))
        .map(|_| ());
    assert!(matches!(strict, Err(AssertionError::FragmentMissing { .. })));

    EnvelopeAssertions::with_factory(
        &mut response,
        EnvelopeResponder,
        AssertConfig::default().with_status_in_error(false),
    )
    .assert_error("CONFLICT", Some(StatusCode::CONFLICT))?;
    Ok(())
}

#[tokio::test]
async fn plain_text_bodies_fail_json_checks() {
    let response = (StatusCode::OK, "not json").into_response();
    let mut captured = CapturedResponse::from_response(response)
        .await
        .expect("body should drain");

    let err = captured
        .envelope()
        .assert_success(None, StatusCode::OK)
        .map(|_| ())
        .expect_err("plain text is not an envelope");
    assert!(matches!(err, AssertionError::InvalidJson { .. }));
}
