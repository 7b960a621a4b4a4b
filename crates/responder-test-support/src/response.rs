//! Captured HTTP responses acting as assertion hosts.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::Response;
use once_cell::unsync::OnceCell;
use serde_json::Value;

use crate::assert::{EnvelopeAssertions, JsonAssertions};
use crate::error::{AssertResult, AssertionError};
use crate::json::{check_equals, check_fragment, check_structure, check_subset};

/// Status code and body of a response produced by the system under test.
///
/// The body is decoded lazily on the first JSON check and reused afterwards.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    status: StatusCode,
    body: Bytes,
    decoded: OnceCell<Value>,
}

impl CapturedResponse {
    /// Capture a status code and raw body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            decoded: OnceCell::new(),
        }
    }

    /// Capture a status code and an already decoded JSON body.
    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status,
            body: Bytes::from(body.to_string()),
            decoded: OnceCell::with_value(body.clone()),
        }
    }

    /// Drain an axum response into a capture.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::BodyRead`] when the body stream fails.
    pub async fn from_response(response: Response) -> AssertResult<Self> {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|source| AssertionError::BodyRead { source })?;
        Ok(Self::new(status, body))
    }

    /// Status code of the captured response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw body bytes of the captured response.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Envelope assertions over this response with default settings.
    pub fn envelope(&mut self) -> EnvelopeAssertions<'_, Self> {
        EnvelopeAssertions::new(self)
    }

    fn decoded(&self) -> AssertResult<&Value> {
        self.decoded.get_or_try_init(|| {
            serde_json::from_slice(&self.body).map_err(|source| AssertionError::InvalidJson { source })
        })
    }
}

impl JsonAssertions for CapturedResponse {
    fn see_status_code(&mut self, status: StatusCode) -> AssertResult<&mut Self> {
        if self.status != status {
            return Err(AssertionError::StatusMismatch {
                expected: status.as_u16(),
                actual: self.status.as_u16(),
            });
        }
        Ok(self)
    }

    fn see_json(&mut self, fragment: &Value) -> AssertResult<&mut Self> {
        check_fragment(self.decoded()?, fragment)?;
        Ok(self)
    }

    fn see_json_structure(&mut self, structure: &Value) -> AssertResult<&mut Self> {
        check_structure(self.decoded()?, structure)?;
        Ok(self)
    }

    fn see_json_subset(&mut self, subset: &Value) -> AssertResult<&mut Self> {
        check_subset(self.decoded()?, subset)?;
        Ok(self)
    }

    fn see_json_equals(&mut self, expected: &Value) -> AssertResult<&mut Self> {
        check_equals(self.decoded()?, expected)?;
        Ok(self)
    }

    fn decode_response_json(&self) -> AssertResult<Value> {
        self.decoded().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_code_check_reports_both_codes() {
        let mut response = CapturedResponse::json(StatusCode::CREATED, &json!({}));
        assert!(response.see_status_code(StatusCode::CREATED).is_ok());
        match response.see_status_code(StatusCode::OK) {
            Err(AssertionError::StatusMismatch { expected, actual }) => {
                assert_eq!(expected, 200);
                assert_eq!(actual, 201);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn raw_bodies_are_decoded_on_demand() {
        let mut response =
            CapturedResponse::new(StatusCode::OK, r#"{"success":true,"data":{"id":4}}"#);
        assert_eq!(response.body().len(), 32);
        response
            .see_json(&json!({"id": 4}))
            .and_then(|host| host.see_json_structure(&json!({"data": ["id"]})))
            .expect("checks should pass");
        assert_eq!(
            response.decode_response_json().expect("decoded"),
            json!({"success": true, "data": {"id": 4}})
        );
    }

    #[test]
    fn invalid_json_fails_every_body_check() {
        let mut response = CapturedResponse::new(StatusCode::OK, "<html>oops</html>");
        assert!(response.see_status_code(StatusCode::OK).is_ok());
        assert!(matches!(
            response.see_json(&json!({"success": true})),
            Err(AssertionError::InvalidJson { .. })
        ));
        assert!(matches!(
            response.decode_response_json(),
            Err(AssertionError::InvalidJson { .. })
        ));
    }

    #[test]
    fn json_constructor_round_trips_body() {
        let body = json!({"success": false, "error": {"code": "GONE"}});
        let response = CapturedResponse::json(StatusCode::GONE, &body);
        assert_eq!(response.status(), StatusCode::GONE);
        let reparsed: Value = serde_json::from_slice(response.body()).expect("valid json");
        assert_eq!(reparsed, body);
    }
}
