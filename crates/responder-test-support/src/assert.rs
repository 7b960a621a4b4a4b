//! Envelope assertions composed from host-provided JSON primitives.
//!
//! A host is anything that holds the response under test and implements
//! [`JsonAssertions`]. [`EnvelopeAssertions`] borrows a host and layers the
//! success/error envelope checks on top of its primitives, propagating the
//! first primitive failure unchanged.

use axum::http::StatusCode;
use responder_config::AssertConfig;
use responder_models::{CODE_KEY, DATA_KEY, ERROR_KEY, Envelope, STATUS_KEY, SUCCESS_KEY};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{AssertResult, AssertionError};
use crate::factory::{EnvelopeResponder, ExpectedResponse, ResponseFactory};
use crate::json::{child_path, display_path, single_entry};

/// Primitive checks over the response held by a test host.
///
/// Each check returns the host again so calls can be chained with `?`.
pub trait JsonAssertions {
    /// Assert the response status code.
    ///
    /// # Errors
    ///
    /// Fails when the response carries a different status code.
    fn see_status_code(&mut self, status: StatusCode) -> AssertResult<&mut Self>;

    /// Assert every key/value pair of `fragment` appears somewhere in the body.
    ///
    /// # Errors
    ///
    /// Fails when a pair is absent or the body is not JSON.
    fn see_json(&mut self, fragment: &Value) -> AssertResult<&mut Self>;

    /// Assert the body carries the keys described by `structure`.
    ///
    /// # Errors
    ///
    /// Fails when a described key is absent or the body is not JSON.
    fn see_json_structure(&mut self, structure: &Value) -> AssertResult<&mut Self>;

    /// Assert the body is a superset of `subset`.
    ///
    /// # Errors
    ///
    /// Fails when any expected location is absent or differs.
    fn see_json_subset(&mut self, subset: &Value) -> AssertResult<&mut Self>;

    /// Assert the body equals `expected` exactly.
    ///
    /// # Errors
    ///
    /// Fails when the documents differ in any key or value.
    fn see_json_equals(&mut self, expected: &Value) -> AssertResult<&mut Self>;

    /// Decode and return the response body.
    ///
    /// # Errors
    ///
    /// Fails when the body is not valid JSON.
    fn decode_response_json(&self) -> AssertResult<Value>;
}

/// Success/error envelope checks over a borrowed host.
pub struct EnvelopeAssertions<'h, H: ?Sized, F = EnvelopeResponder> {
    host: &'h mut H,
    factory: F,
    config: AssertConfig,
}

impl<'h, H> EnvelopeAssertions<'h, H>
where
    H: JsonAssertions + ?Sized,
{
    /// Wrap a host using the plain envelope producer and default settings.
    pub fn new(host: &'h mut H) -> Self {
        Self::with_factory(host, EnvelopeResponder, AssertConfig::default())
    }
}

impl<'h, H, F> EnvelopeAssertions<'h, H, F>
where
    H: JsonAssertions + ?Sized,
    F: ResponseFactory,
{
    /// Wrap a host with an explicit producer and settings.
    pub const fn with_factory(host: &'h mut H, factory: F, config: AssertConfig) -> Self {
        Self {
            host,
            factory,
            config,
        }
    }

    /// Replace the settings used by subsequent checks.
    #[must_use]
    pub fn with_config(mut self, config: AssertConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Borrow the host for primitive checks between envelope checks.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Release the host borrow.
    pub fn into_host(self) -> &'h mut H {
        self.host
    }

    /// Assert a success envelope and check each leaf of the expected data.
    ///
    /// `None` skips the data check; `Some(Value::Null)` requires `data` to be
    /// `null`.
    ///
    /// # Errors
    ///
    /// Fails on a status, `success` flag, `status` field, or data leaf
    /// mismatch.
    pub fn assert_success(
        &mut self,
        data: Option<Value>,
        status: StatusCode,
    ) -> AssertResult<&mut Self> {
        let check_data = data.is_some();
        let expected = self.assert_success_response(data, status)?;
        if check_data {
            let expected_data = expected.data().cloned().unwrap_or(Value::Null);
            self.assert_success_data(&expected_data)?;
        }
        Ok(self)
    }

    /// Assert the body equals the full expected success envelope.
    ///
    /// # Errors
    ///
    /// Fails on a status mismatch or any difference from the expected body,
    /// including extra or missing keys.
    pub fn assert_success_equals(
        &mut self,
        data: Option<Value>,
        status: StatusCode,
    ) -> AssertResult<&mut Self> {
        let expected = self.assert_success_response(data, status)?;
        self.host.see_json_equals(&expected.body)?;
        Ok(self)
    }

    /// Assert the status code and success markers, returning the expected
    /// response for further inspection.
    ///
    /// # Errors
    ///
    /// Fails when the status code, `success` flag, or `status` field differ,
    /// or the body has no `data` key.
    pub fn assert_success_response(
        &mut self,
        data: Option<Value>,
        status: StatusCode,
    ) -> AssertResult<ExpectedResponse> {
        let expected = self.factory.success(data, status);
        debug!(status = expected.status.as_u16(), "asserting success envelope");

        let mut markers = Map::new();
        markers.insert(SUCCESS_KEY.to_string(), Value::Bool(true));
        markers.insert(
            STATUS_KEY.to_string(),
            Value::from(expected.status.as_u16()),
        );

        self.host
            .see_status_code(expected.status)?
            .see_json(&Value::Object(markers))?
            .see_json_structure(&Value::Array(vec![Value::from(DATA_KEY)]))?;
        Ok(expected)
    }

    /// Assert every leaf of `data` appears in the body.
    ///
    /// Objects are walked recursively, and so are arrays holding objects:
    /// each object element is walked like a nested object and each scalar
    /// element must appear somewhere in the body. Arrays of scalars and other
    /// values are leaves checked as a `{key: value}` fragment. A non-object
    /// `data` is checked as a subset `{"data": data}` instead.
    ///
    /// # Errors
    ///
    /// Fails on the first leaf not found, or with
    /// [`AssertionError::DepthExceeded`] when `data` nests deeper than
    /// [`AssertConfig::max_depth`]. Objects and walked arrays each count as
    /// one level.
    pub fn assert_success_data(&mut self, data: &Value) -> AssertResult<&mut Self> {
        match data {
            Value::Object(leaves) => self.assert_data_leaves(leaves, "", 1)?,
            other => {
                self.host
                    .see_json_subset(&single_entry(DATA_KEY, other.clone()))?;
            }
        }
        Ok(self)
    }

    fn assert_data_leaves(
        &mut self,
        data: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> AssertResult<()> {
        self.check_depth(path, depth)?;
        for (key, value) in data {
            let location = child_path(path, key);
            match value {
                Value::Object(nested) => self.assert_data_leaves(nested, &location, depth + 1)?,
                Value::Array(items) if holds_objects(items) => {
                    self.assert_data_items(items, &location, depth + 1)?;
                }
                leaf => {
                    trace!(path = %location, "checking data leaf");
                    self.host.see_json(&single_entry(key, leaf.clone()))?;
                }
            }
        }
        Ok(())
    }

    fn assert_data_items(&mut self, items: &[Value], path: &str, depth: usize) -> AssertResult<()> {
        self.check_depth(path, depth)?;
        for (index, item) in items.iter().enumerate() {
            let location = child_path(path, &index.to_string());
            match item {
                Value::Object(nested) => self.assert_data_leaves(nested, &location, depth + 1)?,
                Value::Array(inner) if holds_objects(inner) => {
                    self.assert_data_items(inner, &location, depth + 1)?;
                }
                element => {
                    trace!(path = %location, "checking data element");
                    self.host.see_json(element)?;
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, path: &str, depth: usize) -> AssertResult<()> {
        if depth > self.config.max_depth {
            return Err(AssertionError::DepthExceeded {
                limit: self.config.max_depth,
                path: display_path(path),
            });
        }
        Ok(())
    }

    /// Decode the body and return its `data` member.
    ///
    /// # Errors
    ///
    /// Fails when the body is not JSON or has no `data` key.
    pub fn success_data(&self) -> AssertResult<Value> {
        let mut body = self.host.decode_response_json()?;
        body.get_mut(DATA_KEY)
            .map(Value::take)
            .ok_or(AssertionError::MissingKey { key: DATA_KEY })
    }

    /// Assert an error envelope carrying `code`.
    ///
    /// When `status` is given the response status code must match, and with
    /// [`AssertConfig::include_status_in_error`] set the body's `status` field
    /// must match too.
    ///
    /// # Errors
    ///
    /// Fails on a status mismatch, a `success` flag other than `false`, or an
    /// `error.code` other than `code`.
    pub fn assert_error(
        &mut self,
        code: &str,
        status: Option<StatusCode>,
    ) -> AssertResult<&mut Self> {
        debug!(code, ?status, "asserting error envelope");
        if let Some(status) = status {
            self.host.see_status_code(status)?;
            if self.config.include_status_in_error {
                self.host
                    .see_json(&single_entry(STATUS_KEY, Value::from(status.as_u16())))?;
            }
        }

        let expected_error = single_entry(CODE_KEY, Value::String(code.to_string()));
        self.host
            .see_json(&single_entry(SUCCESS_KEY, Value::Bool(false)))?
            .see_json_subset(&single_entry(ERROR_KEY, expected_error))?;
        Ok(self)
    }

    /// Decode the body and validate it against the envelope contract.
    ///
    /// # Errors
    ///
    /// Fails when the body is not JSON or violates the envelope rules.
    pub fn assert_envelope(&self) -> AssertResult<Envelope> {
        let body = self.host.decode_response_json()?;
        Envelope::from_value(&body).map_err(|source| AssertionError::InvalidEnvelope { source })
    }
}

fn holds_objects(items: &[Value]) -> bool {
    items.iter().any(|item| match item {
        Value::Object(_) => true,
        Value::Array(inner) => holds_objects(inner),
        _ => false,
    })
}
