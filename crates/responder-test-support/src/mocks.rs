//! Host wrappers that record which primitives an assertion invoked.

use std::cell::RefCell;

use axum::http::StatusCode;
use serde_json::Value;

use crate::assert::JsonAssertions;
use crate::error::AssertResult;

/// One primitive invocation observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveCall {
    /// `see_status_code` with the expected code.
    StatusCode(StatusCode),
    /// `see_json` with the fragment.
    Json(Value),
    /// `see_json_structure` with the structure.
    JsonStructure(Value),
    /// `see_json_subset` with the subset.
    JsonSubset(Value),
    /// `see_json_equals` with the expected document.
    JsonEquals(Value),
    /// `decode_response_json`.
    Decode,
}

/// Delegates to an inner host while recording every primitive call.
///
/// Calls are recorded before delegation, so a failing primitive is the last
/// entry in [`RecordingHost::calls`].
#[derive(Debug)]
pub struct RecordingHost<H> {
    inner: H,
    calls: RefCell<Vec<PrimitiveCall>>,
}

impl<H> RecordingHost<H> {
    /// Wrap a host.
    pub const fn new(inner: H) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Snapshot of the calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<PrimitiveCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Borrow the wrapped host.
    pub const fn inner(&self) -> &H {
        &self.inner
    }

    /// Unwrap the host.
    pub fn into_inner(self) -> H {
        self.inner
    }

    fn record(&self, call: PrimitiveCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl<H: JsonAssertions> JsonAssertions for RecordingHost<H> {
    fn see_status_code(&mut self, status: StatusCode) -> AssertResult<&mut Self> {
        self.record(PrimitiveCall::StatusCode(status));
        self.inner.see_status_code(status)?;
        Ok(self)
    }

    fn see_json(&mut self, fragment: &Value) -> AssertResult<&mut Self> {
        self.record(PrimitiveCall::Json(fragment.clone()));
        self.inner.see_json(fragment)?;
        Ok(self)
    }

    fn see_json_structure(&mut self, structure: &Value) -> AssertResult<&mut Self> {
        self.record(PrimitiveCall::JsonStructure(structure.clone()));
        self.inner.see_json_structure(structure)?;
        Ok(self)
    }

    fn see_json_subset(&mut self, subset: &Value) -> AssertResult<&mut Self> {
        self.record(PrimitiveCall::JsonSubset(subset.clone()));
        self.inner.see_json_subset(subset)?;
        Ok(self)
    }

    fn see_json_equals(&mut self, expected: &Value) -> AssertResult<&mut Self> {
        self.record(PrimitiveCall::JsonEquals(expected.clone()));
        self.inner.see_json_equals(expected)?;
        Ok(self)
    }

    fn decode_response_json(&self) -> AssertResult<Value> {
        self.record(PrimitiveCall::Decode);
        self.inner.decode_response_json()
    }
}
