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

//! Envelope assertion helpers for HTTP API integration tests.
//! Layout: assert.rs (primitives trait + envelope checks), json.rs (matching rules),
//! response.rs (captured responses), factory.rs (expected-response producers),
//! fixtures.rs (bodies/files/logging), mocks.rs (recording hosts), error.rs (`AssertionError`).

pub mod assert;
pub mod error;
pub mod factory;
pub mod fixtures;
pub mod json;
pub mod mocks;
pub mod response;

pub use assert::{EnvelopeAssertions, JsonAssertions};
pub use error::{AssertResult, AssertionError};
pub use factory::{EnvelopeResponder, ExpectedResponse, ResponseFactory};
pub use response::CapturedResponse;
