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

//! Configuration for the Responder envelope assertions.
//!
//! Layout: `model.rs` (typed settings), `validate.rs` (parsing helpers),
//! `loader.rs` (environment and JSON loaders), `error.rs` (`ConfigError`).

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_MAX_DEPTH, ENV_STATUS_CODE};
pub use model::{AssertConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
