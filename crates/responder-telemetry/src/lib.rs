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

//! Logging setup shared by Responder test suites.

pub mod init;

pub use init::{
    DEFAULT_LOG_LEVEL, ENV_LOG_FORMAT, LogFormat, LoggingConfig, init_logging, init_logging_once,
};
