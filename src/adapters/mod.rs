//! Concrete implementations of trait abstractions.
//!
//! This module provides production-ready adapters that implement the traits
//! defined in `crate::traits`.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileSessionStore`] - File-based session id storage
//! - [`StdoutSink`] - Plain-text output for the command line
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::RecordingSink`] - Records rendered output
//! - [`mock::InMemorySessionStore`] - In-memory session id storage

pub mod file_session_store;
pub mod mock;
pub mod reqwest_http;
pub mod stdout_sink;

pub use file_session_store::FileSessionStore;
pub use mock::{InMemorySessionStore, MockHttpClient, RecordingSink};
pub use reqwest_http::ReqwestHttpClient;
pub use stdout_sink::StdoutSink;
