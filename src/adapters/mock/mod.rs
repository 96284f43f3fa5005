//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network dependencies or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and chunked bodies
//! - [`RecordingSink`] - Render sink that records every call
//! - [`InMemorySessionStore`] - In-memory session id storage

pub mod http;
pub mod session_store;
pub mod sink;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use session_store::InMemorySessionStore;
pub use sink::{RecordingSink, SinkCall};
