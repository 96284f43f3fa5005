//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, DELETE, streaming)
//! - [`RenderSink`] - Destination for rendered conversation output
//! - [`SessionStore`] - Session id persistence

pub mod http;
pub mod render;
pub mod session_store;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use render::RenderSink;
pub use session_store::{SessionStore, SessionStoreError};
