//! biochat - streaming client for a multi-agent chat backend
//!
//! This library exposes modules for use in integration tests and the CLI.

pub mod adapters;
pub mod api;
pub mod attachment;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod mention;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
pub mod turn;

pub use api::ChatApi;
pub use config::{ClientConfig, ConfigError};
pub use conversation::Conversation;
pub use error::{ApiError, StreamError};
pub use session::{SessionPhase, StreamController, StreamObserver, Termination};
pub use sse::{FrameDecoder, StreamEvent};
