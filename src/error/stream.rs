//! Session-fatal streaming errors.
//!
//! Everything here ends the current session (or refuses to start one).
//! Recoverable problems inside a stream, such as an unparsable line, never
//! become a `StreamError`.

use thiserror::Error;

use crate::error::{ApiError, ErrorCategory};
use crate::traits::{HttpError, SessionStoreError};

/// Errors that end or prevent a streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The request could not be sent or the response body broke mid-read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// A session is already active on this controller.
    #[error("A session is already streaming")]
    AlreadyStreaming,

    /// The session id could not be persisted or cleared.
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl StreamError {
    /// High-level category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Transport(_) => ErrorCategory::Network,
            StreamError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
            StreamError::HttpStatus { .. } => ErrorCategory::Client,
            StreamError::AlreadyStreaming => ErrorCategory::Client,
            StreamError::Store(_) => ErrorCategory::System,
        }
    }

    /// Check if a fresh `start` with the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// The single line shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport(reason) => format!("Connection error: {}", reason),
            StreamError::HttpStatus { status, .. } => format!("Connection error: HTTP {}", status),
            StreamError::AlreadyStreaming => {
                "Still answering the previous message. Please wait.".to_string()
            }
            StreamError::Store(e) => format!("Session error: {}", e),
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => {
                StreamError::HttpStatus { status, message }
            }
            other => StreamError::Transport(other.to_string()),
        }
    }
}

impl From<ApiError> for StreamError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ServerError { status, message } => {
                StreamError::HttpStatus { status, message }
            }
            other => StreamError::Transport(other.to_string()),
        }
    }
}
