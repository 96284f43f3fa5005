//! Errors from the auxiliary REST endpoints.

use thiserror::Error;

use crate::error::ErrorCategory;
use crate::traits::HttpError;

/// Errors from `/api/suggested` and `/api/session` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The response body was not what the endpoint promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// High-level category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::ServerError { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::ServerError { .. } | ApiError::InvalidResponse(_) => ErrorCategory::Client,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => ApiError::ServerError { status, message },
            other => ApiError::Transport(other.to_string()),
        }
    }
}
