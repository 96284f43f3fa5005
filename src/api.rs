//! Chat backend API client.
//!
//! Thin typed wrapper over [`HttpClient`] for the three endpoints the client
//! uses: the streaming `/api/chat`, `/api/suggested` and `/api/session`.

use crate::error::{ApiError, StreamError};
use crate::models::{ChatRequest, SuggestedQuestions};
use crate::traits::{ByteStream, Headers, HttpClient, Response};

/// Cookie the backend reads the session id from.
pub const SESSION_COOKIE: &str = "bio_session";

/// Client for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatApi<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> ChatApi<C> {
    /// Create a client for the backend at `base_url` (trailing `/` ignored).
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open the event stream for one chat message.
    ///
    /// A non-2xx answer becomes [`StreamError::HttpStatus`]; failing to
    /// connect becomes [`StreamError::Transport`].
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError> {
        let body = serde_json::to_string(request)
            .map_err(|e| StreamError::Transport(format!("Failed to encode request: {}", e)))?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        let url = self.url("/api/chat");
        tracing::debug!(url = %url, has_session = request.session_id.is_some(), "opening chat stream");

        Ok(self.client.post_stream(&url, &body, &headers).await?)
    }

    /// Starter questions for an agent.
    pub async fn fetch_suggested(&self, agent: &str) -> Result<Vec<String>, ApiError> {
        let url = self.url(&format!(
            "/api/suggested?agent={}",
            urlencoding::encode(agent)
        ));
        let response = self.client.get(&url, &Headers::new()).await?;
        let response = ensure_success(response)?;

        let suggested: SuggestedQuestions = response
            .json()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(suggested.questions)
    }

    /// Forget the server-side conversation history for `session_id`.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), ApiError> {
        let mut headers = Headers::new();
        headers.insert(
            "Cookie".to_string(),
            format!("{}={}", SESSION_COOKIE, session_id),
        );

        let response = self.client.delete(&self.url("/api/session"), &headers).await?;
        ensure_success(response)?;
        Ok(())
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::ServerError {
            status: response.status,
            message: response.text().unwrap_or_default(),
        })
    }
}
