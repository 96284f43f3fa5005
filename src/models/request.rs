use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
///
/// `session_id` and `image_id` are always present on the wire, as `null` when
/// unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
    /// Session assigned by the server in an earlier `session_id` event
    pub session_id: Option<String>,
    /// Id of an image previously uploaded for this message
    pub image_id: Option<String>,
}

impl ChatRequest {
    /// Create a request for a fresh session with no attachment
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            image_id: None,
        }
    }

    /// Build a request from raw input.
    ///
    /// The message is trimmed; returns `None` if nothing is left to send.
    pub fn compose(
        raw_message: &str,
        session_id: Option<String>,
        image_id: Option<String>,
    ) -> Option<Self> {
        let message = raw_message.trim();
        if message.is_empty() {
            return None;
        }
        Some(
            Self::new(message)
                .with_session_id(session_id)
                .with_image_id(image_id),
        )
    }

    /// Set the session id (builder pattern)
    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Set the attached image id (builder pattern)
    pub fn with_image_id(mut self, image_id: Option<String>) -> Self {
        self.image_id = image_id;
        self
    }
}

/// Body of `GET /api/suggested`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedQuestions {
    #[serde(default)]
    pub questions: Vec<String>,
}
