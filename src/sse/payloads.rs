//! Stream payload deserialization structs
//!
//! Contains internal structs used to deserialize the JSON object that follows
//! the `data: ` prefix of each stream line.

use serde::Deserialize;

/// session_id payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionIdPayload {
    pub session_id: String,
}

/// agent payload - opens a new turn
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentPayload {
    /// Display name, e.g. "CFO"
    pub agent: String,
    /// Routing key, e.g. "cfo"
    pub agent_key: String,
}

/// text payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextPayload {
    pub content: String,
}

/// follow_up payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FollowUpPayload {
    pub agent_key: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// error payload
///
/// The backend puts the message under `content`; `message` is accepted too.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default, alias = "message")]
    pub content: Option<String>,
}
