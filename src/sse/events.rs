//! Stream event types and definitions
//!
//! Contains the StreamEvent enum with every event variant the chat backend
//! emits on its `/api/chat` response stream.

use thiserror::Error;

/// Typed events from the chat response stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Assign or replace the client session identifier
    SessionId { session_id: String },
    /// Open a new turn for the named agent
    AgentStart {
        agent_display_name: String,
        agent_key: String,
    },
    /// Text chunk appended to the current turn
    TextDelta { content: String },
    /// Follow-up prompts offered by an agent (not part of any turn)
    FollowUp {
        agent_key: String,
        questions: Vec<String>,
    },
    /// Mid-stream error reported by the backend; the stream continues
    Error { message: String },
    /// Stream completed successfully
    Done,
}

impl StreamEvent {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::SessionId { .. } => "session_id",
            StreamEvent::AgentStart { .. } => "agent",
            StreamEvent::TextDelta { .. } => "text",
            StreamEvent::FollowUp { .. } => "follow_up",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Done => "done",
        }
    }

    /// True for the event after which nothing else in the stream is delivered.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }
}

/// Reasons a stream line was rejected by the parser.
///
/// These never abort a session: the line is dropped and the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SseParseError {
    /// Line does not start with the `data: ` prefix
    #[error("Line is not a data line")]
    MissingPrefix,
    /// Invalid JSON in data payload
    #[error("Invalid JSON for event '{event_type}': {reason}")]
    InvalidJson { event_type: String, reason: String },
    /// Payload has no string `type` discriminator
    #[error("Missing event type in payload")]
    MissingEventType,
    /// Unknown event type received
    #[error("Unknown stream event type: {0}")]
    UnknownEventType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_name() {
        assert_eq!(
            StreamEvent::TextDelta {
                content: "".to_string(),
            }
            .event_type_name(),
            "text"
        );
        assert_eq!(StreamEvent::Done.event_type_name(), "done");
        assert_eq!(
            StreamEvent::AgentStart {
                agent_display_name: "CFO".to_string(),
                agent_key: "cfo".to_string(),
            }
            .event_type_name(),
            "agent"
        );
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(!StreamEvent::Error {
            message: "boom".to_string()
        }
        .is_terminal());
    }

    #[test]
    fn test_sse_parse_error_display() {
        let err = SseParseError::UnknownEventType("foo".to_string());
        assert_eq!(format!("{}", err), "Unknown stream event type: foo");

        let err = SseParseError::InvalidJson {
            event_type: "text".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(format!("{}", err).contains("Invalid JSON"));
    }
}
