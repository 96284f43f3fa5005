//! Stream line parsing
//!
//! One line in, at most one typed event out. Every failure is local: the
//! caller drops the line and keeps reading.

use serde::de::DeserializeOwned;

use crate::sse::events::{SseParseError, StreamEvent};
use crate::sse::payloads::{
    AgentPayload, ErrorPayload, FollowUpPayload, SessionIdPayload, TextPayload,
};

/// Literal prefix every event line carries.
pub const DATA_PREFIX: &str = "data: ";

/// Parse a single stream line into a typed event.
///
/// Returns `None` for anything that is not a well-formed, known event:
/// non-`data: ` lines, malformed JSON, missing fields and unknown `type`
/// values are all ignored so that newer servers never break older clients.
pub fn parse_event_line(line: &str) -> Option<StreamEvent> {
    match try_parse_event_line(line) {
        Ok(event) => Some(event),
        Err(SseParseError::MissingPrefix) => {
            if !line.is_empty() {
                tracing::trace!(line, "ignoring non-data line");
            }
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "dropping unparsable stream line");
            None
        }
    }
}

/// Parse a single stream line, reporting why it was rejected.
pub fn try_parse_event_line(line: &str) -> Result<StreamEvent, SseParseError> {
    let data = line
        .strip_prefix(DATA_PREFIX)
        .ok_or(SseParseError::MissingPrefix)?;
    parse_event_data(data)
}

/// Parse the JSON payload of a data line into a typed event.
pub fn parse_event_data(data: &str) -> Result<StreamEvent, SseParseError> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
            event_type: "unknown".to_string(),
            reason: e.to_string(),
        })?;

    let event_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(SseParseError::MissingEventType)?
        .to_string();

    match event_type.as_str() {
        "session_id" => {
            let payload: SessionIdPayload = decode(&event_type, value)?;
            Ok(StreamEvent::SessionId {
                session_id: payload.session_id,
            })
        }
        "agent" => {
            let payload: AgentPayload = decode(&event_type, value)?;
            Ok(StreamEvent::AgentStart {
                agent_display_name: payload.agent,
                agent_key: payload.agent_key,
            })
        }
        "text" => {
            let payload: TextPayload = decode(&event_type, value)?;
            Ok(StreamEvent::TextDelta {
                content: payload.content,
            })
        }
        "follow_up" => {
            let payload: FollowUpPayload = decode(&event_type, value)?;
            Ok(StreamEvent::FollowUp {
                agent_key: payload.agent_key,
                questions: payload.questions,
            })
        }
        "error" => {
            let payload: ErrorPayload = decode(&event_type, value)?;
            Ok(StreamEvent::Error {
                message: payload.content.unwrap_or_default(),
            })
        }
        "done" => Ok(StreamEvent::Done),
        _ => Err(SseParseError::UnknownEventType(event_type)),
    }
}

fn decode<T: DeserializeOwned>(
    event_type: &str,
    value: serde_json::Value,
) -> Result<T, SseParseError> {
    serde_json::from_value(value).map_err(|e| SseParseError::InvalidJson {
        event_type: event_type.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_id() {
        let event = parse_event_line(r#"data: {"type":"session_id","session_id":"abc-123"}"#);
        assert_eq!(
            event,
            Some(StreamEvent::SessionId {
                session_id: "abc-123".to_string()
            })
        );
    }

    #[test]
    fn test_parse_agent_start() {
        let event = parse_event_line(r#"data: {"type":"agent","agent":"CFO","agent_key":"cfo"}"#);
        assert_eq!(
            event,
            Some(StreamEvent::AgentStart {
                agent_display_name: "CFO".to_string(),
                agent_key: "cfo".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_text_delta_keeps_whitespace() {
        let event = parse_event_line(r#"data: {"type":"text","content":"  hi\n"}"#);
        assert_eq!(
            event,
            Some(StreamEvent::TextDelta {
                content: "  hi\n".to_string()
            })
        );
    }

    #[test]
    fn test_parse_follow_up() {
        let event = parse_event_line(
            r#"data: {"type":"follow_up","agent_key":"farmer","questions":["Why?","How?"]}"#,
        );
        assert_eq!(
            event,
            Some(StreamEvent::FollowUp {
                agent_key: "farmer".to_string(),
                questions: vec!["Why?".to_string(), "How?".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_follow_up_without_questions() {
        let event = parse_event_line(r#"data: {"type":"follow_up","agent_key":"cfo"}"#);
        assert_eq!(
            event,
            Some(StreamEvent::FollowUp {
                agent_key: "cfo".to_string(),
                questions: Vec::new(),
            })
        );
    }

    #[test]
    fn test_parse_error_event_uses_content_field() {
        let event = parse_event_line(r#"data: {"type":"error","content":"rate limited"}"#);
        assert_eq!(
            event,
            Some(StreamEvent::Error {
                message: "rate limited".to_string()
            })
        );
    }

    #[test]
    fn test_parse_done() {
        assert_eq!(
            parse_event_line(r#"data: {"type":"done"}"#),
            Some(StreamEvent::Done)
        );
    }

    #[test]
    fn test_line_without_prefix_is_ignored() {
        assert_eq!(parse_event_line("foo bar"), None);
        assert_eq!(parse_event_line(""), None);
        assert_eq!(
            try_parse_event_line("event: text"),
            Err(SseParseError::MissingPrefix)
        );
    }

    #[test]
    fn test_prefix_must_be_exact() {
        // No space after the colon
        assert_eq!(parse_event_line(r#"data:{"type":"done"}"#), None);
        // Leading whitespace
        assert_eq!(parse_event_line(r#" data: {"type":"done"}"#), None);
    }

    #[test]
    fn test_invalid_json_is_ignored() {
        assert_eq!(parse_event_line("data: not-json"), None);
        assert!(matches!(
            try_parse_event_line("data: not-json"),
            Err(SseParseError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        assert_eq!(parse_event_line(r#"data: {"type":"heartbeat"}"#), None);
        assert_eq!(
            try_parse_event_line(r#"data: {"type":"heartbeat"}"#),
            Err(SseParseError::UnknownEventType("heartbeat".to_string()))
        );
    }

    #[test]
    fn test_missing_type_is_ignored() {
        assert_eq!(
            try_parse_event_line(r#"data: {"content":"hi"}"#),
            Err(SseParseError::MissingEventType)
        );
        assert_eq!(
            try_parse_event_line(r#"data: {"type":7}"#),
            Err(SseParseError::MissingEventType)
        );
    }

    #[test]
    fn test_missing_required_field_is_ignored() {
        let result = try_parse_event_line(r#"data: {"type":"agent","agent":"CFO"}"#);
        match result {
            Err(SseParseError::InvalidJson { event_type, .. }) => assert_eq!(event_type, "agent"),
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let event =
            parse_event_line(r#"data: {"type":"text","content":"x","seq":4,"ts":1736956800000}"#);
        assert_eq!(
            event,
            Some(StreamEvent::TextDelta {
                content: "x".to_string()
            })
        );
    }
}
