//! Chat response stream decoding
//!
//! The backend answers `POST /api/chat` with a body of newline-terminated
//! lines, each event carried on one line:
//! - `data: <json>` - event payload with a `type` discriminator
//! - anything else - ignored (blank separators, comments, keep-alives)
//!
//! # Module structure
//! - `decoder` - bytes to complete lines (FrameDecoder)
//! - `events` - event type definitions (StreamEvent, SseParseError)
//! - `payloads` - internal payload deserialization structs
//! - `parser` - line to event parsing (parse_event_line)
//! - `stream` - response body to event stream adapter

mod decoder;
mod events;
mod parser;
mod payloads;
mod stream;

// Re-export public types
pub use decoder::FrameDecoder;
pub use events::{SseParseError, StreamEvent};
pub use parser::{parse_event_data, parse_event_line, try_parse_event_line, DATA_PREFIX};
pub use stream::event_stream;
