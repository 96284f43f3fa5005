//! Session lifecycle states

use crate::error::StreamError;

/// Where the controller is in the single-flight lifecycle.
///
/// `Idle → Connecting → Streaming → {Completed | Errored | Cancelled} → Idle`
///
/// The three terminal phases last only while the observer's
/// `on_finished` runs; only `Idle` accepts a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Completed,
    Errored,
    Cancelled,
}

impl SessionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionPhase::Idle)
    }

    /// True while a request is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Connecting | SessionPhase::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Completed | SessionPhase::Errored | SessionPhase::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Connecting => "connecting",
            SessionPhase::Streaming => "streaming",
            SessionPhase::Completed => "completed",
            SessionPhase::Errored => "errored",
            SessionPhase::Cancelled => "cancelled",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// `done` event or the body ended cleanly
    Completed,
    /// `cancel()` was called
    Cancelled,
    /// Non-2xx status or transport failure
    Errored(StreamError),
}

impl Termination {
    /// The terminal phase matching this outcome.
    pub fn phase(&self) -> SessionPhase {
        match self {
            Termination::Completed => SessionPhase::Completed,
            Termination::Cancelled => SessionPhase::Cancelled,
            Termination::Errored(_) => SessionPhase::Errored,
        }
    }

    pub fn error(&self) -> Option<&StreamError> {
        match self {
            Termination::Errored(e) => Some(e),
            _ => None,
        }
    }
}
