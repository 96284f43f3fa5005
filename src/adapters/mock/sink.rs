//! Recording render sink for testing.
//!
//! Stores every sink call in order so tests can assert on exactly what a
//! user would have seen.

use std::sync::{Arc, Mutex};

use crate::traits::RenderSink;

/// One recorded call on the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    TurnStarted {
        turn: usize,
        agent_key: String,
        agent_display_name: String,
    },
    TurnUpdated {
        turn: usize,
        markup: String,
    },
    TurnFinished {
        turn: usize,
        markup: String,
    },
    FollowUps {
        agent_key: String,
        questions: Vec<String>,
    },
    Error(String),
    ActiveAgent(Option<String>),
}

/// Render sink that records calls instead of displaying them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Messages passed to `show_error`, in order.
    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Final markup of every finished turn, in order.
    pub fn finished_turns(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::TurnFinished { markup, .. } => Some(markup),
                _ => None,
            })
            .collect()
    }

    /// Most recent markup shown for `turn`, open or finished.
    pub fn latest_markup(&self, turn: usize) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            SinkCall::TurnUpdated { turn: t, markup } | SinkCall::TurnFinished { turn: t, markup }
                if t == turn =>
            {
                Some(markup)
            }
            _ => None,
        })
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn push(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RenderSink for RecordingSink {
    fn turn_started(&self, turn: usize, agent_key: &str, agent_display_name: &str) {
        self.push(SinkCall::TurnStarted {
            turn,
            agent_key: agent_key.to_string(),
            agent_display_name: agent_display_name.to_string(),
        });
    }

    fn turn_updated(&self, turn: usize, markup: &str) {
        self.push(SinkCall::TurnUpdated {
            turn,
            markup: markup.to_string(),
        });
    }

    fn turn_finished(&self, turn: usize, markup: &str) {
        self.push(SinkCall::TurnFinished {
            turn,
            markup: markup.to_string(),
        });
    }

    fn follow_ups(&self, agent_key: &str, questions: &[String]) {
        self.push(SinkCall::FollowUps {
            agent_key: agent_key.to_string(),
            questions: questions.to_vec(),
        });
    }

    fn show_error(&self, message: &str) {
        self.push(SinkCall::Error(message.to_string()));
    }

    fn active_agent_changed(&self, agent_key: Option<&str>) {
        self.push(SinkCall::ActiveAgent(agent_key.map(str::to_string)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let sink = RecordingSink::new();
        sink.turn_started(0, "cfo", "CFO");
        sink.turn_updated(0, "a");
        sink.turn_finished(0, "ab");
        sink.show_error("Error: x");

        assert_eq!(sink.calls().len(), 4);
        assert_eq!(sink.finished_turns(), vec!["ab"]);
        assert_eq!(sink.errors(), vec!["Error: x"]);
        assert_eq!(sink.latest_markup(0), Some("ab".to_string()));
        assert_eq!(sink.latest_markup(1), None);
    }

    #[test]
    fn test_clear() {
        let sink = RecordingSink::new();
        sink.active_agent_changed(Some("farmer"));
        sink.clear();
        assert!(sink.calls().is_empty());
    }
}
