//! Conversation view model
//!
//! Turns the event sequence of successive sessions into agent turns and
//! pushes their markup to a [`RenderSink`].

use std::sync::Arc;

use tracing::debug;

use crate::session::{StreamObserver, Termination};
use crate::sse::StreamEvent;
use crate::traits::RenderSink;
use crate::turn::ChatTurn;

/// All turns received so far, plus the one currently streaming.
///
/// A `Conversation` is the observer passed to
/// [`StreamController::start`](crate::session::StreamController::start);
/// take it back from the session outcome to keep it for the next message.
pub struct Conversation {
    sink: Arc<dyn RenderSink>,
    turns: Vec<ChatTurn>,
    open: Option<usize>,
    session_id: Option<String>,
    completed: bool,
}

impl Conversation {
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        Self {
            sink,
            turns: Vec::new(),
            open: None,
            session_id: None,
            completed: false,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The turn currently receiving text, if any.
    pub fn open_turn(&self) -> Option<&ChatTurn> {
        self.open.and_then(|i| self.turns.get(i))
    }

    /// Last session id the server assigned.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// True once the last session received `done`.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn open_turn_for(&mut self, agent_key: &str, agent_display_name: &str) {
        self.close_open_turn();

        let index = self.turns.len();
        self.turns.push(ChatTurn::new(agent_key, agent_display_name));
        self.open = Some(index);

        self.sink.turn_started(index, agent_key, agent_display_name);
        self.sink.active_agent_changed(Some(agent_key));
    }

    fn append_text(&mut self, content: &str) {
        let Some(index) = self.open else {
            debug!(len = content.len(), "protocol violation: text with no open turn, dropped");
            return;
        };
        let Some(turn) = self.turns.get_mut(index) else {
            return;
        };
        if turn.append(content) {
            self.sink.turn_updated(index, turn.markup());
        }
    }

    fn close_open_turn(&mut self) {
        let Some(index) = self.open.take() else {
            return;
        };
        if let Some(turn) = self.turns.get_mut(index) {
            turn.close();
            self.sink.turn_finished(index, turn.markup());
        }
    }
}

impl StreamObserver for Conversation {
    fn on_event(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::SessionId { session_id } => {
                self.completed = false;
                self.session_id = Some(session_id.clone());
            }
            StreamEvent::AgentStart {
                agent_display_name,
                agent_key,
            } => {
                self.completed = false;
                self.open_turn_for(agent_key, agent_display_name);
            }
            StreamEvent::TextDelta { content } => self.append_text(content),
            // Follow-ups belong to the stream, not to the open turn
            StreamEvent::FollowUp {
                agent_key,
                questions,
            } => self.sink.follow_ups(agent_key, questions),
            StreamEvent::Error { message } => {
                self.sink.show_error(&format!("Error: {}", message));
            }
            StreamEvent::Done => {
                self.close_open_turn();
                self.completed = true;
            }
        }
    }

    fn on_finished(&mut self, termination: &Termination) {
        self.close_open_turn();

        match termination {
            Termination::Completed => {}
            Termination::Cancelled => self.sink.show_error("Cancelled."),
            Termination::Errored(e) => self.sink.show_error(&e.user_message()),
        }

        self.sink.active_agent_changed(None);
    }
}
