//! Common test utilities for integration tests.
//!
//! Line builders for the chat event stream and an observer that records
//! what a session delivered.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use biochat::session::{StreamObserver, Termination};
use biochat::sse::StreamEvent;
use serde_json::json;

pub fn data_line(payload: serde_json::Value) -> String {
    format!("data: {}\n", payload)
}

pub fn session_line(session_id: &str) -> String {
    data_line(json!({"type": "session_id", "session_id": session_id}))
}

pub fn agent_line(agent_key: &str, display_name: &str) -> String {
    data_line(json!({"type": "agent", "agent": display_name, "agent_key": agent_key}))
}

pub fn text_line(content: &str) -> String {
    data_line(json!({"type": "text", "content": content}))
}

pub fn follow_up_line(agent_key: &str, questions: &[&str]) -> String {
    data_line(json!({"type": "follow_up", "agent_key": agent_key, "questions": questions}))
}

pub fn error_line(content: &str) -> String {
    data_line(json!({"type": "error", "content": content}))
}

pub fn done_line() -> String {
    data_line(json!({"type": "done"}))
}

/// A typical answer: session id, two agents, follow-ups, done.
pub fn sample_body() -> String {
    [
        session_line("sess-42"),
        agent_line("farmer", "Farmer"),
        text_line("Plant **beans** "),
        text_line("in spring 🌱"),
        "\n".to_string(),
        agent_line("cfo", "CFO"),
        text_line("Cost: *low*"),
        follow_up_line("cfo", &["How low?", "Any grants?"]),
        done_line(),
    ]
    .concat()
}

/// Observer whose record stays readable while the session runs.
#[derive(Clone, Default)]
pub struct SharedLog {
    events: Arc<Mutex<Vec<StreamEvent>>>,
    finished: Arc<Mutex<Vec<Termination>>>,
}

impl SharedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn terminations(&self) -> Vec<Termination> {
        self.finished.lock().unwrap().clone()
    }

    /// Poll until at least `count` events arrived; panics after ~2s.
    pub async fn wait_for_events(&self, count: usize) {
        for _ in 0..200 {
            if self.events.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {} events", count);
    }
}

impl StreamObserver for SharedLog {
    fn on_event(&mut self, event: &StreamEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn on_finished(&mut self, termination: &Termination) {
        self.finished.lock().unwrap().push(termination.clone());
    }
}
