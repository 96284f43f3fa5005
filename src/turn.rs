//! One agent's streamed reply

use crate::markdown::render;

/// An agent turn: identity plus an append-only raw text buffer.
///
/// Markup is always `render(raw)`. The last rendering is memoized by buffer
/// length, which is exact because the buffer only ever grows.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    agent_key: String,
    agent_display_name: String,
    raw: String,
    markup: String,
    rendered_len: usize,
    closed: bool,
}

impl ChatTurn {
    pub fn new(agent_key: impl Into<String>, agent_display_name: impl Into<String>) -> Self {
        Self {
            agent_key: agent_key.into(),
            agent_display_name: agent_display_name.into(),
            raw: String::new(),
            markup: String::new(),
            rendered_len: 0,
            closed: false,
        }
    }

    pub fn agent_key(&self) -> &str {
        &self.agent_key
    }

    pub fn agent_display_name(&self) -> &str {
        &self.agent_display_name
    }

    /// Everything received so far, unrendered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append a text delta. Returns `false` (and changes nothing) once closed.
    pub fn append(&mut self, content: &str) -> bool {
        if self.closed {
            return false;
        }
        self.raw.push_str(content);
        true
    }

    /// Current markup for the whole buffer.
    pub fn markup(&mut self) -> &str {
        if self.rendered_len != self.raw.len() {
            self.markup = render(&self.raw);
            self.rendered_len = self.raw.len();
        }
        &self.markup
    }

    /// Stop accepting text.
    pub fn close(&mut self) {
        self.closed = true;
    }
}
