//! Render sink trait abstraction.
//!
//! The sink is whatever displays the conversation: a terminal, a web view,
//! or a recording double in tests. All calls are synchronous and arrive from
//! a single session task in stream order.

/// Receiver of rendered conversation output.
///
/// Turn indices are zero-based and count turns within one conversation.
pub trait RenderSink: Send + Sync {
    /// A new agent turn was opened.
    fn turn_started(&self, turn: usize, agent_key: &str, agent_display_name: &str);

    /// The full markup of an open turn after a text append.
    fn turn_updated(&self, turn: usize, markup: &str);

    /// The turn was closed; `markup` is its final rendering.
    fn turn_finished(&self, turn: usize, markup: &str);

    /// Follow-up prompts offered by an agent.
    fn follow_ups(&self, agent_key: &str, questions: &[String]);

    /// A human-readable error message.
    fn show_error(&self, message: &str);

    /// The agent currently answering, or `None` once the stream ended.
    fn active_agent_changed(&self, agent_key: Option<&str>);
}
