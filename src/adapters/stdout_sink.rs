//! Plain-text render sink for the command line.
//!
//! Only finished turns are printed; progressive updates go to the trace log.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::traits::RenderSink;

/// Render sink writing to stdout (or any other writer).
pub struct StdoutSink<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl StdoutSink<io::Stdout> {
    /// Create a sink writing to the process stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutSink<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StdoutSink<W> {
    /// Create a sink writing to `writer`.
    pub fn with_writer(writer: W) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_lines(&self, lines: &[String]) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(out, "{}", line))
            .and_then(|_| out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write output");
        }
    }
}

impl<W: Write + Send> RenderSink for StdoutSink<W> {
    fn turn_started(&self, _turn: usize, _agent_key: &str, agent_display_name: &str) {
        self.write_lines(&[format!("[{}]", agent_display_name)]);
    }

    fn turn_updated(&self, turn: usize, markup: &str) {
        tracing::trace!(turn, len = markup.len(), "turn updated");
    }

    fn turn_finished(&self, _turn: usize, markup: &str) {
        self.write_lines(&[markup.to_string(), String::new()]);
    }

    fn follow_ups(&self, _agent_key: &str, questions: &[String]) {
        if questions.is_empty() {
            return;
        }
        let mut lines = vec!["Follow-up questions:".to_string()];
        lines.extend(questions.iter().map(|q| format!("  - {}", q)));
        self.write_lines(&lines);
    }

    fn show_error(&self, message: &str) {
        self.write_lines(&[message.to_string()]);
    }

    fn active_agent_changed(&self, agent_key: Option<&str>) {
        tracing::debug!(agent = agent_key.unwrap_or("none"), "active agent changed");
    }
}
