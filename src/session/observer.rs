//! Session observer trait

use crate::session::Termination;
use crate::sse::StreamEvent;

/// Receiver of one session's events.
///
/// The session task owns the observer, so calls never overlap: `on_event`
/// once per event in stream order, then `on_finished` exactly once.
pub trait StreamObserver: Send + 'static {
    fn on_event(&mut self, event: &StreamEvent);

    fn on_finished(&mut self, _termination: &Termination) {}
}
