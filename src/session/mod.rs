//! Stream sessions
//!
//! # Module structure
//! - `phase` - lifecycle states and termination outcomes
//! - `observer` - the per-session event receiver trait
//! - `controller` - single-flight controller that runs sessions

mod controller;
mod observer;
mod phase;

pub use controller::{SessionHandle, SessionOutcome, StreamController};
pub use observer::StreamObserver;
pub use phase::{SessionPhase, Termination};
