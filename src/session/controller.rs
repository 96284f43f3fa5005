//! Single-flight stream session controller
//!
//! Owns at most one in-flight chat request. Each session runs in its own
//! tokio task that drives the body through the decoder and parser and hands
//! every event to the session's observer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::StreamExt;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ChatApi;
use crate::error::StreamError;
use crate::models::ChatRequest;
use crate::session::{SessionPhase, StreamObserver, Termination};
use crate::sse::{event_stream, StreamEvent};
use crate::traits::{HttpClient, SessionStore};

/// What a finished session hands back.
#[derive(Debug)]
pub struct SessionOutcome<O> {
    pub termination: Termination,
    /// The observer, after its `on_finished` call
    pub observer: O,
}

/// Handle to a started session.
#[derive(Debug)]
pub struct SessionHandle<O> {
    id: u64,
    outcome: oneshot::Receiver<SessionOutcome<O>>,
}

impl<O> SessionHandle<O> {
    /// Controller-local sequence number of this session.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the session to end.
    ///
    /// Returns `None` only if the session task panicked.
    pub async fn finished(self) -> Option<SessionOutcome<O>> {
        self.outcome.await.ok()
    }
}

struct ActiveSession {
    id: u64,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// State shared between the controller and its session tasks.
struct Shared {
    phase: watch::Sender<SessionPhase>,
    session_id: watch::Sender<Option<String>>,
    store: Arc<dyn SessionStore>,
}

impl Shared {
    fn remember_session_id(&self, session: u64, session_id: &str) {
        self.session_id.send_replace(Some(session_id.to_string()));
        if let Err(e) = self.store.save(session_id) {
            warn!(session, error = %e, "failed to persist session id");
        }
    }
}

/// Runs chat requests one at a time.
///
/// ```text
/// Idle → Connecting → Streaming → {Completed | Errored | Cancelled} → Idle
/// ```
///
/// Only `Idle` accepts [`start`](Self::start). Controllers share nothing, so
/// several can run side by side.
pub struct StreamController<C> {
    api: Arc<ChatApi<C>>,
    shared: Arc<Shared>,
    active: Mutex<Option<ActiveSession>>,
    next_id: AtomicU64,
}

impl<C: HttpClient + 'static> StreamController<C> {
    /// Create a controller; the session id is loaded from `store` once, here.
    pub fn new(api: ChatApi<C>, store: Arc<dyn SessionStore>) -> Self {
        let session_id = match store.load() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "could not load session id, starting fresh");
                None
            }
        };

        let (phase, _) = watch::channel(SessionPhase::Idle);
        let (session_id, _) = watch::channel(session_id);

        Self {
            api: Arc::new(api),
            shared: Arc::new(Shared {
                phase,
                session_id,
                store,
            }),
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn api(&self) -> &ChatApi<C> {
        &self.api
    }

    pub fn phase(&self) -> SessionPhase {
        *self.shared.phase.borrow()
    }

    /// Watch phase changes, e.g. to disable input while streaming.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.shared.phase.subscribe()
    }

    /// Current server-assigned session id.
    pub fn session_id(&self) -> Option<String> {
        self.shared.session_id.borrow().clone()
    }

    /// Override the session id for subsequent requests (not persisted).
    pub fn set_session_id(&self, session_id: Option<String>) {
        self.shared.session_id.send_replace(session_id);
    }

    /// Build a request for `raw_message` carrying the current session id.
    pub fn compose_request(&self, raw_message: &str, image_id: Option<String>) -> Option<ChatRequest> {
        ChatRequest::compose(raw_message, self.session_id(), image_id)
    }

    /// Start a session and return immediately.
    ///
    /// Fails with [`StreamError::AlreadyStreaming`] unless the controller is
    /// `Idle`; the running session is not affected. Must be called from
    /// within a Tokio runtime.
    pub fn start<O: StreamObserver>(
        &self,
        request: ChatRequest,
        observer: O,
    ) -> Result<SessionHandle<O>, StreamError> {
        let mut active = self.active_slot();

        let claimed = self.shared.phase.send_if_modified(|phase| {
            if phase.is_idle() {
                *phase = SessionPhase::Connecting;
                true
            } else {
                false
            }
        });
        if !claimed {
            debug!(phase = self.phase().as_str(), "rejecting start while a session is active");
            return Err(StreamError::AlreadyStreaming);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        info!(session = id, "session started");
        let task = tokio::spawn(run_session(
            id,
            Arc::clone(&self.api),
            Arc::clone(&self.shared),
            request,
            observer,
            cancel_rx,
            outcome_tx,
        ));

        *active = Some(ActiveSession {
            id,
            cancel: cancel_tx,
            task,
        });

        Ok(SessionHandle {
            id,
            outcome: outcome_rx,
        })
    }

    /// Cancel the running session and wait until it has fully stopped.
    ///
    /// Once this returns no further observer callbacks fire. Returns `false`
    /// if no session was running.
    pub async fn cancel(&self) -> bool {
        let Some(active) = self.active_slot().take() else {
            return false;
        };
        if active.task.is_finished() {
            return false;
        }

        debug!(session = active.id, "cancelling session");
        let _ = active.cancel.send(true);
        if let Err(e) = active.task.await {
            warn!(session = active.id, error = %e, "session task failed");
        }
        true
    }

    /// Forget the conversation: server history, local id and stored id.
    ///
    /// Rejected with [`StreamError::AlreadyStreaming`] while a session runs.
    pub async fn clear_session(&self) -> Result<(), StreamError> {
        if !self.phase().is_idle() {
            return Err(StreamError::AlreadyStreaming);
        }

        if let Some(id) = self.session_id() {
            self.api.clear_session(&id).await?;
            info!("server session cleared");
        }
        self.shared.session_id.send_replace(None);
        self.shared.store.clear()?;
        Ok(())
    }

    fn active_slot(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

async fn run_session<C: HttpClient, O: StreamObserver>(
    id: u64,
    api: Arc<ChatApi<C>>,
    shared: Arc<Shared>,
    request: ChatRequest,
    mut observer: O,
    mut cancel_rx: watch::Receiver<bool>,
    outcome_tx: oneshot::Sender<SessionOutcome<O>>,
) {
    let idle_guard = IdleGuard::new(id, &shared.phase);
    let termination = drive(id, &api, &shared, &request, &mut observer, &mut cancel_rx).await;

    match &termination {
        Termination::Completed => info!(session = id, "session completed"),
        Termination::Cancelled => info!(session = id, "session cancelled"),
        Termination::Errored(e) => warn!(session = id, error = %e, "session failed"),
    }

    shared.phase.send_replace(termination.phase());
    observer.on_finished(&termination);
    idle_guard.release();

    let _ = outcome_tx.send(SessionOutcome {
        termination,
        observer,
    });
}

/// Puts the controller back to `Idle` when a session task ends, including
/// by unwinding out of an observer callback.
struct IdleGuard<'a> {
    session: u64,
    phase: &'a watch::Sender<SessionPhase>,
    armed: bool,
}

impl<'a> IdleGuard<'a> {
    fn new(session: u64, phase: &'a watch::Sender<SessionPhase>) -> Self {
        Self {
            session,
            phase,
            armed: true,
        }
    }

    /// Normal exit: back to `Idle` before the outcome is handed out.
    fn release(mut self) {
        self.armed = false;
        self.phase.send_replace(SessionPhase::Idle);
    }
}

impl Drop for IdleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(session = self.session, "session task aborted, resetting to idle");
            self.phase.send_replace(SessionPhase::Idle);
        }
    }
}

/// Read the stream until it ends, fails or is cancelled.
///
/// The cancel signal is checked before each read and again before each
/// delivery; dropping the body here also drops the decoder buffers.
async fn drive<C: HttpClient, O: StreamObserver>(
    id: u64,
    api: &ChatApi<C>,
    shared: &Shared,
    request: &ChatRequest,
    observer: &mut O,
    cancel_rx: &mut watch::Receiver<bool>,
) -> Termination {
    let body = tokio::select! {
        biased;
        Ok(()) = cancel_rx.changed() => return Termination::Cancelled,
        body = api.chat_stream(request) => match body {
            Ok(body) => body,
            Err(e) => return Termination::Errored(e),
        },
    };

    shared.phase.send_replace(SessionPhase::Streaming);
    let mut events = Box::pin(event_stream(body));

    loop {
        let next = tokio::select! {
            biased;
            Ok(()) = cancel_rx.changed() => return Termination::Cancelled,
            next = events.next() => next,
        };

        let event = match next {
            Some(Ok(event)) => event,
            Some(Err(e)) => return Termination::Errored(e.into()),
            None => return Termination::Completed,
        };

        let cancelled = *cancel_rx.borrow();
        if cancelled {
            return Termination::Cancelled;
        }

        if let StreamEvent::SessionId { session_id } = &event {
            shared.remember_session_id(id, session_id);
        }

        debug!(session = id, event = event.event_type_name(), "delivering event");
        observer.on_event(&event);

        if event.is_terminal() {
            return Termination::Completed;
        }
    }
}
