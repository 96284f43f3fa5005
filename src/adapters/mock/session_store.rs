//! In-memory session store for testing.
//!
//! Keeps the session id in memory so tests can check what the controller
//! persisted without touching the file system.

use std::sync::{Arc, Mutex};

use crate::traits::{SessionStore, SessionStoreError};

/// In-memory session store for testing.
///
/// # Example
///
/// ```
/// use biochat::adapters::mock::InMemorySessionStore;
/// use biochat::traits::SessionStore;
///
/// let store = InMemorySessionStore::new();
/// assert_eq!(store.load().unwrap(), None);
///
/// store.save("abc").unwrap();
/// assert_eq!(store.load().unwrap(), Some("abc".to_string()));
///
/// store.clear().unwrap();
/// assert_eq!(store.load().unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    /// Stored session id
    session_id: Arc<Mutex<Option<String>>>,
    /// Number of successful saves
    saves: Arc<Mutex<usize>>,
    /// Whether load should fail
    load_should_fail: Arc<Mutex<bool>>,
    /// Whether save should fail
    save_should_fail: Arc<Mutex<bool>>,
    /// Whether clear should fail
    clear_should_fail: Arc<Mutex<bool>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session id.
    pub fn with_session_id(session_id: &str) -> Self {
        let store = Self::new();
        store.set_session_id(Some(session_id.to_string()));
        store
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether clear should fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *self.clear_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the stored id synchronously (for testing).
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().unwrap().clone()
    }

    /// Set the stored id synchronously (for testing).
    pub fn set_session_id(&self, session_id: Option<String>) {
        *self.session_id.lock().unwrap() = session_id;
    }

    /// How many times `save` succeeded.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionStoreError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(SessionStoreError::LoadFailed("Mock load failure".to_string()));
        }

        Ok(self.session_id())
    }

    fn save(&self, session_id: &str) -> Result<(), SessionStoreError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(SessionStoreError::SaveFailed("Mock save failure".to_string()));
        }

        self.set_session_id(Some(session_id.to_string()));
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        if *self.clear_should_fail.lock().unwrap() {
            return Err(SessionStoreError::ClearFailed("Mock clear failure".to_string()));
        }

        self.set_session_id(None);
        Ok(())
    }
}
