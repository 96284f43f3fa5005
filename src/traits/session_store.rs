//! Session id store trait abstraction.
//!
//! The backend identifies a conversation by a session id it hands out in the
//! first `session_id` event. The store keeps it between runs, read once at
//! startup and written whenever the server assigns a new one.

use thiserror::Error;

/// Session store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// Failed to read the stored id
    #[error("Failed to load session id: {0}")]
    LoadFailed(String),
    /// Failed to persist the id
    #[error("Failed to save session id: {0}")]
    SaveFailed(String),
    /// Failed to remove the stored id
    #[error("Failed to clear session id: {0}")]
    ClearFailed(String),
}

/// Trait for session id persistence.
pub trait SessionStore: Send + Sync {
    /// Load the stored session id.
    ///
    /// # Returns
    /// - `Ok(Some(id))` if an id is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if loading failed
    fn load(&self) -> Result<Option<String>, SessionStoreError>;

    /// Persist a session id, replacing any previous one.
    fn save(&self, session_id: &str) -> Result<(), SessionStoreError>;

    /// Remove the stored session id.
    fn clear(&self) -> Result<(), SessionStoreError>;
}
