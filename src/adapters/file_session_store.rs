//! File-based session store adapter.
//!
//! Stores the backend session id as a single line of text, by default in
//! `<config dir>/biochat/session`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::traits::{SessionStore, SessionStoreError};

/// Session store backed by a plain text file.
///
/// # Example
///
/// ```ignore
/// use biochat::adapters::FileSessionStore;
/// use biochat::traits::SessionStore;
///
/// let store = FileSessionStore::new(FileSessionStore::default_path().unwrap());
/// if let Some(id) = store.load()? {
///     println!("Resuming session {}", id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store that reads and writes `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location of the session file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("biochat").join("session"))
    }

    /// Get the path to the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionStoreError::LoadFailed(e.to_string())),
        }
    }

    fn save(&self, session_id: &str) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionStoreError::SaveFailed(e.to_string()))?;
        }
        fs::write(&self.path, format!("{}\n", session_id))
            .map_err(|e| SessionStoreError::SaveFailed(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "session id saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::ClearFailed(e.to_string())),
        }
    }
}
