//! Session store trait and backends.

use crate::{Session, SessionResult};
use atrium_config::Paths;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Trait for session storage backends.
///
/// The request layer reads the session on every authenticated call; it
/// never mutates it concurrently. Backends must tolerate `clear` being
/// called when no session is stored.
pub trait SessionStore: Send + Sync {
    /// Store a session, stamping it with the current time.
    fn set(&self, session: &Session) -> SessionResult<()>;

    /// Retrieve the stored session.
    ///
    /// Never fails: a corrupt persisted entry is deleted and absence
    /// returned.
    fn get(&self) -> Option<Session>;

    /// Remove the stored session unconditionally. Idempotent.
    fn clear(&self);

    /// Check whether a session is present.
    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

fn stamped(session: &Session) -> Session {
    let mut session = session.clone();
    session.created_at = Some(chrono::Utc::now());
    session
}

/// File-backed session store.
///
/// Persists the session as a single JSON entry at a fixed path, the
/// durable analog of the browser console's local-storage key.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting to the standard session file.
    pub fn new(paths: &Paths) -> Self {
        Self {
            path: paths.session_file(),
        }
    }

    /// Create a store persisting to a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn set(&self, session: &Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&stamped(session))?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Session stored");
        Ok(())
    }

    fn get(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt session entry, discarding");
                let _ = std::fs::remove_file(&self.path);
                None
            }
        }
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
        debug!(path = %self.path.display(), "Session cleared");
    }
}

/// In-memory session store for embedders and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entry: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, session: &Session) -> SessionResult<()> {
        *self.entry.lock().expect("session lock poisoned") = Some(stamped(session));
        Ok(())
    }

    fn get(&self) -> Option<Session> {
        self.entry.lock().expect("session lock poisoned").clone()
    }

    fn clear(&self) {
        *self.entry.lock().expect("session lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_store() -> (tempfile::TempDir, FileSessionStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::with_path(tmp.path().join("session.json"));
        (tmp, store)
    }

    #[test]
    fn test_roundtrip() {
        let (_tmp, store) = file_store();

        store.set(&Session::new("op@atrium.app", "token-123")).unwrap();

        let session = store.get().expect("session should be present");
        assert_eq!(session.email, "op@atrium.app");
        assert_eq!(session.access_token.as_deref(), Some("token-123"));
        assert!(session.created_at.is_some());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_tmp, store) = file_store();

        store.set(&Session::new("op@atrium.app", "token-123")).unwrap();
        store.clear();
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());

        // Clearing again must not fail.
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_discarded() {
        let (_tmp, store) = file_store();

        std::fs::write(store.path.clone(), "{not json").unwrap();
        assert!(store.get().is_none());
        // The corrupt file must be gone, not re-read forever.
        assert!(!store.path.exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.set(&Session::new("op@atrium.app", "t")).unwrap();
        assert!(store.is_authenticated());
        assert!(store.get().unwrap().created_at.is_some());

        store.clear();
        store.clear();
        assert!(store.get().is_none());
    }
}
