//! Session storage implementations
//!
//! This module handles persistence of login sessions, including
//! serialization, the active-session pointer, and teardown on auth
//! failure. Two implementations are provided: an in-memory store and a
//! JSON-file-backed store for the console binary.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{TokenPair, User};
use crate::utils::errors::Result;

/// One stored login session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub tokens: TokenPair,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            tokens,
            user,
            created_at: Utc::now(),
        }
    }
}

/// Repository of login sessions with a single active pointer.
///
/// `clear_active_session` is idempotent: clearing when nothing is active
/// is a no-op, which is what keeps repeated auth-failure teardowns from
/// looping.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// The currently active session, if any
    fn active_session(&self) -> Option<SessionRecord>;

    /// Insert a new session record and make it active
    fn set_active_session(&self, record: SessionRecord) -> Result<()>;

    /// Rewrite the active session's tokens after a refresh
    fn update_tokens(&self, access: String, refresh: Option<String>) -> Result<()>;

    /// Remove the active session record and pointer
    fn clear_active_session(&self) -> Result<()>;

    /// Point the active pointer at another stored session
    fn switch_session(&self, id: Uuid) -> Result<bool>;

    /// Number of stored sessions
    fn session_count(&self) -> usize;

    /// Bearer token for the active session, if any
    fn active_access_token(&self) -> Option<String> {
        self.active_session().map(|record| record.tokens.access)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    sessions: HashMap<Uuid, SessionRecord>,
    active: Option<Uuid>,
}

impl StoreState {
    fn active_session(&self) -> Option<SessionRecord> {
        self.active.and_then(|id| self.sessions.get(&id).cloned())
    }

    fn set_active(&mut self, record: SessionRecord) {
        self.active = Some(record.id);
        self.sessions.insert(record.id, record);
    }

    fn update_tokens(&mut self, access: String, refresh: Option<String>) {
        if let Some(record) = self.active.and_then(|id| self.sessions.get_mut(&id)) {
            record.tokens.access = access;
            if let Some(refresh) = refresh {
                record.tokens.refresh = refresh;
            }
        }
    }

    fn clear_active(&mut self) {
        if let Some(id) = self.active.take() {
            self.sessions.remove(&id);
        }
    }

    fn switch(&mut self, id: Uuid) -> bool {
        if self.sessions.contains_key(&id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoreState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn active_session(&self) -> Option<SessionRecord> {
        self.locked().active_session()
    }

    fn set_active_session(&self, record: SessionRecord) -> Result<()> {
        debug!(session_id = %record.id, user_id = record.user.id, "Storing active session");
        self.locked().set_active(record);
        Ok(())
    }

    fn update_tokens(&self, access: String, refresh: Option<String>) -> Result<()> {
        self.locked().update_tokens(access, refresh);
        Ok(())
    }

    fn clear_active_session(&self) -> Result<()> {
        let mut state = self.locked();
        if state.active.is_some() {
            debug!("Clearing active session");
        }
        state.clear_active();
        Ok(())
    }

    fn switch_session(&self, id: Uuid) -> Result<bool> {
        Ok(self.locked().switch(id))
    }

    fn session_count(&self) -> usize {
        self.locked().sessions.len()
    }
}

/// JSON-file-backed session store used by the console binary so logins
/// survive restarts
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    inner: Mutex<StoreState>,
}

impl FileSessionStore {
    /// Open the store, loading any previously persisted state. A missing
    /// or corrupted file starts empty; corruption is logged, not fatal.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupted session file");
                    StoreState::default()
                }
            },
            Err(_) => StoreState::default(),
        };

        Ok(Self {
            path,
            inner: Mutex::new(state),
        })
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        let serialized = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn active_session(&self) -> Option<SessionRecord> {
        self.locked().active_session()
    }

    fn set_active_session(&self, record: SessionRecord) -> Result<()> {
        debug!(session_id = %record.id, user_id = record.user.id, "Storing active session");
        let mut state = self.locked();
        state.set_active(record);
        self.persist(&state)
    }

    fn update_tokens(&self, access: String, refresh: Option<String>) -> Result<()> {
        let mut state = self.locked();
        state.update_tokens(access, refresh);
        self.persist(&state)
    }

    fn clear_active_session(&self) -> Result<()> {
        let mut state = self.locked();
        state.clear_active();
        self.persist(&state)
    }

    fn switch_session(&self, id: Uuid) -> Result<bool> {
        let mut state = self.locked();
        let switched = state.switch(id);
        if switched {
            self.persist(&state)?;
        }
        Ok(switched)
    }

    fn session_count(&self) -> usize {
        self.locked().sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn record(email: &str) -> SessionRecord {
        SessionRecord::new(
            TokenPair {
                access: "access-1".to_string(),
                refresh: "refresh-1".to_string(),
            },
            User {
                id: 1,
                email: email.to_string(),
                full_name: "Test User".to_string(),
                role: Role::Organizer,
                created_at: Utc::now(),
            },
        )
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.active_session().is_none());
        assert!(store.active_access_token().is_none());

        store.set_active_session(record("one@example.com")).unwrap();
        assert_eq!(store.active_access_token().as_deref(), Some("access-1"));

        store.update_tokens("access-2".to_string(), None).unwrap();
        let active = store.active_session().unwrap();
        assert_eq!(active.tokens.access, "access-2");
        assert_eq!(active.tokens.refresh, "refresh-1");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = MemorySessionStore::new();
        store.set_active_session(record("one@example.com")).unwrap();
        store.clear_active_session().unwrap();
        assert!(store.active_session().is_none());
        // Clearing again must not fail
        store.clear_active_session().unwrap();
    }

    #[test]
    fn test_multiple_logins_switching() {
        let store = MemorySessionStore::new();
        let first = record("one@example.com");
        let first_id = first.id;
        store.set_active_session(first).unwrap();
        store.set_active_session(record("two@example.com")).unwrap();

        assert_eq!(store.session_count(), 2);
        assert_eq!(store.active_session().unwrap().user.email, "two@example.com");

        assert!(store.switch_session(first_id).unwrap());
        assert_eq!(store.active_session().unwrap().user.email, "one@example.com");
        assert!(!store.switch_session(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set_active_session(record("one@example.com")).unwrap();
        drop(store);

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.active_session().unwrap().user.email, "one@example.com");
        assert_eq!(reopened.session_count(), 1);
    }

    #[test]
    fn test_file_store_tolerates_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.active_session().is_none());
    }
}
