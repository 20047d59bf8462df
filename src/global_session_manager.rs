use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::models::session_state::SessionState;

/// Holds one `SessionState` per browser session.
///
/// The lock is only ever held for a snapshot or a field update, never across a
/// collaborator call, so the upload and extraction tracks of one session can be
/// in flight at the same time.
#[derive(Clone, Default)]
pub struct GlobalSessionManager {
    sessions: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl GlobalSessionManager {
    pub fn new() -> Self {
        GlobalSessionManager {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionState>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts or replaces a session
    pub fn insert(&self, session_id: String, state: SessionState) {
        self.lock().insert(session_id, state);
    }

    /// Retrieves a copy of a session if it exists
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.lock().get(session_id).cloned()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    /// Applies `f` to the session in place. Returns `None` if the session is gone.
    pub fn update<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        self.lock().get_mut(session_id).map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn remove(&self, session_id: &str) -> Option<SessionState> {
        self.lock().remove(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_touches_named_session() {
        let manager = GlobalSessionManager::new();
        manager.insert("a".to_string(), SessionState::new());
        manager.insert("b".to_string(), SessionState::new());

        let applied = manager.update("a", |state| state.set_prompt("find totals"));
        assert!(applied.is_some());
        assert_eq!(manager.get("a").unwrap().prompt, "find totals");
        assert_eq!(manager.get("b").unwrap().prompt, "");
    }

    #[test]
    fn test_missing_session() {
        let manager = GlobalSessionManager::new();
        assert!(manager.get("nope").is_none());
        assert!(manager.update("nope", |state| state.set_prompt("x")).is_none());
        assert!(!manager.contains("nope"));
    }

    #[test]
    fn test_clones_share_sessions() {
        let manager = GlobalSessionManager::new();
        let other = manager.clone();
        manager.insert("a".to_string(), SessionState::new());
        assert!(other.contains("a"));
        assert_eq!(other.len(), 1);
        assert!(other.remove("a").is_some());
        assert!(!manager.contains("a"));
        assert!(manager.is_empty());
    }
}
