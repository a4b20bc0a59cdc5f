//! Bearer-token session tracking.
//!
//! Login mints an opaque UUID token; every authenticated request resolves
//! the token back to a username and refreshes the activity timestamp.
//! Sessions expire after a configured stretch of inactivity and expired
//! entries are purged lazily on access.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::logutil::escape_log;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    fn new(username: String) -> Self {
        let now = Utc::now();
        Session {
            token: Uuid::new_v4().to_string(),
            username,
            login_time: now,
            last_activity: now,
        }
    }

    /// Update the last activity timestamp
    pub fn update_activity(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Check if the session has been inactive for longer than the timeout
    pub fn is_inactive(&self, timeout_minutes: i64) -> bool {
        let timeout = chrono::Duration::minutes(timeout_minutes);
        Utc::now() - self.last_activity > timeout
    }
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    timeout_minutes: i64,
}

impl SessionManager {
    pub fn new(timeout_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout_minutes: timeout_minutes.max(1),
        }
    }

    /// Mint a fresh token for a verified user.
    pub fn login(&self, username: &str) -> String {
        let session = Session::new(username.to_string());
        let token = session.token.clone();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| !s.is_inactive(self.timeout_minutes));
        sessions.insert(token.clone(), session);
        info!("session opened for {}", escape_log(username));
        token
    }

    /// Resolve a token to its username, refreshing the activity timestamp.
    /// Expired tokens are dropped and resolve to `None`.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        match sessions.get_mut(token) {
            Some(session) if session.is_inactive(self.timeout_minutes) => {
                let username = session.username.clone();
                sessions.remove(token);
                debug!("session for {} timed out", escape_log(&username));
                None
            }
            Some(session) => {
                session.update_activity();
                Some(session.username.clone())
            }
            None => None,
        }
    }

    /// Drop a token. Returns true if a live session was removed.
    pub fn logout(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        match sessions.remove(token) {
            Some(session) => {
                info!("session closed for {}", escape_log(&session.username));
                true
            }
            None => false,
        }
    }

    /// Drop every session belonging to a username (account deletion).
    pub fn logout_user(&self, username: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| !s.username.eq_ignore_ascii_case(username));
    }

    /// Number of live (non-expired) sessions.
    pub fn active_count(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .values()
            .filter(|s| !s.is_inactive(self.timeout_minutes))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_resolve_logout_cycle() {
        let manager = SessionManager::new(60);
        let token = manager.login("alice");
        assert_eq!(manager.resolve(&token), Some("alice".to_string()));
        assert_eq!(manager.active_count(), 1);

        assert!(manager.logout(&token));
        assert_eq!(manager.resolve(&token), None);
        assert!(!manager.logout(&token));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let manager = SessionManager::new(60);
        assert_eq!(manager.resolve("not-a-token"), None);
    }

    #[test]
    fn inactive_session_expires_on_resolve() {
        let manager = SessionManager::new(30);
        let token = manager.login("bob1");
        {
            let mut sessions = manager.sessions.write().expect("lock");
            let session = sessions.get_mut(&token).expect("session");
            session.last_activity = Utc::now() - chrono::Duration::minutes(31);
        }
        assert_eq!(manager.resolve(&token), None);
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn resolve_refreshes_activity() {
        let manager = SessionManager::new(30);
        let token = manager.login("carol");
        {
            let mut sessions = manager.sessions.write().expect("lock");
            let session = sessions.get_mut(&token).expect("session");
            session.last_activity = Utc::now() - chrono::Duration::minutes(29);
        }
        assert_eq!(manager.resolve(&token), Some("carol".to_string()));
        // The touch above pushed expiry out another full window.
        assert_eq!(manager.resolve(&token), Some("carol".to_string()));
    }

    #[test]
    fn logout_user_clears_all_their_tokens() {
        let manager = SessionManager::new(60);
        let first = manager.login("dave");
        let second = manager.login("Dave");
        manager.logout_user("dave");
        assert_eq!(manager.resolve(&first), None);
        assert_eq!(manager.resolve(&second), None);
    }
}
