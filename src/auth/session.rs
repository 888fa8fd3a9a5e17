//! Session management for authenticated users.
//!
//! Sessions are opaque bearer tokens kept in process memory. A token maps
//! to the user it was issued for until it expires or is revoked.

use crate::user::models::UserType;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

const TOKEN_LENGTH: usize = 48;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,
}

/// Session data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub token: String,
    pub user_id: Uuid,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What the client receives at login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Session service for managing authenticated sessions
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, UserSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_ttl_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    /// Create a new session for an authenticated user
    ///
    /// Expired sessions are pruned here, so tokens that are never presented
    /// again don't pile up.
    pub async fn create_session(&self, user_id: Uuid, user_type: UserType) -> SessionTokens {
        let now = Utc::now();
        let session = UserSession {
            token: generate_token(),
            user_id,
            user_type,
            created_at: now,
            expires_at: now + self.ttl,
        };
        let tokens = SessionTokens {
            token: session.token.clone(),
            expires_at: session.expires_at,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token.clone(), session);
        tokens
    }

    /// Validate a session token; expired sessions are dropped on the way out
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, SessionError> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionError::SessionNotFound)?;

        if session.expires_at <= Utc::now() {
            self.sessions.write().await.remove(token);
            return Err(SessionError::SessionExpired);
        }

        Ok(session)
    }

    /// Revoke a session (logout)
    pub async fn revoke_session(&self, token: &str) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(token)
            .map(|_| ())
            .ok_or(SessionError::SessionNotFound)
    }

    /// Revoke every session of a user. Returns how many were dropped.
    pub async fn revoke_user_sessions(&self, user_id: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        before - sessions.len()
    }
}

fn generate_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(TOKEN_LENGTH).map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_validate() {
        let store = SessionStore::with_ttl_hours(24);
        let user_id = Uuid::new_v4();
        let tokens = store.create_session(user_id, UserType::Admin).await;

        assert_eq!(tokens.token.len(), TOKEN_LENGTH);
        let session = store.validate_session(&tokens.token).await.unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.user_type, UserType::Admin);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = SessionStore::with_ttl_hours(1);
        let a = store.create_session(Uuid::new_v4(), UserType::Client).await;
        let b = store.create_session(Uuid::new_v4(), UserType::Client).await;
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = SessionStore::with_ttl_hours(1);
        assert_eq!(store.validate_session("nope").await, Err(SessionError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let store = SessionStore::new(Duration::seconds(-1));
        let tokens = store.create_session(Uuid::new_v4(), UserType::Client).await;

        assert_eq!(store.validate_session(&tokens.token).await, Err(SessionError::SessionExpired));
        assert_eq!(store.validate_session(&tokens.token).await, Err(SessionError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned_on_login() {
        let store = SessionStore::new(Duration::seconds(-1));
        for _ in 0..1000 {
            store.create_session(Uuid::new_v4(), UserType::Client).await;
        }
        assert_eq!(store.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_pruning_keeps_live_sessions() {
        let store = SessionStore::with_ttl_hours(1);
        let live = store.create_session(Uuid::new_v4(), UserType::Client).await;
        let stale = UserSession {
            token: "stale".into(),
            user_id: Uuid::new_v4(),
            user_type: UserType::Admin,
            created_at: Utc::now() - Duration::hours(2),
            expires_at: Utc::now() - Duration::hours(1),
        };
        store.sessions.write().await.insert(stale.token.clone(), stale);

        let fresh = store.create_session(Uuid::new_v4(), UserType::Client).await;

        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 2);
        assert!(sessions.contains_key(&live.token));
        assert!(sessions.contains_key(&fresh.token));
        assert!(!sessions.contains_key("stale"));
    }

    #[tokio::test]
    async fn test_revoke_session() {
        let store = SessionStore::with_ttl_hours(1);
        let tokens = store.create_session(Uuid::new_v4(), UserType::Client).await;

        store.revoke_session(&tokens.token).await.unwrap();
        assert!(store.validate_session(&tokens.token).await.is_err());
        assert_eq!(store.revoke_session(&tokens.token).await, Err(SessionError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_revoke_user_sessions_keeps_others() {
        let store = SessionStore::with_ttl_hours(1);
        let user_id = Uuid::new_v4();
        let first = store.create_session(user_id, UserType::Client).await;
        let second = store.create_session(user_id, UserType::Client).await;
        let other = store.create_session(Uuid::new_v4(), UserType::Client).await;

        assert_eq!(store.revoke_user_sessions(user_id).await, 2);
        assert!(store.validate_session(&first.token).await.is_err());
        assert!(store.validate_session(&second.token).await.is_err());
        assert!(store.validate_session(&other.token).await.is_ok());
    }
}
