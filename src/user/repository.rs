//! User Repository Module
//!
//! Defines the storage interface for user records and an in-memory
//! implementation. The PostgreSQL implementation lives in
//! [`crate::postgres::user_store`].

use super::models::User;
use super::models::UserType;
use super::query::{Page, UserQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Email already exists")]
    DuplicateEmail,
}

/// Profile fields to change; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Storage operations for user records
///
/// Writes touch only the columns they own, so a profile edit and a password
/// change racing on the same user both survive.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user; fails with `DuplicateEmail` when the email is held
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Applies `changes` to the user with this id and type and returns the
    /// stored result. `Ok(None)` when no such user exists.
    async fn update_profile(
        &self,
        id: Uuid,
        user_type: UserType,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError>;

    /// Replaces only the password hash. `Ok(false)` when no such user exists.
    async fn update_password(
        &self,
        id: Uuid,
        user_type: UserType,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// `Ok(false)` when the id is unknown
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// One page of users matching `query`, plus the total match count
    async fn list(&self, query: &UserQuery) -> Result<Page<User>, StoreError>;

    /// Connectivity check for health probes
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Process-local store, used when no database is configured and in tests
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_held_by_other(users: &HashMap<Uuid, User>, email: &str, id: Uuid) -> bool {
    users.values().any(|u| u.id != id && u.email == email)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if email_held_by_other(&users, &user.email, user.id) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        user_type: UserType,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        if !users.get(&id).is_some_and(|u| u.user_type == user_type) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if email_held_by_other(&users, email, id) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        user.updated_at = updated_at;
        Ok(Some(user.clone()))
    }

    async fn update_password(
        &self,
        id: Uuid,
        user_type: UserType,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|u| u.user_type == user_type) {
            Some(user) => {
                user.password = password_hash.to_string();
                user.updated_at = updated_at;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: &UserQuery) -> Result<Page<User>, StoreError> {
        let users = self.users.read().await;
        Ok(query.apply(users.values()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
