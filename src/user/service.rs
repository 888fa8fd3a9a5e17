//! User Service Module
//!
//! Business rules for user management. Sits between the HTTP handlers and
//! the [`UserStore`], validating input, hashing credentials and keeping
//! sessions consistent with the stored users.

use crate::auth::session::{SessionStore, SessionTokens};
use crate::user::credentials::{
    validate_password_change, validate_password_length, CredentialHasher, PasswordError,
};
use crate::user::dto::{
    LoginRequest, SignupRequest, UpdatePasswordRequest, UpdateUserRequest, UserTypeRequest,
};
use crate::user::error::{UserError, ValidationError};
use crate::user::models::{User, UserType};
use crate::user::query::{ListParams, Page, UserQuery};
use crate::user::repository::{ProfileChanges, StoreError, UserStore};
use chrono::Utc;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Service for managing user-related operations
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    sessions: Arc<SessionStore>,
}

impl UserService {
    /// Creates a new UserService with the given dependencies
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            store,
            hasher,
            sessions,
        }
    }

    /// Paginated, filtered and sorted users of one type
    pub async fn list(&self, user_type: UserType, params: &ListParams) -> Result<Page<User>, UserError> {
        let query = UserQuery::from_params(user_type, params);
        Ok(self.store.list(&query).await?)
    }

    /// Registers a new user of the requested type
    pub async fn signup(&self, request: SignupRequest) -> Result<User, UserError> {
        let user_type = parse_user_type(request.user_type.as_deref())?;
        let name = required(&request.name, "name")?;
        let email = validate_email(&request.email)?;
        validate_password_length(&request.password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let password = self.hash(request.password).await?;
        let user = User::new(name, email, password, user_type);
        self.store.insert(&user).await?;

        info!("Created {} {} ({})", user.user_type, user.id, user.email);
        Ok(user)
    }

    /// Updates name and/or email of a user of the given type
    ///
    /// Only the supplied fields are written, so a password change landing
    /// between the lookup and the write is kept.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, UserError> {
        let id = parse_id(id)?;
        let user_type = parse_user_type(request.user_type.as_deref())?;
        let changes = ProfileChanges {
            name: request.name.as_deref().map(|name| required(name, "name")).transpose()?,
            email: request.email.as_deref().map(validate_email).transpose()?,
        };
        let user = self.find_typed(id, user_type).await?;

        if let Some(email) = changes.email.as_deref().filter(|email| *email != user.email) {
            if let Some(holder) = self.store.find_by_email(email).await? {
                if holder.id != user.id {
                    return Err(UserError::EmailTaken);
                }
            }
        }

        let user = self
            .store
            .update_profile(id, user_type, &changes, Utc::now())
            .await?
            .ok_or(UserError::NotFound)?;

        info!("Updated {} {}", user.user_type, user.id);
        Ok(user)
    }

    /// Replaces a user's password and revokes their sessions
    ///
    /// Validation runs before any store access, so a rejected password
    /// never reaches storage. Only the credential is written.
    pub async fn update_password(
        &self,
        id: &str,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserError> {
        validate_password_change(&request.new_password, request.confirm_password.as_deref())?;
        let id = parse_id(id)?;
        let user_type = parse_user_type(request.user_type.as_deref())?;
        self.find_typed(id, user_type).await?;

        let password = self.hash(request.new_password).await?;
        if !self.store.update_password(id, user_type, &password, Utc::now()).await? {
            return Err(UserError::NotFound);
        }

        let revoked = self.sessions.revoke_user_sessions(id).await;
        info!("Password changed for {user_type} {id} ({revoked} sessions revoked)");
        Ok(())
    }

    /// Deletes a user of the given type
    pub async fn delete(&self, id: &str, request: UserTypeRequest) -> Result<(), UserError> {
        let id = parse_id(id)?;
        let user_type = parse_user_type(request.user_type.as_deref())?;
        let user = self.find_typed(id, user_type).await?;

        if !self.store.delete(user.id).await? {
            return Err(UserError::NotFound);
        }

        self.sessions.revoke_user_sessions(user.id).await;
        info!("Deleted {} {}", user.user_type, user.id);
        Ok(())
    }

    /// Verifies credentials and opens a session
    pub async fn login(&self, request: LoginRequest) -> Result<(User, SessionTokens), UserError> {
        let email = User::normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(ValidationError::MissingField("email and password").into());
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify(request.password, user.password.clone()).await? {
            warn!("Invalid password for user {}", user.id);
            return Err(UserError::InvalidCredentials);
        }

        let tokens = self.sessions.create_session(user.id, user.user_type).await;
        info!("User {} logged in", user.id);
        Ok((user, tokens))
    }

    /// Ends the session behind `token`
    pub async fn logout(&self, token: &str) -> Result<(), UserError> {
        self.sessions.revoke_session(token).await.map_err(|_| UserError::Unauthorized)
    }

    /// User owning a live session
    pub async fn current_user(&self, token: &str) -> Result<User, UserError> {
        let session =
            self.sessions.validate_session(token).await.map_err(|_| UserError::Unauthorized)?;

        self.store.find_by_id(session.user_id).await?.ok_or(UserError::Unauthorized)
    }

    /// Store connectivity, for health probes
    pub async fn store_health(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    async fn find_typed(&self, id: Uuid, user_type: UserType) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|user| user.user_type == user_type)
            .ok_or(UserError::NotFound)
    }

    async fn hash(&self, password: String) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| PasswordError::HashingError(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let valid = tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| PasswordError::VerificationError(e.to_string()))??;
        Ok(valid)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidId)
}

fn parse_user_type(raw: Option<&str>) -> Result<UserType, ValidationError> {
    let raw = raw.map(str::trim).filter(|t| !t.is_empty()).ok_or(ValidationError::MissingField("type"))?;
    raw.parse().map_err(ValidationError::InvalidUserType)
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = User::normalize_email(raw);
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if !EMAIL_REGEX.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}
