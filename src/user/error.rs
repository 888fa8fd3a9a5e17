//! User-related error types

use crate::user::credentials::PasswordError;
use crate::user::repository::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request payload rejected before touching the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Unknown user type: {0}")]
    InvalidUserType(String),

    #[error("Invalid user ID format")]
    InvalidId,
}

impl ValidationError {
    /// Short machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::PasswordMismatch => "mismatch",
            ValidationError::PasswordTooShort { .. } => "tooShort",
            ValidationError::MissingField(_) => "missingField",
            ValidationError::InvalidEmail => "invalidEmail",
            ValidationError::InvalidUserType(_) => "invalidType",
            ValidationError::InvalidId => "invalidId",
        }
    }
}

/// User-specific errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("User not found")]
    NotFound,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for UserError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateEmail => UserError::EmailTaken,
            other => UserError::Store(other),
        }
    }
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::EmailTaken => StatusCode::CONFLICT,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Unauthorized => StatusCode::UNAUTHORIZED,
            UserError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UserError::Validation(_) => "VALIDATION_ERROR",
            UserError::NotFound => "USER_NOT_FOUND",
            UserError::EmailTaken => "EMAIL_TAKEN",
            UserError::InvalidCredentials => "INVALID_CREDENTIALS",
            UserError::Unauthorized => "UNAUTHORIZED",
            UserError::Password(_) => "PASSWORD_ERROR",
            UserError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            // store and hashing details stay in the logs
            UserError::Store(_) | UserError::Password(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            status: self.status_code().as_u16(),
            message,
            code: Some(self.error_code().to_string()),
            reason: match self {
                UserError::Validation(err) => Some(err.reason().to_string()),
                _ => None,
            },
        }
    }
}

impl ResponseError for UserError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(self.to_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request_with_reason() {
        let err = UserError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = err.to_response();
        assert_eq!(body.code.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(body.reason.as_deref(), Some("mismatch"));
    }

    #[test]
    fn test_too_short_reason() {
        let err = ValidationError::PasswordTooShort { min: 8 };
        assert_eq!(err.reason(), "tooShort");
        assert_eq!(err.to_string(), "Password must be at least 8 characters long");
    }

    #[test]
    fn test_duplicate_store_error_becomes_conflict() {
        let err = UserError::from(StoreError::DuplicateEmail);
        assert!(matches!(err, UserError::EmailTaken));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_error_hides_details() {
        let err = UserError::from(StoreError::Query("relation users does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_response().message, "Internal server error");
    }

    #[test]
    fn test_not_found_status() {
        let body = UserError::NotFound.to_response();
        assert_eq!(body.status, 404);
        assert_eq!(body.code.as_deref(), Some("USER_NOT_FOUND"));
        assert!(body.reason.is_none());
    }
}
