//! User domain models
//!
//! Clients, sub-vendors and admins share one collection and are told
//! apart by the `type` discriminator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Discriminator for the kinds of account stored in the user collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "sub-vendor")]
    SubVendor,
    #[serde(rename = "admin")]
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::SubVendor => "sub-vendor",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(UserType::Client),
            "sub-vendor" => Ok(UserType::SubVendor),
            "admin" => Ok(UserType::Admin),
            other => Err(other.to_string()),
        }
    }
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// argon2 PHC string
    pub password: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record; `password` must already be hashed.
    pub fn new(name: String, email: String, password: String, user_type: UserType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password,
            user_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Normalised form used for storage and uniqueness checks
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_round_trips_through_str() {
        for user_type in [UserType::Client, UserType::SubVendor, UserType::Admin] {
            assert_eq!(user_type.as_str().parse::<UserType>(), Ok(user_type));
        }
    }

    #[test]
    fn test_user_type_rejects_unknown() {
        assert_eq!("vendor".parse::<UserType>(), Err("vendor".to_string()));
    }

    #[test]
    fn test_user_type_serde_names() {
        let json = serde_json::to_string(&UserType::SubVendor).unwrap();
        assert_eq!(json, "\"sub-vendor\"");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(User::normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
