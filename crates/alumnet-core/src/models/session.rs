//! Authentication and session payload types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

/// Access level of an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// The authenticated identity held by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Login form payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Successful login/registration payload from the auth service
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: AuthUser,
    pub token: String,
}

impl fmt::Debug for AuthPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthPayload")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// What the credential store persists across restarts
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    pub user: AuthUser,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StoredCredentials")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_tokens() {
        let payload = AuthPayload {
            user: AuthUser {
                id: UserId::new(1),
                name: "Admin User".to_string(),
                email: "admin@example.com".to_string(),
                role: Role::Admin,
            },
            token: "secret-token".to_string(),
        };
        let rendered = format!("{payload:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
