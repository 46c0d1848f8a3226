//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vergo_core::types::id::UserId;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Normalized (trimmed, lowercased) email. Unique.
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Pre-generated identifier.
    pub id: UserId,
    /// Normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CreateUser {
    /// Materialize the row this insert would produce.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = CreateUser {
            id: UserId::new(),
            email: "a@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        }
        .into_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("a@example.com"));
    }
}
