//! User repository implementation.

use sqlx::PgPool;

use vergo_core::error::{AppError, ErrorKind};
use vergo_core::result::AppResult;
use vergo_core::types::id::UserId;
use vergo_entity::user::{CreateUser, User};

use crate::error::is_unique_violation;

/// Repository for user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
        })
    }

    /// Insert a new user. A duplicate email surfaces as `EmailInUse`.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(data.id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::email_in_use()
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create user", e)
            }
        })
    }
}
