//! Signup, login and user lookup.

use std::sync::Arc;

use tracing::{debug, info};

use vergo_core::error::AppError;
use vergo_core::result::AppResult;
use vergo_core::traits::Clock;
use vergo_core::types::id::UserId;
use vergo_entity::user::{CreateUser, User};

use crate::password::{PasswordHasher, PasswordValidator};

use super::store::UserStore;

/// Trims and lowercases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Owns user records and credential checks.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("validator", &self.validator)
            .finish()
    }
}

impl IdentityService {
    /// Creates a new identity service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: PasswordValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            clock,
        }
    }

    /// Registers a new account.
    ///
    /// Uniqueness is decided by the store's insert, not by a pre-check, so
    /// concurrent signups for one email yield exactly one success.
    pub async fn signup(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::invalid_payload("Email must not be empty"));
        }
        self.validator.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(CreateUser {
                id: UserId::new(),
                email,
                password_hash,
                created_at: self.clock.now(),
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials. Unknown email and wrong password are the same
    /// `InvalidCredentials` outcome and cost the same hash verification.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            debug!("Login for unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::invalid_credentials());
        }

        Ok(user)
    }

    /// Fetches a user by ID.
    pub async fn get_by_id(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryUserStore;
    use vergo_core::config::AuthConfig;
    use vergo_core::error::ErrorKind;
    use vergo_core::traits::SystemClock;

    fn service() -> IdentityService {
        let mut config = AuthConfig::with_secrets("a", "b");
        config.argon2_memory_kib = 1024;
        config.argon2_iterations = 1;
        IdentityService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(PasswordHasher::new(&config).unwrap()),
            PasswordValidator::new(&config),
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.com "), "a@x.com");
    }

    #[tokio::test]
    async fn test_signup_then_login_same_user() {
        let identity = service();
        let created = identity.signup("a@x.com", "secret1").await.unwrap();
        let logged_in = identity.login(" A@X.COM", "secret1").await.unwrap();
        assert_eq!(created.id, logged_in.id);
        assert_eq!(logged_in.email, "a@x.com");
        assert_ne!(created.password_hash, "secret1");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let identity = service();
        identity.signup("a@x.com", "secret1").await.unwrap();
        let err = identity.signup("A@x.com", "secret2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmailInUse);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signup() {
        let identity = service();
        let (a, b) = tokio::join!(
            identity.signup("race@x.com", "secret1"),
            identity.signup("race@x.com", "secret1")
        );
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(e) if e.kind == ErrorKind::EmailInUse))
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let identity = service();
        identity.signup("a@x.com", "secret1").await.unwrap();
        let wrong = identity.login("a@x.com", "nope123").await.unwrap_err();
        let unknown = identity.login("b@x.com", "secret1").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.kind, unknown.kind);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let identity = service();
        let err = identity.signup("a@x.com", "12345").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPayload);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let identity = service();
        let err = identity.get_by_id(UserId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
