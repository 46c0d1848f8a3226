//! User persistence behind a trait, with PostgreSQL and in-memory backends.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vergo_core::error::AppError;
use vergo_core::result::AppResult;
use vergo_core::types::id::UserId;
use vergo_database::repositories::UserRepository;
use vergo_entity::user::{CreateUser, User};

/// User persistence.
///
/// `create` must enforce email uniqueness atomically and report a conflict
/// as `EmailInUse`.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new user.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;
}

/// PostgreSQL-backed user store. Uniqueness comes from the `users.email` index.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    repo: UserRepository,
}

impl PgUserStore {
    /// Creates a new store over the user repository.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        self.repo.create(&data).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }
}

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// In-memory user store. The uniqueness check and insert share one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Users>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().await;
        if users.by_email.contains_key(&data.email) {
            return Err(AppError::email_in_use());
        }
        let user = data.into_user();
        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.by_id.get(&id).cloned())
    }
}
