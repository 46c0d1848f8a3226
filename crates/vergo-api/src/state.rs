//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use vergo_auth::identity::{IdentityService, PgUserStore, UserStore};
use vergo_auth::jwt::{JwtDecoder, JwtEncoder};
use vergo_auth::password::{PasswordHasher, PasswordValidator};
use vergo_auth::session::{PgSessionStore, SessionManager, SessionStore};
use vergo_auth::tenancy::{ActiveOrgStore, PgActiveOrgStore, TenancyResolver};
use vergo_auth::{AuthorizationGate, PgAuditSink, PgMembershipLookup};
use vergo_core::config::AppConfig;
use vergo_core::result::AppResult;
use vergo_core::traits::{AuditSink, Clock, MembershipLookup};
use vergo_database::DatabasePool;
use vergo_database::repositories::{
    ActiveOrgRepository, AuditLogRepository, MembershipRepository, SessionRepository,
    UserRepository,
};

/// Storage collaborators behind the auth components.
#[derive(Clone)]
pub struct Backends {
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Refresh sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// Active organization per user.
    pub active_orgs: Arc<dyn ActiveOrgStore>,
    /// Organization membership lookup.
    pub memberships: Arc<dyn MembershipLookup>,
    /// Audit destination.
    pub audit: Arc<dyn AuditSink>,
}

impl Backends {
    /// PostgreSQL-backed collaborators sharing one pool.
    pub fn postgres(db: &DatabasePool, clock: Arc<dyn Clock>) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgUserStore::new(UserRepository::new(pool.clone()))),
            sessions: Arc::new(PgSessionStore::new(
                SessionRepository::new(pool.clone()),
                Arc::clone(&clock),
            )),
            active_orgs: Arc::new(PgActiveOrgStore::new(
                ActiveOrgRepository::new(pool.clone()),
                clock,
            )),
            memberships: Arc::new(PgMembershipLookup::new(MembershipRepository::new(
                pool.clone(),
            ))),
            audit: Arc::new(PgAuditSink::new(AuditLogRepository::new(pool))),
        }
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, absent when running on in-memory backends.
    pub db: Option<DatabasePool>,
    /// Signup, login and user lookup.
    pub identity: Arc<IdentityService>,
    /// Credential issuance, rotation and revocation.
    pub session_manager: Arc<SessionManager>,
    /// Bearer, tenant and role stages.
    pub gate: Arc<AuthorizationGate>,
    /// Active organization reads.
    pub tenancy: Arc<TenancyResolver>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("server", &self.config.server)
            .field("has_db", &self.db.is_some())
            .finish()
    }
}

impl AppState {
    /// Wires the auth components over the given backends.
    pub fn new(
        config: AppConfig,
        db: Option<DatabasePool>,
        backends: Backends,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let auth = &config.auth;
        auth.validate()?;

        let hasher = Arc::new(PasswordHasher::new(auth)?);
        let encoder = Arc::new(JwtEncoder::new(auth, Arc::clone(&clock))?);
        let decoder = Arc::new(JwtDecoder::new(auth, Arc::clone(&clock)));

        let identity = Arc::new(IdentityService::new(
            backends.users,
            hasher,
            PasswordValidator::new(auth),
            Arc::clone(&clock),
        ));
        let tenancy = Arc::new(TenancyResolver::new(backends.active_orgs));
        let gate = Arc::new(AuthorizationGate::new(
            Arc::clone(&decoder),
            backends.memberships,
            Arc::clone(&tenancy),
        ));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&identity),
            encoder,
            decoder,
            backends.sessions,
            backends.audit,
            clock,
        ));

        Ok(Self {
            config: Arc::new(config),
            db,
            identity,
            session_manager,
            gate,
            tenancy,
            started_at: Instant::now(),
        })
    }
}
