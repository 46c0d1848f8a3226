//! # vergo-auth
//!
//! Authentication, session and tenancy handling for Vergo.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token issuance and verification with separate keys
//! - `password`: Argon2id password hashing and length policy
//! - `session`: refresh session stores and the signup/login/refresh/logout flows
//! - `identity`: user records and credential checks
//! - `tenancy`: persisted active organization per user
//! - `rbac`: organization role thresholds
//! - `gate`: bearer, tenant and role stages applied to every protected request
//! - `membership`: membership lookup adapters
//! - `audit`: audit sinks

pub mod audit;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod membership;
pub mod password;
pub mod rbac;
pub mod session;
pub mod tenancy;

pub use audit::{MemoryAuditSink, PgAuditSink, TracingAuditSink};
pub use gate::{AuthorizationGate, TenantContext};
pub use identity::{IdentityService, MemoryUserStore, PgUserStore, UserStore};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenKind, TokenPair};
pub use membership::{MemoryMembershipDirectory, PgMembershipLookup};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RbacEnforcer;
pub use session::{MemorySessionStore, PgSessionStore, SessionManager, SessionStore};
pub use tenancy::{ActiveOrgStore, MemoryActiveOrgStore, PgActiveOrgStore, TenancyResolver};
