//! Repository implementations for all Vergo entities.

pub mod active_org;
pub mod audit;
pub mod membership;
pub mod session;
pub mod user;

pub use active_org::ActiveOrgRepository;
pub use audit::AuditLogRepository;
pub use membership::MembershipRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
