//! Persisted "last active organization" per user.

pub mod resolver;
pub mod store;

pub use resolver::TenancyResolver;
pub use store::{ActiveOrgStore, MemoryActiveOrgStore, PgActiveOrgStore};
