//! User records and credential verification.

pub mod service;
pub mod store;

pub use service::{IdentityService, normalize_email};
pub use store::{MemoryUserStore, PgUserStore, UserStore};
