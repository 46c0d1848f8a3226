//! Refresh session persistence and the credential flows built on it.

pub mod hash;
pub mod manager;
pub mod memory;
pub mod store;

pub use hash::hash_token;
pub use manager::{AuthOutcome, SessionManager};
pub use memory::MemorySessionStore;
pub use store::{NewSession, PgSessionStore, SessionInfo, SessionStore};
