//! # vergo-database
//!
//! PostgreSQL connection management, the embedded migration runner and
//! repositories for users, refresh sessions, memberships, the per-user
//! active organization and the audit log.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
