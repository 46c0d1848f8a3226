//! # vergo-core
//!
//! Core crate for Vergo. Contains configuration schemas, typed
//! identifiers, the audit event type, the traits through which the
//! identity layer talks to its collaborators, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Vergo crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
