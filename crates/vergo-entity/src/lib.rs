//! # vergo-entity
//!
//! Domain entity models for Vergo. Every struct in this crate represents a
//! database table row or a domain value object. Row types derive
//! `sqlx::FromRow` and use the typed identifiers from `vergo-core`.

pub mod context;
pub mod membership;
pub mod session;
pub mod user;
