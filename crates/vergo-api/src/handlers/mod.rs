//! HTTP request handlers.

pub mod auth;
pub mod context;
pub mod health;
pub mod me;
pub mod orgs;
pub mod stubs;
