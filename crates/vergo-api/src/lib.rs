//! # vergo-api
//!
//! HTTP API layer for Vergo built on Axum.
//!
//! Provides the auth, context and tenant-scoped endpoints, the middleware
//! that runs the authorization gate (bearer, tenant, role), request
//! logging, CORS, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::{AppState, Backends};
