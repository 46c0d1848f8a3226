//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod tenant;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use tenant::TenantScope;

/// Header carrying the explicit tenant selector.
pub const ORG_HEADER: &str = "x-org-id";
