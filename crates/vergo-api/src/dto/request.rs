//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use vergo_core::types::id::OrgId;

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address.
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body for refresh and logout.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Active organization selection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetContextRequest {
    /// Organization to make active.
    pub org_id: OrgId,
}
