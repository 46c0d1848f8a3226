//! Unified application error types for Vergo.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Failures whose cause must stay
//! hidden from callers (`InvalidCredentials`, `InvalidToken`,
//! `InvalidSession`) are payload-free kinds with fixed messages: their
//! constructors take no arguments, so no reason can leak through them.

use std::fmt;
use thiserror::Error;

/// Why an authenticated, tenanted request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForbiddenReason {
    /// The user holds no membership in the selected organization.
    NotAMember,
    /// The bound role ranks below the route's threshold, or no role is bound.
    InsufficientRole,
}

impl ForbiddenReason {
    /// Machine-readable code for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAMember => "not_a_member",
            Self::InsufficientRole => "insufficient_role",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed input at the transport boundary.
    InvalidPayload,
    /// Signup or login identity failure. Never says which part was wrong.
    InvalidCredentials,
    /// Signup conflict on an already registered email.
    EmailInUse,
    /// No usable bearer credential was presented.
    Unauthorized,
    /// Token failed structural, signature, algorithm, kind, or expiry checks.
    InvalidToken,
    /// Refresh session is absent, revoked, expired, or does not match.
    InvalidSession,
    /// Neither a tenant selector nor a persisted active organization exists.
    MissingTenant,
    /// Tenancy or role check refused the request.
    Forbidden(ForbiddenReason),
    /// The requested user or organization was not found.
    NotFound,
    /// An internal server error occurred (crypto, wiring, invariants).
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
}

impl ErrorKind {
    /// Whether this kind is an internal fault rather than a caller error.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Database | Self::Configuration)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload => write!(f, "INVALID_PAYLOAD"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::EmailInUse => write!(f, "EMAIL_IN_USE"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::InvalidToken => write!(f, "INVALID_TOKEN"),
            Self::InvalidSession => write!(f, "INVALID_SESSION"),
            Self::MissingTenant => write!(f, "MISSING_TENANT"),
            Self::Forbidden(reason) => write!(f, "FORBIDDEN({reason})"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout Vergo.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPayload, message)
    }

    /// Create the generic credential failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an email conflict error.
    pub fn email_in_use() -> Self {
        Self::new(ErrorKind::EmailInUse, "Email already in use")
    }

    /// Create a missing-bearer error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create the generic token failure.
    pub fn invalid_token() -> Self {
        Self::new(ErrorKind::InvalidToken, "Invalid token")
    }

    /// Create the generic session failure.
    pub fn invalid_session() -> Self {
        Self::new(ErrorKind::InvalidSession, "Invalid session")
    }

    /// Create a missing-tenant error.
    pub fn missing_tenant() -> Self {
        Self::new(
            ErrorKind::MissingTenant,
            "No organization selected and no active organization set",
        )
    }

    /// Create a forbidden error with the given reason.
    pub fn forbidden(reason: ForbiddenReason) -> Self {
        let message = match reason {
            ForbiddenReason::NotAMember => "Not a member of this organization",
            ForbiddenReason::InsufficientRole => "Insufficient role for this operation",
        };
        Self::new(ErrorKind::Forbidden(reason), message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::InvalidPayload,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reason_errors_share_one_message() {
        assert_eq!(AppError::invalid_session().message, "Invalid session");
        assert_eq!(AppError::invalid_token().message, "Invalid token");
        assert_eq!(
            AppError::invalid_credentials().kind,
            ErrorKind::InvalidCredentials
        );
    }

    #[test]
    fn test_forbidden_reason_codes() {
        let err = AppError::forbidden(ForbiddenReason::InsufficientRole);
        assert_eq!(
            err.kind,
            ErrorKind::Forbidden(ForbiddenReason::InsufficientRole)
        );
        assert_eq!(ForbiddenReason::NotAMember.as_str(), "not_a_member");
    }

    #[test]
    fn test_internal_kinds() {
        assert!(ErrorKind::Database.is_internal());
        assert!(ErrorKind::Configuration.is_internal());
        assert!(!ErrorKind::InvalidSession.is_internal());
    }
}
