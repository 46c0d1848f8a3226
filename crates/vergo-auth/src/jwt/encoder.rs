//! JWT token creation with separate access and refresh keys.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vergo_core::config::AuthConfig;
use vergo_core::error::{AppError, ErrorKind};
use vergo_core::traits::Clock;
use vergo_core::types::id::{SessionId, UserId};

use super::claims::{Claims, TokenKind};

/// An access token together with a freshly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// A signed refresh token and the session it names.
#[derive(Debug, Clone)]
pub struct IssuedRefresh {
    /// The signed token.
    pub token: String,
    /// Session ID carried in the `sid` claim.
    pub session_id: SessionId,
    /// Expiry, truncated to whole seconds to match the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

/// An access token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedAccess {
    /// The signed token.
    pub token: String,
    /// Expiry, truncated to whole seconds.
    pub expires_at: DateTime<Utc>,
}

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// TTLs that do not fit a `chrono::Duration` are a `Configuration` error.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let access_ttl = i64::try_from(config.access_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| AppError::configuration("Access token TTL is out of range"))?;
        let refresh_ttl = i64::try_from(config.refresh_ttl_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(|| AppError::configuration("Refresh token TTL is out of range"))?;

        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
            clock,
        })
    }

    /// Signs an access token for `user_id`.
    pub fn issue_access(&self, user_id: UserId) -> Result<IssuedAccess, AppError> {
        let now = self.clock.now();
        let exp = expiry(now, self.access_ttl)?;
        let claims = Claims {
            sub: user_id,
            typ: TokenKind::Access,
            sid: None,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = self.sign(&claims, &self.access_key)?;
        Ok(IssuedAccess {
            token,
            expires_at: truncate(exp),
        })
    }

    /// Signs a refresh token for `user_id` under a new session ID.
    pub fn issue_refresh(&self, user_id: UserId) -> Result<IssuedRefresh, AppError> {
        let now = self.clock.now();
        let exp = expiry(now, self.refresh_ttl)?;
        let session_id = SessionId::new();
        let claims = Claims {
            sub: user_id,
            typ: TokenKind::Refresh,
            sid: Some(session_id),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let token = self.sign(&claims, &self.refresh_key)?;
        Ok(IssuedRefresh {
            token,
            session_id,
            expires_at: truncate(exp),
        })
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String, AppError> {
        encode(&Header::default(), claims, key)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to sign token", e))
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AppError> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| AppError::internal("Token expiry overflows the calendar"))
}

fn truncate(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}
