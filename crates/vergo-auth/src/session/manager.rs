//! Credential flows: signup, login, refresh rotation, logout.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use vergo_core::error::AppError;
use vergo_core::events::{AuditAction, AuditEvent};
use vergo_core::result::AppResult;
use vergo_core::traits::audit::record_best_effort;
use vergo_core::traits::{AuditSink, Clock};
use vergo_core::types::id::{OrgId, UserId};
use vergo_entity::user::User;

use crate::identity::IdentityService;
use crate::jwt::{JwtDecoder, JwtEncoder, TokenPair};

use super::store::{NewSession, SessionStore};

/// Result of a successful signup or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    /// The authenticated user.
    pub user: User,
    /// Freshly issued credentials.
    pub tokens: TokenPair,
}

/// Issues, rotates and revokes credential pairs.
#[derive(Clone)]
pub struct SessionManager {
    identity: Arc<IdentityService>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    sessions: Arc<dyn SessionStore>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("encoder", &self.encoder)
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        identity: Arc<IdentityService>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        sessions: Arc<dyn SessionStore>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            encoder,
            decoder,
            sessions,
            audit,
            clock,
        }
    }

    /// Registers an account and issues its first credential pair.
    pub async fn signup(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let user = self.identity.signup(email, password).await?;
        let tokens = self.issue_pair(user.id).await?;
        self.audit(AuditEvent::user(self.clock.now(), user.id, AuditAction::UserSignedUp))
            .await;
        Ok(AuthOutcome { user, tokens })
    }

    /// Checks credentials and issues a new credential pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let user = self.identity.login(email, password).await?;
        let tokens = self.issue_pair(user.id).await?;
        info!(user_id = %user.id, "Login successful");
        self.audit(AuditEvent::user(self.clock.now(), user.id, AuditAction::UserLoggedIn))
            .await;
        Ok(AuthOutcome { user, tokens })
    }

    /// Exchanges a refresh token for a new pair. Each refresh token succeeds
    /// at most once.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        // Step 1: verify signature, kind and expiry
        let claims = self.decoder.verify_refresh(refresh_token)?;
        let session_id = claims.sid.ok_or_else(AppError::invalid_token)?;

        // Step 2: the session must be live and owned by the token subject
        let info = self
            .sessions
            .validate(session_id, refresh_token)
            .await?
            .ok_or_else(AppError::invalid_session)?;
        if info.user_id != claims.sub {
            warn!(session_id = %session_id, "Refresh session owner mismatch");
            return Err(AppError::invalid_session());
        }

        // Step 3: issue the replacement pair
        let access = self.encoder.issue_access(claims.sub)?;
        let next = self.encoder.issue_refresh(claims.sub)?;

        // Step 4: revoke the old session and save the new one atomically
        let rotated = self
            .sessions
            .rotate(
                session_id,
                refresh_token,
                NewSession {
                    id: next.session_id,
                    user_id: claims.sub,
                    raw_token: next.token.clone(),
                    expires_at: next.expires_at,
                    rotated_from: Some(session_id),
                },
            )
            .await?;
        if !rotated {
            debug!(session_id = %session_id, "Lost rotation race");
            return Err(AppError::invalid_session());
        }

        info!(user_id = %claims.sub, session_id = %next.session_id, "Session rotated");
        self.audit(AuditEvent::session(
            self.clock.now(),
            claims.sub,
            session_id,
            AuditAction::SessionRotated,
        ))
        .await;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: next.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: next.expires_at,
        })
    }

    /// Revokes the session behind `refresh_token`. Invalid tokens are ignored
    /// so the outcome reveals nothing about them.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let claims = match self.decoder.verify_refresh(refresh_token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("Logout with unusable refresh token ignored");
                return Ok(());
            }
        };
        let Some(session_id) = claims.sid else {
            return Ok(());
        };

        self.sessions.revoke(session_id).await?;
        info!(user_id = %claims.sub, session_id = %session_id, "Session revoked");
        self.audit(AuditEvent::session(
            self.clock.now(),
            claims.sub,
            session_id,
            AuditAction::SessionRevoked,
        ))
        .await;
        Ok(())
    }

    /// Revokes every refresh session of `user_id`. Outstanding access tokens
    /// stay valid until they expire.
    pub async fn logout_all(&self, user_id: UserId) -> AppResult<()> {
        self.sessions.revoke_all(user_id).await?;
        info!(user_id = %user_id, "All sessions revoked");
        self.audit(AuditEvent::user(
            self.clock.now(),
            user_id,
            AuditAction::AllSessionsRevoked,
        ))
        .await;
        Ok(())
    }

    /// Records an active organization change.
    pub async fn record_active_org_change(&self, user_id: UserId, org_id: OrgId) {
        let event = AuditEvent::new(
            self.clock.now(),
            Some(user_id),
            AuditAction::ActiveOrgChanged,
            "org",
            Some(org_id.to_string()),
        )
        .in_org(org_id);
        self.audit(event).await;
    }

    async fn issue_pair(&self, user_id: UserId) -> AppResult<TokenPair> {
        let access = self.encoder.issue_access(user_id)?;
        let refresh = self.encoder.issue_refresh(user_id)?;

        self.sessions
            .save(NewSession {
                id: refresh.session_id,
                user_id,
                raw_token: refresh.token.clone(),
                expires_at: refresh.expires_at,
                rotated_from: None,
            })
            .await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    async fn audit(&self, event: AuditEvent) {
        record_best_effort(self.audit.as_ref(), event).await;
    }
}
