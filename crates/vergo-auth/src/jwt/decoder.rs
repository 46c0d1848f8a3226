//! JWT token verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use vergo_core::config::AuthConfig;
use vergo_core::error::AppError;
use vergo_core::traits::Clock;

use super::claims::{Claims, TokenKind};

/// Seconds of clock skew tolerated on `exp`.
const LEEWAY_SECONDS: i64 = 5;

/// Verifies access and refresh tokens.
///
/// Every failure collapses into [`AppError::invalid_token`]; the cause is
/// only visible in debug logs.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Verifies `token` as a token of kind `expected`.
    ///
    /// Checks, in order: signature under the key for `expected` with the
    /// algorithm pinned to HS256, the kind claim, the session claim shape and
    /// expiry against the clock.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let key = match expected {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AppError::invalid_token()
            })?
            .claims;

        if claims.typ != expected {
            debug!(expected = ?expected, actual = ?claims.typ, "Token kind mismatch");
            return Err(AppError::invalid_token());
        }

        let sid_ok = match expected {
            TokenKind::Access => claims.sid.is_none(),
            TokenKind::Refresh => claims.sid.is_some(),
        };
        if !sid_ok {
            debug!("Token session claim does not match its kind");
            return Err(AppError::invalid_token());
        }

        if self.clock.now().timestamp() >= claims.exp + LEEWAY_SECONDS {
            debug!(user_id = %claims.sub, "Token expired");
            return Err(AppError::invalid_token());
        }

        Ok(claims)
    }

    /// Verifies an access token.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenKind::Access)
    }

    /// Verifies a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;
    use vergo_core::error::ErrorKind;
    use vergo_core::traits::ManualClock;
    use vergo_core::types::id::UserId;

    fn setup() -> (JwtEncoder, JwtDecoder, ManualClock, AuthConfig) {
        let config = AuthConfig::with_secrets("access-secret", "refresh-secret");
        let clock = ManualClock::default();
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        (
            JwtEncoder::new(&config, shared.clone()).unwrap(),
            JwtDecoder::new(&config, shared),
            clock,
            config,
        )
    }

    #[test]
    fn test_access_round_trip_has_no_session() {
        let (encoder, decoder, _, _) = setup();
        let user = UserId::new();
        let issued = encoder.issue_access(user).unwrap();
        let claims = decoder.verify_access(&issued.token).unwrap();
        assert_eq!(claims.sub, user);
        assert!(claims.sid.is_none());
        assert_eq!(claims.typ, TokenKind::Access);
    }

    #[test]
    fn test_refresh_carries_session() {
        let (encoder, decoder, _, _) = setup();
        let issued = encoder.issue_refresh(UserId::new()).unwrap();
        let claims = decoder.verify_refresh(&issued.token).unwrap();
        assert_eq!(claims.sid, Some(issued.session_id));
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_key_separation() {
        let (encoder, decoder, _, _) = setup();
        let user = UserId::new();
        let access = encoder.issue_access(user).unwrap();
        let refresh = encoder.issue_refresh(user).unwrap();
        let err = decoder.verify_refresh(&access.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
        assert!(decoder.verify_access(&refresh.token).is_err());
    }

    #[test]
    fn test_expired_access_token() {
        let (encoder, decoder, clock, _) = setup();
        let issued = encoder.issue_access(UserId::new()).unwrap();
        clock.advance(Duration::minutes(14));
        assert!(decoder.verify_access(&issued.token).is_ok());
        clock.advance(Duration::minutes(2));
        let err = decoder.verify_access(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let (encoder, decoder, _, _) = setup();
        let mut token = encoder.issue_access(UserId::new()).unwrap().token;
        token.push('x');
        assert!(decoder.verify_access(&token).is_err());
        assert!(decoder.verify_access("not.a.jwt").is_err());
        assert!(decoder.verify_access("").is_err());
    }

    #[test]
    fn test_wrong_kind_under_right_key_rejected() {
        let (_, decoder, clock, config) = setup();
        let now = clock.now();
        let claims = Claims {
            sub: UserId::new(),
            typ: TokenKind::Refresh,
            sid: None,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();
        assert!(decoder.verify_access(&token).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let (_, decoder, clock, config) = setup();
        let now = clock.now();
        let claims = Claims {
            sub: UserId::new(),
            typ: TokenKind::Access,
            sid: None,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();
        assert!(decoder.verify_access(&token).is_err());
    }
}
