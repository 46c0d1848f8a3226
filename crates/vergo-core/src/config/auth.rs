//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound for `access_ttl_minutes` (one day).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Upper bound for `refresh_ttl_days`.
pub const MAX_REFRESH_TTL_DAYS: u64 = 365;

/// Token, password-hashing, and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token (session) TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Minimum password length accepted at signup.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2id lane count.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("password_min_length", &self.password_min_length)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .finish()
    }
}

impl AuthConfig {
    /// Builds a config with default TTLs and hashing costs for the given secrets.
    pub fn with_secrets(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }

    /// Rejects configurations that would break key separation or issue dead tokens.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::configuration("Token secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "Access and refresh token secrets must differ",
            ));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("Token TTLs must be positive"));
        }
        if self.access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "access_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "refresh_ttl_days must not exceed {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        Ok(())
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    14
}

fn default_password_min() -> usize {
    6
}

fn default_argon2_memory() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_secrets_rejected() {
        let config = AuthConfig::with_secrets("same", "same");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = AuthConfig::with_secrets("", "refresh");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_ttls_rejected() {
        let mut config = AuthConfig::with_secrets("access", "refresh");
        config.refresh_ttl_days = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AuthConfig::with_secrets("access", "refresh");
        config.access_ttl_minutes = MAX_ACCESS_TTL_MINUTES + 1;
        assert!(config.validate().is_err());

        let mut config = AuthConfig::with_secrets("access", "refresh");
        config.refresh_ttl_days = MAX_REFRESH_TTL_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::with_secrets("access-key", "refresh-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("access-key"));
        assert!(!rendered.contains("refresh-key"));
    }

    #[test]
    fn test_distinct_secrets_accepted() {
        let config = AuthConfig::with_secrets("access", "refresh");
        assert!(config.validate().is_ok());
        assert_eq!(config.access_ttl_minutes, 15);
        assert_eq!(config.refresh_ttl_days, 14);
    }
}
