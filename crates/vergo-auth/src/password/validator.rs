//! Password policy for new passwords.

use vergo_core::config::AuthConfig;
use vergo_core::error::AppError;

/// Enforces the configured minimum password length.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Rejects passwords shorter than the minimum, counted in characters.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_payload(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }
}
