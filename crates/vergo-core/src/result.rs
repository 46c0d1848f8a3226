//! Convenience result type alias for Vergo.

use crate::error::AppError;

/// A specialized `Result` type for Vergo operations.
pub type AppResult<T> = Result<T, AppError>;
