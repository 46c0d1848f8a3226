//! JSON body extractor with `validator` checks.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use vergo_core::error::AppError;

use crate::error::ApiError;

/// Deserializes a JSON body and runs its `Validate` rules.
///
/// Malformed JSON and failed validation both reject as `InvalidPayload`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_payload(e.body_text()))?;
        value
            .validate()
            .map_err(|e| AppError::invalid_payload(e.to_string()))?;
        Ok(Self(value))
    }
}
