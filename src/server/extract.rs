//! Request extractors that reject with [`AppError`] instead of axum's plain-text rejections

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::core::error::{AppError, ValidationError};

/// JSON request body; malformed input becomes a 400 `INVALID_JSON` error body
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid(e.body_text()))?;

        let value = serde_json::from_slice(&bytes).map_err(|e| ValidationError::InvalidJson {
            message: e.to_string(),
        })?;
        Ok(JsonBody(value))
    }
}
