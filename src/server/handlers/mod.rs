//! HTTP functions mounted under `/api`

pub mod branding;
pub mod image;
pub mod logo;
pub mod payment_email;
pub mod payments;
pub mod vendor_auth;

use axum::Json;
use axum::http::{Method, Uri};
use serde_json::{Value, json};

use crate::core::error::{AppError, RequestError};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "julinemart-backend"
    }))
}

/// Fallback for a known route hit with the wrong method
pub async fn method_not_allowed(method: Method) -> AppError {
    RequestError::MethodNotAllowed {
        method: method.to_string(),
    }
    .into()
}

pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found("route", uri.path())
}
