//! Company logo blob: `get-logo`, `upload-logo`, `delete-logo`
//!
//! The stored value is whatever the admin page uploads, normally a data URI,
//! and is handed back verbatim as `text/plain`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use crate::core::error::AppError;
use crate::server::state::AppState;

pub async fn get_logo(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let key = &state.config.logo.store_key;
    let logo = state.blobs.get(key).await.map_err(AppError::store)?;

    match logo {
        Some(bytes) => Ok(([(CONTENT_TYPE, "text/plain")], bytes)),
        None => Err(AppError::not_found("logo", key.as_str())),
    }
}

pub async fn upload_logo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let key = &state.config.logo.store_key;
    state
        .blobs
        .put(key, body.to_vec())
        .await
        .map_err(AppError::store)?;

    tracing::info!(key = %key, bytes = body.len(), "Logo uploaded");
    Ok("Logo uploaded")
}

pub async fn delete_logo(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let key = &state.config.logo.store_key;
    state.blobs.delete(key).await.map_err(AppError::store)?;

    tracing::info!(key = %key, "Logo deleted");
    Ok("Logo deleted")
}
