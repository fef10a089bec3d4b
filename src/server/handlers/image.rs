//! `GET /api/fetch-image?url=` proxies a remote image back as a data URI,
//! so the admin pages can embed logos from hosts that do not send CORS headers.

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::Deserialize;

use crate::config::ImageProxyConfig;
use crate::core::error::{AppError, UpstreamError, ValidationError};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchImageQuery {
    pub url: Option<String>,
}

/// The proxy fetches whatever host it is given unless `allowed_hosts` is set,
/// so an open deployment can be pointed at addresses only the server reaches.
fn parse_target(raw: Option<&str>, config: &ImageProxyConfig) -> Result<Url, AppError> {
    let raw = raw.map(str::trim).filter(|u| !u.is_empty()).ok_or_else(|| {
        ValidationError::MissingFields {
            message: "Missing URL parameter".to_string(),
        }
    })?;

    let url = Url::parse(raw).map_err(|e| ValidationError::FieldError {
        field: "url".to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::FieldError {
            field: "url".to_string(),
            message: "only http and https URLs can be fetched".to_string(),
        }
        .into());
    }

    let host = url.host_str().unwrap_or_default();
    if !config.allows_host(host) {
        return Err(ValidationError::FieldError {
            field: "url".to_string(),
            message: format!("host '{}' is not allowed", host),
        }
        .into());
    }
    Ok(url)
}

fn too_large(limit: usize) -> AppError {
    UpstreamError::InvalidContent {
        message: format!("Image exceeds the {} byte limit", limit),
    }
    .into()
}

pub async fn fetch_image(
    State(state): State<AppState>,
    Query(query): Query<FetchImageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let url = parse_target(query.url.as_deref(), &state.config.image_proxy)?;
    let limit = state.config.image_proxy.max_bytes;

    tracing::debug!(url = %url, "Fetching image");

    let transport = |e: reqwest::Error| UpstreamError::Transport {
        message: e.to_string(),
    };

    let mut response = state
        .http
        .get(url.clone())
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| ct.starts_with("image/"))
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::InvalidContent {
            message: "URL does not point to a valid image.".to_string(),
        })?;

    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large(limit));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(transport)? {
        if body.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }

    tracing::info!(url = %url, content_type = %content_type, bytes = body.len(), "Image proxied");

    let data_uri = format!("data:{};base64,{}", content_type, STANDARD.encode(&body));
    Ok(([(CONTENT_TYPE, "text/plain")], data_uri))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_target_must_be_present_and_http() {
        let config = ImageProxyConfig::default();
        let missing = parse_target(None, &config).unwrap_err();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.to_string(), "Missing URL parameter");

        assert!(parse_target(Some("   "), &config).is_err());
        assert!(parse_target(Some("ftp://files.example.com/logo.png"), &config).is_err());
        assert!(parse_target(Some("not a url"), &config).is_err());
        assert!(parse_target(Some("https://cdn.example.com/logo.png"), &config).is_ok());
    }

    #[test]
    fn test_target_host_must_be_allowed() {
        let config = ImageProxyConfig {
            allowed_hosts: vec!["cdn.example.com".to_string()],
            ..ImageProxyConfig::default()
        };
        assert!(parse_target(Some("https://cdn.example.com/logo.png"), &config).is_ok());

        let err = parse_target(Some("http://127.0.0.1:9000/admin"), &config).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid url: host '127.0.0.1' is not allowed");
        assert!(parse_target(Some("http://169.254.169.254/latest"), &config).is_err());
    }
}
