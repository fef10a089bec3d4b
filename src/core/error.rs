//! Typed error handling for the marketplace backend
//!
//! Every HTTP function maps its failures onto [`AppError`], which knows its
//! status code, a stable machine-readable code and how to render itself as a
//! JSON body. Handlers can therefore return `Result<_, AppError>` and let
//! axum do the rest.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: bad or missing input (400)
//! - [`RequestError`]: routing level problems such as unknown resources (404)
//!   or unsupported methods (405)
//! - [`StoreError`]: row store and blob store failures (500)
//! - [`UpstreamError`]: failures of third-party services we forward to
//! - [`ConfigError`]: missing or invalid configuration (500)
//!
//! Structured validation of payment data does not go through this type at
//! all; see [`crate::payments::validation::ValidationOutcome`].
//!
//! # Example
//!
//! ```rust,ignore
//! async fn lookup(store: &dyn PaymentStore, id: &str) -> Result<VendorPayment, AppError> {
//!     store
//!         .find_payment(id)
//!         .await
//!         .map_err(AppError::store)?
//!         .ok_or_else(|| AppError::not_found("payment", id))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type surfaced by HTTP functions
#[derive(Debug)]
pub enum AppError {
    /// Input validation errors
    Validation(ValidationError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Row store or blob store errors
    Store(StoreError),

    /// Errors from third-party services (image hosts, mail, auth admin)
    Upstream(UpstreamError),

    /// Configuration errors
    Config(ConfigError),

    /// Unexpected failures
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Request(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Upstream(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Request(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::Upstream(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Shorthand for a missing resource
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        AppError::Request(RequestError::NotFound {
            resource: resource.into(),
            id: id.into(),
        })
    }

    /// Shorthand for a generic bad-request message
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::Invalid {
            message: message.into(),
        })
    }

    /// Wrap an adapter failure coming from a row store or blob store
    pub fn store(err: anyhow::Error) -> Self {
        AppError::Store(StoreError::Query {
            message: err.to_string(),
        })
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Request(e) => e.status_code(),
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(e) => e.status_code(),
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(e) => e.error_code(),
            AppError::Request(e) => e.error_code(),
            AppError::Store(_) => "STORE_ERROR",
            AppError::Upstream(e) => e.error_code(),
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Request(RequestError::NotFound { resource, id }) => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            AppError::Upstream(UpstreamError::Status { url, status }) => Some(serde_json::json!({
                "url": url,
                "status": status,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        } else {
            tracing::debug!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more required fields were absent or blank
    MissingFields { message: String },

    /// A single field failed a format check
    FieldError { field: String, message: String },

    /// Request body was not valid JSON
    InvalidJson { message: String },

    /// Anything else that makes the request unusable
    Invalid { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields { message } => write!(f, "{}", message),
            ValidationError::FieldError { field, message } => {
                write!(f, "Invalid {}: {}", field, message)
            }
            ValidationError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            ValidationError::Invalid { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields { .. } => "MISSING_FIELDS",
            ValidationError::FieldError { .. } => "INVALID_FIELD",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::Invalid { .. } => "VALIDATION_ERROR",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// The addressed resource does not exist
    NotFound { resource: String, id: String },

    /// The route exists but not for this method
    MethodNotAllowed { method: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NotFound { resource, .. } => {
                let mut chars = resource.chars();
                match chars.next() {
                    Some(first) => write!(
                        f,
                        "{}{} not found",
                        first.to_uppercase(),
                        chars.as_str()
                    ),
                    None => write!(f, "Not found"),
                }
            }
            RequestError::MethodNotAllowed { .. } => write!(f, "Method not allowed"),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RequestError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::NotFound { .. } => "NOT_FOUND",
            RequestError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        AppError::Request(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors related to the row store and blob store
#[derive(Debug)]
pub enum StoreError {
    /// A read or write failed
    Query { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Query { message } => write!(f, "Store error: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

// =============================================================================
// Upstream Errors
// =============================================================================

/// Errors from services this backend forwards to
#[derive(Debug)]
pub enum UpstreamError {
    /// The remote answered with a non-success status
    Status { url: String, status: u16 },

    /// The remote could not be reached or the body could not be read
    Transport { message: String },

    /// The remote answered but the content is unusable
    InvalidContent { message: String },

    /// Mail could not be handed to the mailer
    Delivery { message: String },

    /// The auth admin API refused an operation
    Auth { message: String },
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status { status, .. } => {
                write!(f, "Failed to fetch image. Status: {}", status)
            }
            UpstreamError::Transport { message } => {
                write!(f, "Error fetching image: {}", message)
            }
            UpstreamError::InvalidContent { message } => write!(f, "{}", message),
            UpstreamError::Delivery { message } => {
                write!(f, "Failed to send email: {}", message)
            }
            UpstreamError::Auth { message } => {
                write!(f, "Failed to create auth user: {}", message)
            }
        }
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            UpstreamError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            UpstreamError::InvalidContent { .. } => StatusCode::BAD_REQUEST,
            UpstreamError::Delivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            UpstreamError::Auth { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UpstreamError::Status { .. } => "UPSTREAM_STATUS",
            UpstreamError::Transport { .. } => "UPSTREAM_UNREACHABLE",
            UpstreamError::InvalidContent { .. } => "UPSTREAM_INVALID_CONTENT",
            UpstreamError::Delivery { .. } => "MAIL_DELIVERY_FAILED",
            UpstreamError::Auth { .. } => "AUTH_ADMIN_FAILED",
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A setting needed by this operation is not configured
    MissingSetting { setting: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingSetting { setting } => {
                write!(f, "Server configuration error - missing {}", setting)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_capitalised() {
        let err = AppError::not_found("payment", "42");
        assert_eq!(err.to_string(), "Payment not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_status_is_propagated() {
        let err = AppError::Upstream(UpstreamError::Status {
            url: "http://img.example/x.png".to_string(),
            status: 403,
        });
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Failed to fetch image. Status: 403");
    }

    #[test]
    fn test_upstream_status_carries_details() {
        let err = AppError::Upstream(UpstreamError::Status {
            url: "http://img.example/x.png".to_string(),
            status: 404,
        });
        let response = err.to_response();
        assert_eq!(response.code, "UPSTREAM_STATUS");
        assert_eq!(
            response.details,
            Some(serde_json::json!({ "url": "http://img.example/x.png", "status": 404 }))
        );
    }

    #[test]
    fn test_validation_codes() {
        let err = AppError::from(ValidationError::InvalidJson {
            message: "EOF while parsing a value".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_JSON");
        assert_eq!(AppError::invalid("Invalid email type").error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_missing_setting_is_server_error() {
        let err = AppError::Config(ConfigError::MissingSetting {
            setting: "row store credentials".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Server configuration error"));
    }
}
