//! `POST /api/create-vendor-auth`
//!
//! Creates a login for a vendor, or finds the existing one, and mails a
//! password reset link either way.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::{AppError, ConfigError, UpstreamError, ValidationError};
use crate::core::{CreateUserOutcome, NewVendorUser};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVendorAuthRequest {
    #[serde(default)]
    pub vendor_code: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    #[validate(email(message = "not a valid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreateVendorAuthResponse {
    pub success: bool,
    pub vendor_code: String,
    pub vendor_name: String,
    pub email: String,
    #[serde(rename = "authCreated")]
    pub auth_created: bool,
    #[serde(rename = "userExists")]
    pub user_exists: bool,
    #[serde(rename = "emailSent")]
    pub email_sent: bool,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
    pub message: String,
}

fn outcome_message(auth_created: bool, email_sent: bool, email: &str) -> String {
    match (auth_created, email_sent) {
        (true, true) => format!("New vendor created and invitation email sent to {}", email),
        (true, false) => "Vendor created but email failed - check auth email settings".to_string(),
        (false, true) => format!(
            "Vendor already exists, password reset email sent to {}",
            email
        ),
        (false, false) => "Vendor exists but email failed - check auth email settings".to_string(),
    }
}

pub async fn create_vendor_auth(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateVendorAuthRequest>,
) -> Result<Json<CreateVendorAuthResponse>, AppError> {
    let blank = [&request.vendor_code, &request.vendor_name, &request.email]
        .iter()
        .any(|field| field.trim().is_empty());
    if blank {
        return Err(ValidationError::MissingFields {
            message: "Missing required fields: vendor_code, vendor_name, email".to_string(),
        }
        .into());
    }

    if let Err(errors) = request.validate() {
        let message = errors
            .field_errors()
            .get("email")
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| errors.to_string());
        return Err(ValidationError::FieldError {
            field: "email".to_string(),
            message,
        }
        .into());
    }

    let Some(auth_admin) = state.auth_admin.as_ref() else {
        tracing::error!("create-vendor-auth called without auth admin credentials");
        return Err(ConfigError::MissingSetting {
            setting: "auth admin credentials".to_string(),
        }
        .into());
    };

    let user = NewVendorUser {
        email: request.email.trim().to_lowercase(),
        vendor_code: request.vendor_code.trim().to_uppercase(),
        vendor_name: request.vendor_name.trim().to_string(),
    };
    let redirect_url = state.config.site.reset_password_url();

    tracing::info!(vendor_code = %user.vendor_code, email = %user.email, "Creating vendor login");

    let outcome = auth_admin
        .create_user(&user)
        .await
        .map_err(|e| UpstreamError::Auth {
            message: e.to_string(),
        })?;

    let (auth_created, user_exists, user_id) = match outcome {
        CreateUserOutcome::Created { user_id } => {
            tracing::info!(user_id = %user_id, "Auth user created");
            (true, false, Some(user_id))
        }
        CreateUserOutcome::AlreadyExists => {
            tracing::info!(email = %user.email, "User already exists, sending password reset");
            (false, true, None)
        }
    };

    let email_sent = match auth_admin
        .send_password_reset(&user.email, &redirect_url)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(email = %user.email, "Password reset email failed: {}", e);
            false
        }
    };

    Ok(Json(CreateVendorAuthResponse {
        success: true,
        message: outcome_message(auth_created, email_sent, &user.email),
        vendor_code: user.vendor_code,
        vendor_name: user.vendor_name,
        email: user.email,
        auth_created,
        user_exists,
        email_sent,
        user_id,
        redirect_url,
    }))
}
