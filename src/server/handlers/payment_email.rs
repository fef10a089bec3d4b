//! `POST /api/send-payment-email`

use axum::Json;
use axum::extract::State;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::OutgoingEmail;
use crate::core::error::{AppError, UpstreamError, ValidationError};
use crate::payments::{EmailData, EmailKind};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPaymentEmailRequest {
    /// Row ids arrive as numbers from some pages and strings from others
    #[serde(default)]
    pub payment_id: Option<Value>,
    #[serde(default)]
    pub email_type: Option<String>,
}

impl SendPaymentEmailRequest {
    fn payment_id(&self) -> Option<String> {
        match self.payment_id.as_ref()? {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    fn email_type(&self) -> Option<&str> {
        self.email_type.as_deref().filter(|t| !t.trim().is_empty())
    }
}

pub async fn send_payment_email(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SendPaymentEmailRequest>,
) -> Result<Json<Value>, AppError> {
    let (Some(payment_id), Some(email_type)) = (request.payment_id(), request.email_type()) else {
        return Err(ValidationError::MissingFields {
            message: "paymentId and emailType are required".to_string(),
        }
        .into());
    };

    tracing::info!(payment_id = %payment_id, email_type, "send-payment-email invoked");

    let kind: EmailKind = email_type
        .parse()
        .map_err(|_| AppError::invalid("Invalid email type"))?;

    let payment = state
        .payments
        .find_payment(&payment_id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| {
            tracing::warn!(payment_id = %payment_id, "Payment lookup failed");
            AppError::not_found("payment", payment_id.as_str())
        })?;

    let to = payment
        .vendor_email()
        .ok_or_else(|| AppError::invalid("Vendor email not found"))?
        .to_string();

    let data = EmailData::from_payment(kind, &payment);
    let rendered = state
        .emails
        .render(kind, &data, Utc::now().year())
        .map_err(|e| AppError::Internal(format!("Failed to render email: {}", e)))?;

    let email = OutgoingEmail {
        to,
        subject: rendered.subject,
        html: rendered.html,
    };
    state
        .mailer
        .send(&email)
        .await
        .map_err(|e| UpstreamError::Delivery {
            message: e.to_string(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Email sent successfully",
        "sentTo": email.to,
    })))
}
