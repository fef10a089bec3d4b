//! Payment helpers for the admin and vendor screens

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{AppError, ValidationError};
use crate::payments::export::default_filename;
use crate::payments::{
    Bank, BankAccount, ExportError, NextAction, PaymentBreakdown, PaymentDraft, PaymentStatus,
    Receipt, StatusMeta, ValidationOutcome, bank, calculate_breakdown, export_csv,
    generate_receipt, next_action, validate_bank_account, validate_payment_data,
};
use crate::server::extract::JsonBody;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BreakdownQuery {
    pub total: Option<String>,
}

pub async fn breakdown(
    Query(query): Query<BreakdownQuery>,
) -> Result<Json<PaymentBreakdown>, AppError> {
    let raw = query
        .total
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ValidationError::MissingFields {
            message: "total is required".to_string(),
        })?;

    let total: Decimal = raw.parse().map_err(|_| ValidationError::FieldError {
        field: "total".to_string(),
        message: format!("'{}' is not a decimal number", raw),
    })?;

    let breakdown = calculate_breakdown(total).map_err(|e| AppError::invalid(e.to_string()))?;
    Ok(Json(breakdown))
}

pub async fn list_banks() -> Json<&'static [Bank]> {
    Json(bank::all())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: PaymentStatus,
    #[serde(flatten)]
    pub meta: &'static StatusMeta,
    pub next_action: NextAction,
}

pub async fn list_statuses() -> Json<Vec<StatusEntry>> {
    Json(
        PaymentStatus::ALL
            .into_iter()
            .map(|status| StatusEntry {
                status,
                meta: status.meta(),
                next_action: next_action(status),
            })
            .collect(),
    )
}

pub async fn validate_payment(
    JsonBody(draft): JsonBody<PaymentDraft>,
) -> Json<ValidationOutcome> {
    Json(validate_payment_data(&draft))
}

pub async fn validate_account(
    JsonBody(account): JsonBody<BankAccount>,
) -> Json<ValidationOutcome> {
    Json(validate_bank_account(&account))
}

pub async fn receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, AppError> {
    let payment = state
        .payments
        .find_payment(&id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::not_found("payment", id.as_str()))?;

    Ok(Json(generate_receipt(
        &payment,
        None,
        Utc::now().date_naive(),
    )))
}

pub async fn export(
    JsonBody(rows): JsonBody<Vec<Map<String, Value>>>,
) -> Result<impl IntoResponse, AppError> {
    let csv = export_csv(&rows).map_err(|e| {
        if matches!(e, ExportError::Empty) {
            AppError::invalid(e.to_string())
        } else {
            AppError::Internal(e.to_string())
        }
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        default_filename(Utc::now().date_naive())
    );
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
