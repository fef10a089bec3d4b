//! Checks run on payment and bank account data before it is submitted
//!
//! None of these short-circuit: every failing rule adds its message so the
//! form can show them all at once.

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::OnceLock;

use super::bank;
use super::model::{BankAccount, PaymentDraft};

pub const MIN_REFERENCE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// First message, if any
    pub fn error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

pub fn validate_payment_data(draft: &PaymentDraft) -> ValidationOutcome {
    let mut errors = Vec::new();

    if draft.order_id.is_none_or(|id| id <= 0) {
        errors.push("Valid order ID is required".to_string());
    }

    if is_blank(draft.order_date.as_deref()) {
        errors.push("Order date is required".to_string());
    }

    if is_blank(Some(&draft.vendor_code)) {
        errors.push("Vendor is required".to_string());
    }

    if draft.product_total.is_none_or(|total| total <= Decimal::ZERO) {
        errors.push("Product total must be greater than 0".to_string());
    }

    ValidationOutcome::from_errors(errors)
}

pub fn validate_payment_reference(reference: &str) -> ValidationOutcome {
    let errors = if reference.trim().is_empty() {
        vec!["Payment reference is required".to_string()]
    } else if reference.chars().count() < MIN_REFERENCE_LEN {
        vec![format!(
            "Payment reference must be at least {} characters",
            MIN_REFERENCE_LEN
        )]
    } else {
        Vec::new()
    };
    ValidationOutcome::from_errors(errors)
}

fn account_number_regex() -> &'static Regex {
    static ACCOUNT_NUMBER: OnceLock<Regex> = OnceLock::new();
    ACCOUNT_NUMBER.get_or_init(|| Regex::new(r"^[0-9]{10}$").unwrap())
}

pub fn validate_bank_account(account: &BankAccount) -> ValidationOutcome {
    let mut errors = Vec::new();

    if is_blank(Some(&account.bank_name)) {
        errors.push("Bank name is required".to_string());
    } else if bank::find_by_name(&account.bank_name).is_none() {
        errors.push("Bank name is not a recognised bank".to_string());
    }

    if is_blank(Some(&account.account_number)) {
        errors.push("Account number is required".to_string());
    } else if !account_number_regex().is_match(&account.account_number) {
        errors.push("Account number must be exactly 10 digits".to_string());
    }

    if is_blank(Some(&account.account_name)) {
        errors.push("Account name is required".to_string());
    }

    ValidationOutcome::from_errors(errors)
}
