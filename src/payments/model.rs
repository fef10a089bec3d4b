//! Payment rows as they come out of the row store
//!
//! These are read-only shapes: rows are created and mutated by the hosted
//! database, this crate only reads them and derives display values.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::status::PaymentStatus;

/// Vendor contact joined onto a payment row through `vendor_code`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorContact {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A row of the `vendor_payments` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorPayment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub order_id: i64,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub order_reference: Option<String>,
    pub vendor_code: String,
    #[serde(default)]
    pub vendor_name: Option<String>,

    #[serde(default)]
    pub product_total: Option<Decimal>,
    #[serde(default)]
    pub commission_amount: Option<Decimal>,
    #[serde(default)]
    pub vendor_earnings: Option<Decimal>,
    #[serde(default)]
    pub advance_amount: Option<Decimal>,
    #[serde(default)]
    pub balance_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lossy_status")]
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub advance_paid_date: Option<String>,
    #[serde(default)]
    pub advance_payment_method: Option<String>,
    #[serde(default)]
    pub advance_payment_reference: Option<String>,

    #[serde(default)]
    pub balance_paid: bool,
    #[serde(default)]
    pub balance_paid_date: Option<String>,
    #[serde(default)]
    pub balance_payment_method: Option<String>,
    #[serde(default)]
    pub balance_payment_reference: Option<String>,

    #[serde(default)]
    pub hub_name: Option<String>,
    #[serde(default)]
    pub hub_verified_date: Option<String>,
    #[serde(default)]
    pub hub_verification_notes: Option<String>,

    #[serde(default, rename = "vendors")]
    pub vendor: Option<VendorContact>,
}

impl VendorPayment {
    /// Display name for the vendor, falling back to the vendor code
    pub fn display_vendor_name(&self) -> &str {
        self.vendor
            .as_ref()
            .and_then(|v| v.vendor_name.as_deref())
            .or(self.vendor_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.vendor_code)
    }

    pub fn vendor_email(&self) -> Option<&str> {
        self.vendor
            .as_ref()
            .and_then(|v| v.email.as_deref())
            .filter(|email| !email.trim().is_empty())
    }
}

/// A single advance or balance payout recorded against a payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payment data as entered by an admin, before it is saved
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentDraft {
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vendor_code: String,
    #[serde(default)]
    pub product_total: Option<Decimal>,
}

/// Payout account a vendor registers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_name: String,
}

/// Form fields arrive as `null` when left untouched; treat that as blank
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lossy_status<'de, D>(deserializer: D) -> Result<PaymentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(PaymentStatus::parse_lossy)
        .unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
