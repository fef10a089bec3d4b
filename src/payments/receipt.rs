//! Printable receipt for a payout

use chrono::NaiveDate;
use serde::Serialize;

use super::format::{format_currency, format_date, format_stored_date, parse_stored_date};
use super::model::{PaymentTransaction, VendorPayment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_number: String,
    pub date: String,
    pub vendor: ReceiptVendor,
    pub order: ReceiptOrder,
    pub amounts: ReceiptAmounts,
    pub payment: ReceiptPayment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptVendor {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptOrder {
    pub id: i64,
    pub date: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAmounts {
    pub product_total: String,
    pub commission: String,
    pub vendor_earnings: String,
    pub advance_amount: String,
    pub balance_amount: String,
    pub paid_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptPayment {
    #[serde(rename = "type")]
    pub kind: String,
    pub method: String,
    pub reference: String,
    pub status: String,
}

/// Build a receipt; without a transaction the receipt is a draft dated `today`
pub fn generate_receipt(
    payment: &VendorPayment,
    transaction: Option<&PaymentTransaction>,
    today: NaiveDate,
) -> Receipt {
    let suffix: String = transaction
        .and_then(|t| t.id.as_deref())
        .filter(|id| !id.is_empty())
        .map(|id| id.chars().take(8).collect())
        .unwrap_or_else(|| "DRAFT".to_string());

    let date = transaction
        .and_then(|t| t.transaction_date.as_deref())
        .and_then(parse_stored_date)
        .unwrap_or(today);

    Receipt {
        receipt_number: format!("PAY-{}-{}", payment.order_id, suffix),
        date: format_date(Some(date)),
        vendor: ReceiptVendor {
            code: payment.vendor_code.clone(),
            name: payment.display_vendor_name().to_string(),
        },
        order: ReceiptOrder {
            id: payment.order_id,
            date: format_stored_date(payment.order_date.as_deref()),
            reference: payment
                .order_reference
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| format!("JLM-{}", payment.order_id)),
        },
        amounts: ReceiptAmounts {
            product_total: format_currency(payment.product_total),
            commission: format_currency(payment.commission_amount),
            vendor_earnings: format_currency(payment.vendor_earnings),
            advance_amount: format_currency(payment.advance_amount),
            balance_amount: format_currency(payment.balance_amount),
            paid_amount: format_currency(transaction.and_then(|t| t.amount)),
        },
        payment: ReceiptPayment {
            kind: or_default(transaction.and_then(|t| t.transaction_type.as_deref()), "N/A"),
            method: or_default(transaction.and_then(|t| t.payment_method.as_deref()), "N/A"),
            reference: or_default(
                transaction.and_then(|t| t.payment_reference.as_deref()),
                "N/A",
            ),
            status: or_default(transaction.and_then(|t| t.status.as_deref()), "pending"),
        },
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}
