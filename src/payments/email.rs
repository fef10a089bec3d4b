//! Payment notification emails
//!
//! Templates live in `templates/emails/` and are compiled into the binary.
//! [`EmailData`] carries raw payment values; formatting for display happens
//! in [`EmailRenderer::render`] so templates only ever see strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tera::{Context, Tera};

use super::format::{format_naira, format_stored_date};
use super::model::VendorPayment;

const TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("../../templates/emails/layout.html")),
    (
        "advance_paid.html",
        include_str!("../../templates/emails/advance_paid.html"),
    ),
    (
        "balance_paid.html",
        include_str!("../../templates/emails/balance_paid.html"),
    ),
    (
        "hub_verified.html",
        include_str!("../../templates/emails/hub_verified.html"),
    ),
    (
        "item_rejected.html",
        include_str!("../../templates/emails/item_rejected.html"),
    ),
];

/// Which notification to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    AdvancePaid,
    BalancePaid,
    HubVerified,
    ItemRejected,
}

impl EmailKind {
    pub const ALL: [EmailKind; 4] = [
        EmailKind::AdvancePaid,
        EmailKind::BalancePaid,
        EmailKind::HubVerified,
        EmailKind::ItemRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::AdvancePaid => "advance_paid",
            EmailKind::BalancePaid => "balance_paid",
            EmailKind::HubVerified => "hub_verified",
            EmailKind::ItemRejected => "item_rejected",
        }
    }

    fn template_name(&self) -> &'static str {
        match self {
            EmailKind::AdvancePaid => "advance_paid.html",
            EmailKind::BalancePaid => "balance_paid.html",
            EmailKind::HubVerified => "hub_verified.html",
            EmailKind::ItemRejected => "item_rejected.html",
        }
    }

    fn header_color(&self) -> &'static str {
        match self {
            EmailKind::AdvancePaid => "#77088a",
            EmailKind::BalancePaid => "#10b981",
            EmailKind::HubVerified => "#3b82f6",
            EmailKind::ItemRejected => "#ef4444",
        }
    }

    pub fn subject(&self, order_id: i64) -> String {
        match self {
            EmailKind::AdvancePaid => format!("Advance Payment Received - Order #{}", order_id),
            EmailKind::BalancePaid => format!("Full Payment Completed - Order #{}", order_id),
            EmailKind::HubVerified => format!(
                "Item Verified - Balance Payment Incoming | Order #{}",
                order_id
            ),
            EmailKind::ItemRejected => format!("Item Issue - Order #{}", order_id),
        }
    }

    /// Advance notifications report the advance leg, everything else the balance
    fn reports_advance(&self) -> bool {
        matches!(self, EmailKind::AdvancePaid)
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown email type '{0}'")]
pub struct UnknownEmailKind(pub String);

impl FromStr for EmailKind {
    type Err = UnknownEmailKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEmailKind(s.to_string()))
    }
}

/// Values interpolated into a notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailData {
    pub vendor_name: String,
    pub order_id: i64,
    pub amount: Option<Decimal>,
    pub payment_date: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub advance_amount: Option<Decimal>,
    pub balance_amount: Option<Decimal>,
    pub total_earnings: Option<Decimal>,
    pub hub_name: Option<String>,
    pub verified_date: Option<String>,
    pub rejection_reason: Option<String>,
}

impl EmailData {
    pub fn from_payment(kind: EmailKind, payment: &VendorPayment) -> Self {
        let (amount, payment_date, payment_method, payment_reference) = if kind.reports_advance() {
            (
                payment.advance_amount,
                payment.advance_paid_date.clone(),
                payment.advance_payment_method.clone(),
                payment.advance_payment_reference.clone(),
            )
        } else {
            (
                payment.balance_amount,
                payment.balance_paid_date.clone(),
                payment.balance_payment_method.clone(),
                payment.balance_payment_reference.clone(),
            )
        };

        Self {
            vendor_name: payment.display_vendor_name().to_string(),
            order_id: payment.order_id,
            amount,
            payment_date,
            payment_method,
            payment_reference,
            advance_amount: payment.advance_amount,
            balance_amount: payment.balance_amount,
            total_earnings: payment.vendor_earnings,
            hub_name: payment.hub_name.clone(),
            verified_date: payment.hub_verified_date.clone(),
            rejection_reason: payment.hub_verification_notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[derive(Serialize)]
struct TemplateView<'a> {
    header_color: &'a str,
    brand_name: &'a str,
    portal_url: &'a str,
    year: i32,
    vendor_name: &'a str,
    order_id: i64,
    amount: String,
    payment_date: String,
    payment_method: &'a str,
    payment_reference: &'a str,
    advance_amount: String,
    balance_amount: String,
    total_earnings: String,
    hub_name: &'a str,
    verified_date: String,
    rejection_reason: &'a str,
}

fn text_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
}

/// Renders notification emails from the embedded templates
pub struct EmailRenderer {
    tera: Tera,
    brand_name: String,
    portal_url: String,
}

impl EmailRenderer {
    pub fn new(brand_name: impl Into<String>, portal_url: impl Into<String>) -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self {
            tera,
            brand_name: brand_name.into(),
            portal_url: portal_url.into(),
        })
    }

    pub fn render(&self, kind: EmailKind, data: &EmailData, year: i32) -> tera::Result<RenderedEmail> {
        let view = TemplateView {
            header_color: kind.header_color(),
            brand_name: &self.brand_name,
            portal_url: &self.portal_url,
            year,
            vendor_name: &data.vendor_name,
            order_id: data.order_id,
            amount: format_naira(data.amount),
            payment_date: format_stored_date(data.payment_date.as_deref()),
            payment_method: text_or(&data.payment_method, "N/A"),
            payment_reference: text_or(&data.payment_reference, "N/A"),
            advance_amount: format_naira(data.advance_amount),
            balance_amount: format_naira(data.balance_amount),
            total_earnings: format_naira(data.total_earnings),
            hub_name: text_or(&data.hub_name, "our hub"),
            verified_date: format_stored_date(data.verified_date.as_deref()),
            rejection_reason: text_or(&data.rejection_reason, "No reason was recorded"),
        };

        let html = self
            .tera
            .render(kind.template_name(), &Context::from_serialize(&view)?)?;

        Ok(RenderedEmail {
            subject: kind.subject(data.order_id),
            html,
        })
    }
}
