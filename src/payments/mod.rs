//! Vendor payment domain: the commission split, payment lifecycle,
//! validation, display formatting, receipts, notification emails and CSV export.
//!
//! Everything here is pure; the HTTP layer in [`crate::server`] and the
//! adapters in [`crate::storage`] feed it rows and collect its output.

pub mod bank;
pub mod calculator;
pub mod email;
pub mod export;
pub mod format;
pub mod model;
pub mod receipt;
pub mod status;
pub mod validation;

pub use bank::Bank;
pub use calculator::{
    ADVANCE_PERCENTAGE, BALANCE_PERCENTAGE, COMMISSION_RATE, CalculationError, PaymentBreakdown,
    calculate_breakdown, round_money,
};
pub use email::{EmailData, EmailKind, EmailRenderer, RenderedEmail, UnknownEmailKind};
pub use export::{ExportError, export_csv};
pub use format::{format_currency, format_date, format_datetime, format_naira};
pub use model::{BankAccount, PaymentDraft, PaymentTransaction, VendorContact, VendorPayment};
pub use receipt::{Receipt, generate_receipt};
pub use status::{
    Action, NextAction, PaymentStatus, StatusMeta, UnknownStatus, next_action, payment_progress,
    status_meta, status_meta_for,
};
pub use validation::{
    ValidationOutcome, validate_bank_account, validate_payment_data, validate_payment_reference,
};
