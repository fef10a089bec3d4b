//! # JulineMart backend
//!
//! Server side of the JulineMart vendor marketplace: the vendor payment
//! domain, branding settings, an offline asset cache for the storefront
//! shell, and the HTTP functions the admin and vendor pages call.
//!
//! ## Payments
//!
//! Every order is split into a 5% platform commission and the vendor's
//! earnings, which are paid out as a 40% advance and a 60% balance once the
//! item has been verified at a hub.
//!
//! ```rust,ignore
//! use julinemart::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let breakdown = calculate_breakdown(dec!(1000))?;
//! assert_eq!(breakdown.advance_amount, dec!(380));
//! assert_eq!(breakdown.balance_amount, dec!(570));
//! ```
//!
//! ## Server
//!
//! ```rust,ignore
//! ServerBuilder::new()
//!     .with_config(AppConfig::load()?)
//!     .with_payment_store(InMemoryPaymentStore::new())
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod branding;
pub mod config;
pub mod core;
pub mod mailer;
pub mod payments;
pub mod pwa;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::branding::BrandingService;
    pub use crate::config::AppConfig;
    pub use crate::core::{
        AppError, AuthAdmin, BlobStore, CreateUserOutcome, Mailer, NewVendorUser, OutgoingEmail,
        PaymentStore, SettingsStore,
    };
    pub use crate::mailer::{LogMailer, RecordingMailer};
    pub use crate::payments::{
        BankAccount, EmailKind, EmailRenderer, PaymentBreakdown, PaymentDraft, PaymentStatus,
        PaymentTransaction, VendorPayment, calculate_breakdown, generate_receipt, next_action,
        status_meta, status_meta_for, validate_bank_account, validate_payment_data,
        validate_payment_reference,
    };
    pub use crate::pwa::{OfflineCache, PrecacheManifest};
    pub use crate::server::ServerBuilder;
    pub use crate::storage::{
        FsBlobStore, InMemoryAuthAdmin, InMemoryBlobStore, InMemoryPaymentStore,
        InMemorySettingsStore, RestAuthAdmin, RestClient, RestRowStore,
    };
}
