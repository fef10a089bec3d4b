//! Error types and the service traits shared by every layer

pub mod error;
pub mod service;

pub use error::{AppError, ErrorResponse};
pub use service::{
    AuthAdmin, BlobStore, CreateUserOutcome, Mailer, NewVendorUser, OutgoingEmail, PaymentStore,
    SettingsStore,
};
