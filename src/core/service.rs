//! Service traits for the collaborators the backend talks to
//!
//! Every remote system (row store, auth admin, blob storage, mail) sits
//! behind one of these traits so handlers can be exercised against the
//! in-memory implementations in [`crate::storage`] and [`crate::mailer`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payments::VendorPayment;

/// Key/value `settings` table
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting; `None` when the key has never been written
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a setting
    async fn upsert_setting(&self, key: &str, value: &str, updated_at: DateTime<Utc>)
    -> Result<()>;
}

/// `vendor_payments` table joined to `vendors`
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_payment(&self, id: &str) -> Result<Option<VendorPayment>>;
}

/// Binary blob storage addressed by a fixed key
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// A vendor account to be created in the auth backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVendorUser {
    pub email: String,
    pub vendor_code: String,
    pub vendor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created { user_id: String },
    AlreadyExists,
}

/// Administrative access to the hosted auth backend
#[async_trait]
pub trait AuthAdmin: Send + Sync {
    /// Create a confirmed user; an already registered email is reported, not raised
    async fn create_user(&self, user: &NewVendorUser) -> Result<CreateUserOutcome>;

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}
