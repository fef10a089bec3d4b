//! In-memory implementations of the service traits for testing and development

use crate::core::{
    AuthAdmin, BlobStore, CreateUserOutcome, NewVendorUser, PaymentStore, SettingsStore,
};
use crate::payments::VendorPayment;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// A stored setting together with the time it was last written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRow {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// In-memory `settings` table
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    rows: Arc<RwLock<HashMap<String, SettingRow>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full row for a key, including its timestamp
    pub fn row(&self, key: &str) -> Result<Option<SettingRow>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(rows.get(key).cloned())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.row(key)?.map(|row| row.value))
    }

    async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        rows.insert(
            key.to_string(),
            SettingRow {
                value: value.to_string(),
                updated_at,
            },
        );
        Ok(())
    }
}

/// In-memory `vendor_payments` table, rows already joined to their vendor
#[derive(Clone, Default)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<String, VendorPayment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, payment: VendorPayment) -> Result<()> {
        let mut payments = self
            .payments
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        payments.insert(payment.id.clone(), payment);
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_payment(&self, id: &str) -> Result<Option<VendorPayment>> {
        let payments = self
            .payments
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(payments.get(id).cloned())
    }
}

/// In-memory auth backend
///
/// Users are keyed by lower-cased email. Password reset requests are only
/// recorded, which lets tests assert on the redirect that would be mailed.
#[derive(Clone, Default)]
pub struct InMemoryAuthAdmin {
    users: Arc<RwLock<HashMap<String, (String, NewVendorUser)>>>,
    resets: Arc<RwLock<Vec<(String, String)>>>,
}

impl InMemoryAuthAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, email: &str) -> Result<Option<NewVendorUser>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(users
            .get(&email.to_lowercase())
            .map(|(_, user)| user.clone()))
    }

    /// `(email, redirect_to)` pairs in request order
    pub fn password_resets(&self) -> Result<Vec<(String, String)>> {
        let resets = self
            .resets
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(resets.clone())
    }
}

#[async_trait]
impl AuthAdmin for InMemoryAuthAdmin {
    async fn create_user(&self, user: &NewVendorUser) -> Result<CreateUserOutcome> {
        let mut users = self
            .users
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let email = user.email.to_lowercase();
        if users.contains_key(&email) {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        let user_id = Uuid::new_v4().to_string();
        users.insert(email, (user_id.clone(), user.clone()));
        Ok(CreateUserOutcome::Created { user_id })
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<()> {
        let mut resets = self
            .resets
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        resets.push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }
}

/// In-memory blob store
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(blobs.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        blobs.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(email: &str) -> NewVendorUser {
        NewVendorUser {
            email: email.to_string(),
            vendor_code: "VND001".to_string(),
            vendor_name: "Ada Stores".to_string(),
        }
    }

    #[tokio::test]
    async fn test_settings_upsert_overwrites() {
        let store = InMemorySettingsStore::new();
        assert_eq!(store.get_setting("site_title").await.unwrap(), None);

        let first = Utc::now();
        store.upsert_setting("site_title", "Old", first).await.unwrap();
        store
            .upsert_setting("site_title", "New", first + chrono::Duration::seconds(5))
            .await
            .unwrap();

        assert_eq!(
            store.get_setting("site_title").await.unwrap().as_deref(),
            Some("New")
        );
        assert!(store.row("site_title").unwrap().unwrap().updated_at > first);
    }

    #[tokio::test]
    async fn test_payment_lookup() {
        let store = InMemoryPaymentStore::new();
        store
            .insert(VendorPayment {
                id: "42".to_string(),
                order_id: 1201,
                vendor_code: "VND001".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.find_payment("42").await.unwrap().unwrap().order_id, 1201);
        assert!(store.find_payment("43").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_is_reported() {
        let admin = InMemoryAuthAdmin::new();
        let created = admin.create_user(&vendor("ada@example.com")).await.unwrap();
        assert!(matches!(created, CreateUserOutcome::Created { .. }));

        let again = admin.create_user(&vendor("ADA@example.com")).await.unwrap();
        assert_eq!(again, CreateUserOutcome::AlreadyExists);
        assert!(admin.user("ada@example.com").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blob_lifecycle() {
        let store = InMemoryBlobStore::new();
        store.put("company-logo", b"data:image/png;base64,AA==".to_vec()).await.unwrap();
        assert!(store.get("company-logo").await.unwrap().is_some());

        store.delete("company-logo").await.unwrap();
        store.delete("company-logo").await.unwrap();
        assert!(store.get("company-logo").await.unwrap().is_none());
    }
}
