//! Hosted row store and auth admin over HTTP
//!
//! The row store speaks the PostgREST dialect (`/rest/v1/<table>` with
//! `column=eq.value` filters); the auth admin speaks the GoTrue admin API
//! (`/auth/v1/admin/users`, `/auth/v1/recover`). Both authenticate with the
//! service key, sent as `apikey` and as a bearer token.

use crate::config::RowStoreConfig;
use crate::core::{AuthAdmin, CreateUserOutcome, NewVendorUser, PaymentStore, SettingsStore};
use crate::payments::VendorPayment;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

const PAYMENT_SELECT: &str = "*,vendors!vendor_payments_vendor_code_fkey(vendor_name,email)";

/// Shared HTTP plumbing for the row store and auth admin clients
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    service_key: String,
    client: Client,
}

impl RestClient {
    pub fn new(config: &RowStoreConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: &RowStoreConfig, client: Client) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            client,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

async fn error_body(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{} {}", status, body)
}

#[derive(Deserialize)]
struct SettingValue {
    value: Option<String>,
}

/// `settings` and `vendor_payments` tables of the hosted row store
#[derive(Clone)]
pub struct RestRowStore {
    rest: RestClient,
}

impl RestRowStore {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl SettingsStore for RestRowStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let request = self
            .rest
            .client
            .get(self.rest.table_url("settings"))
            .query(&[("key", format!("eq.{}", key)), ("select", "value".to_string())]);

        let response = self.rest.authorize(request).send().await?;
        if !response.status().is_success() {
            bail!("settings query failed: {}", error_body(response).await);
        }

        let rows: Vec<SettingValue> = response.json().await?;
        Ok(rows.into_iter().next().and_then(|row| row.value))
    }

    async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let request = self
            .rest
            .client
            .post(self.rest.table_url("settings"))
            .query(&[("on_conflict", "key")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&json!({
                "key": key,
                "value": value,
                "updated_at": updated_at.to_rfc3339(),
            }));

        let response = self.rest.authorize(request).send().await?;
        if !response.status().is_success() {
            bail!("settings upsert failed: {}", error_body(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for RestRowStore {
    async fn find_payment(&self, id: &str) -> Result<Option<VendorPayment>> {
        let request = self
            .rest
            .client
            .get(self.rest.table_url("vendor_payments"))
            .query(&[("id", format!("eq.{}", id)), ("select", PAYMENT_SELECT.to_string())]);

        let response = self.rest.authorize(request).send().await?;
        if !response.status().is_success() {
            bail!("payment query failed: {}", error_body(response).await);
        }

        let rows: Vec<VendorPayment> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

#[derive(Deserialize)]
struct CreatedUser {
    id: String,
}

#[derive(Deserialize, Default)]
struct AuthErrorBody {
    /// A string code on newer versions, the HTTP status on older ones
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

impl AuthErrorBody {
    fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("unknown error")
    }
}

/// The backend phrases duplicates several ways depending on version
fn is_duplicate_user(body: &AuthErrorBody) -> bool {
    let code_matches = [
        body.code.as_ref().and_then(serde_json::Value::as_str),
        body.error_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|code| code == "user_already_exists" || code == "email_exists");

    let message = body.message();
    code_matches
        || message.contains("already registered")
        || message.contains("already been registered")
        || message.contains("already exists")
}

/// GoTrue admin API of the hosted auth backend
#[derive(Clone)]
pub struct RestAuthAdmin {
    rest: RestClient,
}

impl RestAuthAdmin {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl AuthAdmin for RestAuthAdmin {
    async fn create_user(&self, user: &NewVendorUser) -> Result<CreateUserOutcome> {
        let request = self
            .rest
            .client
            .post(self.rest.auth_url("admin/users"))
            .json(&json!({
                "email": user.email,
                "email_confirm": true,
                "user_metadata": {
                    "role": "vendor",
                    "vendor_code": user.vendor_code,
                    "vendor_name": user.vendor_name,
                },
            }));

        let response = self.rest.authorize(request).send().await?;
        if response.status().is_success() {
            let created: CreatedUser = response.json().await?;
            return Ok(CreateUserOutcome::Created {
                user_id: created.id,
            });
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: AuthErrorBody = serde_json::from_str(&text).unwrap_or_default();
        if is_duplicate_user(&body) {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        Err(anyhow!("{} ({})", body.msg.unwrap_or(text), status))
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<()> {
        let request = self
            .rest
            .client
            .post(self.rest.auth_url("recover"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }));

        let response = self.rest.authorize(request).send().await?;
        if !response.status().is_success() {
            bail!("password reset failed: {}", error_body(response).await);
        }
        Ok(())
    }
}
