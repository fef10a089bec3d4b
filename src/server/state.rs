//! Shared state handed to every HTTP function

use std::sync::Arc;

use crate::branding::BrandingService;
use crate::config::AppConfig;
use crate::core::{AuthAdmin, BlobStore, Mailer, PaymentStore};
use crate::payments::EmailRenderer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub payments: Arc<dyn PaymentStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Absent when no auth backend credentials are configured
    pub auth_admin: Option<Arc<dyn AuthAdmin>>,
    pub mailer: Arc<dyn Mailer>,
    pub branding: BrandingService,
    pub emails: Arc<EmailRenderer>,
    /// Client for outbound fetches (image proxy)
    pub http: reqwest::Client,
}
