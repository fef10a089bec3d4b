//! ServerBuilder for assembling the backend from its collaborators

use super::router::build_router;
use super::state::AppState;
use crate::branding::BrandingService;
use crate::config::AppConfig;
use crate::core::{AuthAdmin, BlobStore, Mailer, PaymentStore, SettingsStore};
use crate::mailer::LogMailer;
use crate::payments::EmailRenderer;
use crate::storage::InMemoryBlobStore;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Builder for the HTTP server
///
/// Only the payment store is required. Without a settings store branding
/// falls back to the configured brand name, without a blob store logos live
/// in memory, without a mailer mail is only logged, and without an auth
/// admin `create-vendor-auth` answers with a configuration error.
///
/// # Example
///
/// ```ignore
/// let store = RestRowStore::new(RestClient::new(&row_store));
/// ServerBuilder::new()
///     .with_config(config)
///     .with_settings_store(store.clone())
///     .with_payment_store(store)
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    settings: Option<Arc<dyn SettingsStore>>,
    payments: Option<Arc<dyn PaymentStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    auth_admin: Option<Arc<dyn AuthAdmin>>,
    mailer: Option<Arc<dyn Mailer>>,
    http: Option<reqwest::Client>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            settings: None,
            payments: None,
            blobs: None,
            auth_admin: None,
            mailer: None,
            http: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.settings = Some(Arc::new(store));
        self
    }

    /// Set the payment store (required)
    pub fn with_payment_store(mut self, store: impl PaymentStore + 'static) -> Self {
        self.payments = Some(Arc::new(store));
        self
    }

    pub fn with_blob_store(mut self, store: impl BlobStore + 'static) -> Self {
        self.blobs = Some(Arc::new(store));
        self
    }

    pub fn with_auth_admin(mut self, admin: impl AuthAdmin + 'static) -> Self {
        self.auth_admin = Some(Arc::new(admin));
        self
    }

    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }

    /// Client used for outbound fetches; defaults to one honouring the image proxy timeout
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Add routes that sit beside the HTTP functions
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Resolve defaults and assemble the shared handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        let payments = self
            .payments
            .take()
            .ok_or_else(|| anyhow!("PaymentStore is required. Call .with_payment_store()"))?;

        let branding = match self.settings.take() {
            Some(store) => BrandingService::new(store, self.config.site.brand_name.clone()),
            None => {
                tracing::warn!("No settings store configured, branding uses defaults");
                BrandingService::unconfigured(self.config.site.brand_name.clone())
            }
        };

        let http = match self.http.take() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(Duration::from_secs(self.config.image_proxy.timeout_secs))
                .build()?,
        };

        let emails = EmailRenderer::new(
            self.config.site.brand_name.clone(),
            self.config.site.portal_url.clone(),
        )?;

        Ok(AppState {
            payments,
            blobs: self
                .blobs
                .take()
                .unwrap_or_else(|| Arc::new(InMemoryBlobStore::new())),
            auth_admin: self.auth_admin.take(),
            mailer: self
                .mailer
                .take()
                .unwrap_or_else(|| Arc::new(LogMailer::new(&self.config.mail))),
            branding,
            emails: Arc::new(emails),
            http,
            config: Arc::new(self.config.clone()),
        })
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(build_router(state, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
