use anyhow::Result;
use julinemart::config::AppConfig;
use julinemart::mailer::LogMailer;
use julinemart::server::ServerBuilder;
use julinemart::storage::{
    FsBlobStore, InMemoryAuthAdmin, InMemoryPaymentStore, InMemorySettingsStore, RestAuthAdmin,
    RestClient, RestRowStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let addr = config.server.bind_addr.clone();

    let mut builder = ServerBuilder::new().with_mailer(LogMailer::new(&config.mail));

    builder = match &config.row_store {
        Some(row_store) => {
            tracing::info!(url = %row_store.url, "Using hosted row store");
            let rest = RestClient::new(row_store);
            let store = RestRowStore::new(rest.clone());
            builder
                .with_settings_store(store.clone())
                .with_payment_store(store)
                .with_auth_admin(RestAuthAdmin::new(rest))
        }
        None => {
            tracing::warn!("No row store configured, using in-memory stores");
            builder
                .with_settings_store(InMemorySettingsStore::new())
                .with_payment_store(InMemoryPaymentStore::new())
                .with_auth_admin(InMemoryAuthAdmin::new())
        }
    };

    if let Some(dir) = &config.logo.blob_dir {
        tracing::info!(dir = %dir, "Storing blobs on disk");
        builder = builder.with_blob_store(FsBlobStore::new(dir));
    }

    builder.with_config(config).serve(&addr).await
}
