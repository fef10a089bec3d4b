//! Site branding kept in the `settings` table: the logo URL and a custom
//! site title, plus the derived page titles and print header.
//!
//! Reads and writes never fail loudly. A store error is logged and reported
//! as an empty value or `false`, which callers treat as "use the defaults".

use std::sync::Arc;

use chrono::Utc;

use crate::core::SettingsStore;

pub const LOGO_KEY: &str = "site_logo_url";
pub const TITLE_KEY: &str = "site_title";

#[derive(Clone)]
pub struct BrandingService {
    store: Option<Arc<dyn SettingsStore>>,
    fallback_title: String,
}

impl BrandingService {
    pub fn new(store: Arc<dyn SettingsStore>, fallback_title: impl Into<String>) -> Self {
        Self {
            store: Some(store),
            fallback_title: fallback_title.into(),
        }
    }

    /// A service with no settings store; every read is empty and every write fails
    pub fn unconfigured(fallback_title: impl Into<String>) -> Self {
        Self {
            store: None,
            fallback_title: fallback_title.into(),
        }
    }

    async fn read(&self, key: &str) -> String {
        let Some(store) = &self.store else {
            return String::new();
        };

        match store.get_setting(key).await {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key, "Could not fetch setting: {}", e);
                String::new()
            }
        }
    }

    async fn write(&self, key: &str, value: &str) -> bool {
        let Some(store) = &self.store else {
            tracing::error!(key, "Settings store not configured");
            return false;
        };

        match store.upsert_setting(key, value, Utc::now()).await {
            Ok(()) => {
                tracing::info!(key, "Setting saved");
                true
            }
            Err(e) => {
                tracing::error!(key, "Error saving setting: {}", e);
                false
            }
        }
    }

    /// Stored logo URL, empty when none is set
    pub async fn logo_url(&self) -> String {
        self.read(LOGO_KEY).await
    }

    /// Stored custom title, empty when none is set
    pub async fn site_title(&self) -> String {
        self.read(TITLE_KEY).await
    }

    pub async fn set_logo_url(&self, url: &str) -> bool {
        self.write(LOGO_KEY, url).await
    }

    pub async fn set_site_title(&self, title: &str) -> bool {
        self.write(TITLE_KEY, title).await
    }

    /// Custom title, or the brand name when none is set
    pub async fn display_title(&self) -> String {
        let title = self.site_title().await;
        if title.is_empty() {
            self.fallback_title.clone()
        } else {
            title
        }
    }

    /// Browser title for a page, e.g. `Payments - JulineMart`
    pub async fn page_title(&self, page_type: &str) -> String {
        let base = self.display_title().await;
        if page_type.is_empty() {
            base
        } else {
            format!("{} - {}", page_type, base)
        }
    }

    /// Header block for printed receipts and exports
    pub async fn logo_print_html(&self) -> String {
        let logo_url = self.logo_url().await;
        if logo_url.is_empty() {
            let title = self.display_title().await;
            return format!(
                r#"<div class="company-name">{}</div>"#,
                tera::escape_html(&title)
            );
        }

        format!(
            r#"<img src="{}" alt="Logo" style="max-height: 50px; max-width: 150px; object-fit: contain;">"#,
            tera::escape_html(&logo_url)
        )
    }
}
