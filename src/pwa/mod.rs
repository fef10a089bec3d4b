//! Offline cache for the storefront's static shell
//!
//! [`PrecacheManifest`] lists the pages and scripts installed up front.
//! [`OfflineCache`] answers asset requests the way the installed app does:
//! cross-origin and non-GET requests go straight to the network, everything
//! else is served from cache first and cached on the way back, and a page
//! navigation that cannot reach the network falls back to the app shell.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use axum::http::Method;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub const CACHE_NAME: &str = "julinemart-pwa-v1";

/// Served for navigations when the network is unreachable
pub const SHELL_PATH: &str = "/index.html";

const PRECACHE_URLS: [&str; 22] = [
    "/",
    "/index.html",
    "/admin/index.html",
    "/admin/inventory.html",
    "/admin/vendors.html",
    "/admin/payments.html",
    "/admin/login.html",
    "/admin/setup-x7k2p9.html",
    "/vendor/index.html",
    "/vendor/payments.html",
    "/vendor/bank-details.html",
    "/vendor/reset-password.html",
    "/favicon.ico",
    "/manifest.webmanifest",
    "/js/shared/auth.js",
    "/js/shared/logo.js",
    "/js/shared/payments.js",
    "/js/shared/supabase.js",
    "/js/shared/supabase.local.example.js",
    "/js/shared/vendor-auth.js",
    "/js/shared/vendor-manager.js",
    "/js/shared/pwa.js",
];

/// Versioned cache name plus the paths it is seeded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecacheManifest {
    cache_name: String,
    urls: Vec<String>,
}

impl PrecacheManifest {
    pub fn new(cache_name: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            urls,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl Default for PrecacheManifest {
    fn default() -> Self {
        Self::new(
            CACHE_NAME,
            PRECACHE_URLS.iter().map(|u| u.to_string()).collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CachedAsset {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    /// Absolute URL of the requested asset
    pub url: String,
    /// Top-level page navigation rather than a subresource
    pub navigate: bool,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            navigate: false,
        }
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            navigate: true,
            ..Self::get(url)
        }
    }
}

/// Network side of the cache
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch a same-origin path such as `/vendor/index.html`
    async fn fetch(&self, path: &str) -> Result<CachedAsset>;
}

/// Fetches assets from the storefront origin over HTTP
#[derive(Clone)]
pub struct HttpAssetFetcher {
    origin: Url,
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new(origin: &str, client: reqwest::Client) -> Result<Self> {
        let origin = Url::parse(origin).with_context(|| format!("Invalid origin '{}'", origin))?;
        Ok(Self { origin, client })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, path: &str) -> Result<CachedAsset> {
        let url = self.origin.join(path)?;
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        Ok(CachedAsset {
            status,
            content_type,
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Not handled by the cache; the caller goes to the network itself
    Bypass,
    FromCache(CachedAsset),
    FromNetwork(CachedAsset),
    /// Navigation failed and the cached shell was served instead
    ShellFallback(CachedAsset),
}

/// Cache-first asset cache scoped to one origin
pub struct OfflineCache<F: AssetFetcher> {
    manifest: PrecacheManifest,
    origin: Url,
    fetcher: F,
    entries: Arc<RwLock<HashMap<String, CachedAsset>>>,
}

impl<F: AssetFetcher> OfflineCache<F> {
    pub fn new(manifest: PrecacheManifest, origin: &str, fetcher: F) -> Result<Self> {
        let origin = Url::parse(origin).with_context(|| format!("Invalid origin '{}'", origin))?;
        Ok(Self {
            manifest,
            origin,
            fetcher,
            entries: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn manifest(&self) -> &PrecacheManifest {
        &self.manifest
    }

    /// Fetch every manifest path; nothing is cached unless all of them succeed
    pub async fn install(&self) -> Result<()> {
        let mut fetched = HashMap::with_capacity(self.manifest.urls().len());
        for path in self.manifest.urls() {
            let asset = self
                .fetcher
                .fetch(path)
                .await
                .with_context(|| format!("Failed to precache {}", path))?;
            if !asset.is_success() {
                bail!("Failed to precache {}: status {}", path, asset.status);
            }
            fetched.insert(path.clone(), asset);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        entries.extend(fetched);
        tracing::info!(
            cache = self.manifest.cache_name(),
            assets = entries.len(),
            "Precache installed"
        );
        Ok(())
    }

    /// Caches left over from other versions, to be deleted on activation
    pub fn stale_caches(&self, existing: &[String]) -> Vec<String> {
        existing
            .iter()
            .filter(|name| name.as_str() != self.manifest.cache_name())
            .cloned()
            .collect()
    }

    pub fn cached(&self, path: &str) -> Result<Option<CachedAsset>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(entries.get(path).cloned())
    }

    fn store(&self, path: &str, asset: &CachedAsset) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        entries.insert(path.to_string(), asset.clone());
        Ok(())
    }

    /// Cache key for a same-origin URL, `None` for anything else
    fn cache_key(&self, raw_url: &str) -> Option<String> {
        let url = Url::parse(raw_url).ok()?;
        if url.origin() != self.origin.origin() {
            return None;
        }
        Some(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
    }

    pub async fn handle(&self, request: &AssetRequest) -> Result<CacheOutcome> {
        if request.method != Method::GET {
            return Ok(CacheOutcome::Bypass);
        }
        let Some(key) = self.cache_key(&request.url) else {
            return Ok(CacheOutcome::Bypass);
        };

        if let Some(asset) = self.cached(&key)? {
            return Ok(CacheOutcome::FromCache(asset));
        }

        match self.fetcher.fetch(&key).await {
            Ok(asset) => {
                if asset.is_success() {
                    self.store(&key, &asset)?;
                }
                Ok(CacheOutcome::FromNetwork(asset))
            }
            Err(e) if request.navigate => {
                tracing::debug!(path = %key, "Navigation offline, serving shell: {}", e);
                self.cached(SHELL_PATH)?
                    .map(CacheOutcome::ShellFallback)
                    .ok_or_else(|| anyhow!("Offline and no cached shell for {}", key))
            }
            Err(e) => Err(e),
        }
    }
}
