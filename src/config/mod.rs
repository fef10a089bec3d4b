//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file (`CONFIG_PATH`) and is then
//! overlaid with environment variables, so a deployment can run purely from
//! its environment.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::ConfigError;

/// Complete backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    /// Hosted row store; without it the in-memory adapters are used
    pub row_store: Option<RowStoreConfig>,
    pub mail: MailConfig,
    pub image_proxy: ImageProxyConfig,
    pub logo: LogoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public origin of the storefront, used to build redirect links
    pub site_url: String,
    pub brand_name: String,
    /// Where vendors review their payments; linked from notification emails
    pub portal_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "https://sku.julinemart.com".to_string(),
            brand_name: "JulineMart".to_string(),
            portal_url: "https://sku.julinemart.com/vendor/payments.html".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn reset_password_url(&self) -> String {
        format!(
            "{}/vendor/reset-password.html",
            self.site_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowStoreConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub from_email: String,
    pub from_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.ionos.co.uk".to_string(),
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            from_email: "noreply@julinemart.com".to_string(),
            from_name: "JulineMart".to_string(),
        }
    }
}

impl MailConfig {
    /// `From` header value, e.g. `JulineMart <noreply@julinemart.com>`
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProxyConfig {
    pub max_bytes: usize,
    pub timeout_secs: u64,
    /// Hosts the proxy may fetch from. Empty allows any host, including
    /// loopback and private addresses reachable from the server.
    pub allowed_hosts: Vec<String>,
}

impl ImageProxyConfig {
    pub fn allows_host(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty()
            || self
                .allowed_hosts
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

impl Default for ImageProxyConfig {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            timeout_secs: 10,
            allowed_hosts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Blob key the company logo is stored under
    pub store_key: String,
    /// Directory for file-backed blobs; blobs stay in memory when unset
    pub blob_dir: Option<String>,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            store_key: "company-logo".to_string(),
            blob_dir: None,
        }
    }
}

fn parse_env<T: FromStr>(field: &str, value: String) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.clone(),
            message: e.to_string(),
        }
        .into()
    })
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::ParseError {
                file: None,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Read `CONFIG_PATH` (or defaults) and overlay the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_yaml_file(&path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables resolved by `lookup`; unset variables leave the value untouched
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(url) = lookup("SITE_URL") {
            self.site.site_url = url;
        }

        match (lookup("ROW_STORE_URL"), lookup("ROW_STORE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => {
                self.row_store = Some(RowStoreConfig { url, service_key });
            }
            (Some(url), None) => match self.row_store.as_mut() {
                Some(row_store) => row_store.url = url,
                None => {
                    return Err(ConfigError::MissingSetting {
                        setting: "ROW_STORE_SERVICE_KEY".to_string(),
                    }
                    .into());
                }
            },
            (None, Some(service_key)) => match self.row_store.as_mut() {
                Some(row_store) => row_store.service_key = service_key,
                None => {
                    return Err(ConfigError::MissingSetting {
                        setting: "ROW_STORE_URL".to_string(),
                    }
                    .into());
                }
            },
            (None, None) => {}
        }

        if let Some(host) = lookup("SMTP_HOST") {
            self.mail.smtp_host = host;
        }
        if let Some(port) = lookup("SMTP_PORT") {
            self.mail.smtp_port = parse_env("SMTP_PORT", port)?;
        }
        if let Some(user) = lookup("SMTP_USER") {
            self.mail.smtp_user = Some(user);
        }
        if let Some(pass) = lookup("SMTP_PASS") {
            self.mail.smtp_pass = Some(pass);
        }
        if let Some(email) = lookup("FROM_EMAIL") {
            self.mail.from_email = email;
        }
        if let Some(name) = lookup("FROM_NAME") {
            self.mail.from_name = name;
        }
        if let Some(hosts) = lookup("IMAGE_PROXY_ALLOWED_HOSTS") {
            self.image_proxy.allowed_hosts = hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }
}
