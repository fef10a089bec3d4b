//! Mailers for vendor notifications
//!
//! SMTP delivery is not wired up: [`LogMailer`] records what would have been
//! sent in the log. [`RecordingMailer`] keeps messages for inspection.

use crate::config::MailConfig;
use crate::core::{Mailer, OutgoingEmail};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Logs outgoing mail instead of delivering it
#[derive(Debug, Clone)]
pub struct LogMailer {
    sender: String,
    relay: String,
}

impl LogMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            sender: config.sender(),
            relay: format!("{}:{}", config.smtp_host, config.smtp_port),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        tracing::info!(
            from = %self.sender,
            relay = %self.relay,
            to = %email.to,
            subject = %email.subject,
            body_len = email.html.len(),
            "Email queued (delivery disabled)"
        );
        Ok(())
    }
}

/// Keeps every message it is asked to send
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Result<Vec<OutgoingEmail>> {
        let sent = self
            .sent
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(sent.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let mut sent = self
            .sent
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        sent.push(email.clone());
        Ok(())
    }
}
