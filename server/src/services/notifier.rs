//! Notification delivery
//!
//! Reminders and missed-day notices are handed to a [`Notifier`]. The
//! transport is chosen at startup: a webhook when one is configured,
//! otherwise the log.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// A message for the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// `reminder` or `missed_day`
    pub kind: String,
    pub entity_id: Option<String>,
    pub title: String,
    pub body: String,
}

/// Delivers notifications to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Discards every notification.
#[derive(Debug, Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            "[{}] {} - {}",
            notification.kind,
            notification.title,
            notification.body
        );
        Ok(())
    }
}

/// POSTs each notification as JSON to a relay URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| AppError::Notification(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "Webhook returned {}",
                status
            )));
        }

        tracing::debug!("Delivered {} notification via webhook", notification.kind);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Keeps every notification for inspection.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<Notification>>>,
    }

    impl RecordingNotifier {
        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &Notification) -> Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }
}
