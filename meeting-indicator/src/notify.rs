//! Out-of-band failure alerts.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::PushoverConfig;
use crate::traits::NotificationAdapter;

const ALERT_TITLE: &str = "Meeting Indicator Error";

/// Sends alerts through the Pushover messages API
pub struct PushoverNotifier {
    http: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    pub fn new(http: Client, config: PushoverConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl NotificationAdapter for PushoverNotifier {
    async fn notify(&self, message: &str) {
        let result = self
            .http
            .post(&self.config.api_url)
            .form(&[
                ("token", self.config.token.as_str()),
                ("user", self.config.user.as_str()),
                ("title", ALERT_TITLE),
                ("message", message),
            ])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Pushover alert delivered");
            }
            Ok(response) => {
                tracing::warn!("Pushover rejected alert: {}", response.status());
            }
            Err(e) => {
                tracing::warn!("Failed to deliver Pushover alert: {}", e);
            }
        }
    }
}

/// Fallback when no alert channel is configured; the log is the alert.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationAdapter for LogNotifier {
    async fn notify(&self, message: &str) {
        tracing::error!("{}: {}", ALERT_TITLE, message);
    }
}
