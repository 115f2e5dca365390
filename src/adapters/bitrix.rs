//! Bitrix24 inbound webhook that starts the drive replacement workflow.

use crate::config::BitrixConfig;
use crate::domain::model::TaskPayload;
use crate::domain::ports::TaskTracker;
use crate::utils::error::{FnOrderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct BitrixClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl BitrixClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout,
        }
    }

    pub fn from_config(config: &BitrixConfig) -> Self {
        Self::new(
            config.webhook_url(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl TaskTracker for BitrixClient {
    async fn start_task(&self, payload: &TaskPayload) -> Result<u16> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            tracing::debug!("Webhook response: {}", body);
            Ok(status.as_u16())
        } else {
            Err(FnOrderError::WebhookStatusError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
