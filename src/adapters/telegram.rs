//! Telegram Bot API client used for the order notifications.

use crate::config::TelegramConfig;
use crate::domain::ports::Notifier;
use crate::utils::error::{FnOrderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &TelegramConfig) -> Self {
        Self::new(
            &config.api_base,
            &config.tg_token,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML"
            }))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(FnOrderError::ChatApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
