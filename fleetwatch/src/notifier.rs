//! Outbound alert sinks. Delivery is best-effort: failures are logged, never returned.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str);
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Posts plain-text messages to one Telegram chat via the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self::with_api_base(TELEGRAM_API_BASE, token, chat_id)
    }

    pub fn with_api_base(api_base: &str, token: &str, chat_id: i64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("falling back to default http client: {e}");
                reqwest::Client::new()
            });
        Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
            chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) {
        let body = SendMessage {
            chat_id: self.chat_id,
            text,
        };
        match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(chat_id = self.chat_id, "telegram message delivered");
            }
            Ok(resp) => warn!(status = %resp.status(), "telegram rejected message"),
            // reqwest errors carry the URL, which embeds the bot token
            Err(e) => warn!("telegram send failed: {}", e.without_url()),
        }
    }
}

/// Used when no bot token is configured: alerts still surface in the local log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) {
        warn!(target: "fleetwatch::alert", "{text}");
    }
}
