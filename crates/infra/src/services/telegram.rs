use super::IMessenger;
use anyhow::anyhow;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tickler_api_structs::{send_message, set_webhook, TelegramResponse};
use tracing::error;

const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Talks to the Telegram Bot API over HTTPS
pub struct TelegramMessenger {
    client: Client,
    token: String,
}

impl TelegramMessenger {
    pub fn new(token: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, token })
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> anyhow::Result<T> {
        let res = self
            .client
            .post(&format!("{}/bot{}/{}", TELEGRAM_API_BASE_URL, self.token, method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Telegram API {} error. Error message: {:?}",
                    method,
                    e.without_url()
                );
                anyhow!("Telegram API {} request failed", method)
            })?;

        let res = res.json::<TelegramResponse<T>>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Telegram API {} error. Error message: {:?}",
                method,
                e.without_url()
            );
            anyhow!("Telegram API {} returned an unexpected response", method)
        })?;

        match res {
            TelegramResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            TelegramResponse { description, .. } => Err(anyhow!(
                "Telegram API {} was rejected: {}",
                method,
                description.unwrap_or_default()
            )),
        }
    }
}

#[async_trait::async_trait]
impl IMessenger for TelegramMessenger {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let body = send_message::RequestBody {
            chat_id,
            text: text.to_string(),
        };
        self.post::<tickler_api_structs::dtos::MessageDTO>("sendMessage", &body)
            .await?;
        Ok(())
    }

    async fn set_webhook(&self, url: &str, secret: &str) -> anyhow::Result<()> {
        let body = set_webhook::RequestBody {
            url: url.to_string(),
            secret_token: secret.to_string(),
            allowed_updates: vec!["message".to_string()],
        };
        self.post::<bool>("setWebhook", &body).await?;
        Ok(())
    }
}
