//! Telegram Bot API client

use super::types::{
    ApiResponse, DeleteWebhookRequest, GetUpdatesRequest, SendMessageRequest, SetWebhookRequest,
    Update,
};
use crate::runtime::{ChatTransport, TransportError};
use crate::state_machine::Formatting;
use crate::store::ChatId;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const ALLOWED_UPDATES: &[&str] = &["message"];
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram client errors. Messages never contain the bot token.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
    #[error("Telegram response for {0} had no result")]
    MissingResult(&'static str),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the token
        TelegramError::Http(err.without_url())
    }
}

/// Client for one bot
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`
    bot_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .user_agent(concat!("expense_bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    async fn call<B, T>(
        &self,
        method: &'static str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{method}", self.bot_url))
            .timeout(timeout)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(TelegramError::Api {
                code: response.error_code.unwrap_or_default(),
                description: response.description.unwrap_or_default(),
            });
        }

        response.result.ok_or(TelegramError::MissingResult(method))
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u32,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        // Leave headroom over the server-side wait
        let timeout = Duration::from_secs(u64::from(timeout_secs) + 10);
        self.call("getUpdates", &body, timeout).await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<&'static str>,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        let _: serde_json::Value = self.call("sendMessage", &body, SEND_TIMEOUT).await?;
        Ok(())
    }

    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), TelegramError> {
        let body = SetWebhookRequest {
            url,
            secret_token,
            allowed_updates: ALLOWED_UPDATES,
        };
        let _: bool = self.call("setWebhook", &body, SEND_TIMEOUT).await?;
        Ok(())
    }

    /// Required before `getUpdates` works on a bot that had a webhook
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let body = DeleteWebhookRequest {
            drop_pending_updates: false,
        };
        let _: bool = self.call("deleteWebhook", &body, SEND_TIMEOUT).await?;
        Ok(())
    }
}

fn parse_mode(formatting: Formatting) -> Option<&'static str> {
    match formatting {
        Formatting::Plain => None,
        Formatting::Markdown => Some("Markdown"),
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        formatting: Formatting,
    ) -> Result<(), TransportError> {
        TelegramClient::send_message(self, chat_id, text, parse_mode(formatting))
            .await
            .map_err(|e| TransportError::new(e.to_string()))
    }
}
