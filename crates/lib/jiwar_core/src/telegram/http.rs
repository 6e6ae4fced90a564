//! HTTP implementation of [`BotTransport`] against `api.telegram.org`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{BotTransport, TelegramError};
use crate::models::telegram::{BotCommand, InlineKeyboardMarkup};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot transport backed by the Telegram Bot API.
pub struct HttpBotTransport {
    client: Client,
    base_url: String,
}

/// Envelope every Bot API method returns.
#[derive(Deserialize)]
struct ApiEnvelope {
    ok: bool,
    description: Option<String>,
}

impl HttpBotTransport {
    pub fn new(bot_token: &str) -> Self {
        Self::with_base_url(TELEGRAM_API_URL, bot_token)
    }

    /// Point the transport at a different API origin (test servers).
    pub fn with_base_url(base_url: &str, bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{bot_token}", base_url.trim_end_matches('/')),
        }
    }

    /// Call one Bot API method with a JSON payload.
    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<(), TelegramError> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TelegramError::Http(format!("{method}: {e}")))?;

        let envelope: ApiEnvelope = resp
            .json()
            .await
            .map_err(|e| TelegramError::Http(format!("{method}: response parse error: {e}")))?;

        if !envelope.ok {
            let description = envelope.description.unwrap_or_default();
            debug!(method, %description, "bot API rejected call");
            return Err(TelegramError::Api(format!("{method}: {description}")));
        }
        Ok(())
    }
}

#[async_trait]
impl BotTransport for HttpBotTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let mut payload = serde_json::json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = reply_markup {
            payload["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| TelegramError::Api(format!("sendMessage: markup encode: {e}")))?;
        }
        self.call("sendMessage", payload).await
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.call(
            "sendMessage",
            serde_json::json!({ "chat_id": chat_id, "text": text, "parse_mode": "Markdown" }),
        )
        .await
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        self.call(
            "answerCallbackQuery",
            serde_json::json!({ "callback_query_id": callback_id, "text": text }),
        )
        .await
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.call(
            "deleteMessage",
            serde_json::json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
    }

    async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        self.call(
            "setMyCommands",
            serde_json::json!({ "commands": commands }),
        )
        .await
    }
}
