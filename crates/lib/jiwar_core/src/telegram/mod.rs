//! Telegram bot transport.
//!
//! Outbound side of the bridge: sending link-bearing messages, answering
//! callback queries, deleting stale messages, registering commands. The
//! trait seam keeps the webhook pipeline testable without a live bot.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::telegram::{BotCommand, InlineKeyboardMarkup};

/// Bot transport errors.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Http(String),

    #[error("Telegram API error: {0}")]
    Api(String),
}

/// Outbound operations against the Telegram Bot API.
#[async_trait]
pub trait BotTransport: Send + Sync {
    /// Send a text message, optionally with an inline keyboard.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError>;

    /// Send a Markdown-formatted message without a keyboard.
    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Acknowledge a callback query (stops the client's loading animation).
    async fn answer_callback_query(&self, callback_id: &str, text: &str)
    -> Result<(), TelegramError>;

    /// Delete a previously sent message.
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError>;

    /// Register the bot's command menu.
    async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError>;
}
