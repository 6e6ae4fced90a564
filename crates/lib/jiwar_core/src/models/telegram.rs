//! Telegram Bot API payload types.
//!
//! Only the fields the bridge actually reads are modeled; everything else in
//! an update is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Inbound webhook update. At most one of `message` / `callback_query` is
/// set for the updates we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: Option<i64>,
    pub message: Option<IncomingMessage>,
    pub callback_query: Option<CallbackQuery>,
}

/// A message sent to the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: Option<i64>,
    pub chat: Chat,
    pub text: Option<String>,
    pub from: Option<TelegramUser>,
}

/// A button press on an inline keyboard we previously sent.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub message: Option<IncomingMessage>,
    pub from: TelegramUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// The Telegram account behind a message or callback.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TelegramUser {
    /// "First Last", trimmed — the display-name snapshot stored on links.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// Inline keyboard attached to an outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A single inline-keyboard button. Exactly one of `url` / `web_app` /
/// `callback_data` should be set.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// Button that opens a URL inside Telegram's embedded browser.
    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            web_app: Some(WebAppInfo { url: url.into() }),
            callback_data: None,
        }
    }

    /// Button that fires a callback query back at the webhook.
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            web_app: None,
            callback_data: Some(data.into()),
        }
    }
}

/// Web-app launch target for a button.
#[derive(Debug, Clone, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

/// A bot command registered via `setMyCommands`.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_command_update() {
        let raw = serde_json::json!({
            "update_id": 1001,
            "message": {
                "message_id": 7,
                "chat": { "id": 555 },
                "text": "/start",
                "from": { "id": 12345, "first_name": "Amina", "last_name": "B" }
            }
        });

        let update: Update = serde_json::from_value(raw).expect("parse update");
        let msg = update.message.expect("message present");
        assert_eq!(msg.chat.id, 555);
        assert_eq!(msg.text.as_deref(), Some("/start"));
        let from = msg.from.expect("from present");
        assert_eq!(from.id, 12345);
        assert_eq!(from.full_name(), "Amina B");
    }

    #[test]
    fn parses_refresh_callback_update() {
        let raw = serde_json::json!({
            "callback_query": {
                "id": "cbq-1",
                "data": "refresh_link",
                "message": { "message_id": 42, "chat": { "id": 555 } },
                "from": { "id": 67890, "first_name": "Yassine" }
            }
        });

        let update: Update = serde_json::from_value(raw).expect("parse update");
        let cbq = update.callback_query.expect("callback present");
        assert_eq!(cbq.data.as_deref(), Some("refresh_link"));
        assert_eq!(cbq.from.id, 67890);
        assert_eq!(cbq.from.full_name(), "Yassine");
        assert_eq!(cbq.message.and_then(|m| m.message_id), Some(42));
    }

    #[test]
    fn keyboard_buttons_serialize_without_null_fields() {
        let markup = InlineKeyboardMarkup {
            inline_keyboard: vec![
                vec![InlineKeyboardButton::web_app("open", "https://example.test/x")],
                vec![InlineKeyboardButton::callback("refresh", "refresh_link")],
            ],
        };

        let json = serde_json::to_value(&markup).expect("serialize markup");
        let open = &json["inline_keyboard"][0][0];
        assert_eq!(open["web_app"]["url"], "https://example.test/x");
        assert!(open.get("url").is_none());
        assert!(open.get("callback_data").is_none());

        let refresh = &json["inline_keyboard"][1][0];
        assert_eq!(refresh["callback_data"], "refresh_link");
        assert!(refresh.get("web_app").is_none());
    }
}
