//! Telegram webhook dispatcher.
//!
//! Receives bot updates and routes the two shapes the bridge cares about —
//! a start command and the `refresh_link` callback — into the access
//! pipeline. Everything else is acknowledged and ignored; Telegram retries
//! deliveries that don't get a 2xx, so the answer is 200 even for updates
//! we can't parse.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, warn};

use jiwar_core::models::telegram::{CallbackQuery, IncomingMessage, Update};

use crate::AppState;
use crate::messages;
use crate::services::access;

/// `POST /api/telegram/webhook` — bot update sink.
pub async fn telegram_webhook_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let update: Update = match serde_json::from_value(body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "unparseable webhook update");
            return StatusCode::OK;
        }
    };

    if let Some(message) = update.message {
        handle_message(&state, message).await;
    } else if let Some(callback) = update.callback_query {
        handle_callback(&state, callback).await;
    } else {
        debug!(update_id = update.update_id, "ignoring update");
    }

    StatusCode::OK
}

/// A `/start` command (or the legacy keyboard button) kicks off the pipeline.
async fn handle_message(state: &AppState, message: IncomingMessage) {
    let is_start = matches!(
        message.text.as_deref(),
        Some("/start") | Some(messages::KEYBOARD_START_TEXT)
    );
    if !is_start {
        return;
    }
    let Some(from) = message.from else {
        debug!(chat_id = message.chat.id, "start message without sender");
        return;
    };

    let full_name = from.full_name();
    let first_name = from.first_name.clone().unwrap_or_default();
    access::handle_access_request(
        state,
        message.chat.id,
        &from.id.to_string(),
        &full_name,
        &first_name,
    )
    .await;
}

/// A `refresh_link` press: acknowledge, delete the stale message, re-run
/// the pipeline from scratch.
async fn handle_callback(state: &AppState, callback: CallbackQuery) {
    if callback.data.as_deref() != Some("refresh_link") {
        debug!(callback_id = %callback.id, "ignoring callback");
        return;
    }
    let Some(message) = callback.message else {
        debug!(callback_id = %callback.id, "refresh callback without message context");
        return;
    };

    // Stop the client's loading animation.
    if let Err(e) = state
        .bot
        .answer_callback_query(&callback.id, messages::REFRESHING)
        .await
    {
        warn!(callback_id = %callback.id, error = %e, "could not answer callback");
    }

    // Delete the old message to keep the chat clean.
    if let Some(message_id) = message.message_id {
        if let Err(e) = state.bot.delete_message(message.chat.id, message_id).await {
            warn!(message_id, error = %e, "could not delete old link message");
        }
    }

    let full_name = callback.from.full_name();
    let first_name = callback.from.first_name.clone().unwrap_or_default();
    access::handle_access_request(
        state,
        message.chat.id,
        &callback.from.id.to_string(),
        &full_name,
        &first_name,
    )
    .await;
}
