//! Access-request pipeline.
//!
//! The flow behind both `/start` and the refresh callback: resolve the
//! Telegram identity to a membership profile, then either mint a login
//! grant (linked + live account), reconcile an orphan profile and fall
//! back to signup, or issue a fresh signup link (unlinked).

use tracing::{error, info, warn};
use url::Url;

use jiwar_core::bridge::{links, queries};
use jiwar_core::models::bridge::LoginGrant;
use jiwar_core::models::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};
use jiwar_core::provider::ProviderError;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::messages;

/// Handle one access request end-to-end and answer in the chat.
///
/// Every failure path still leaves the user with a terminal message: if the
/// pipeline errors, a generic fallback is sent (best-effort) instead.
pub async fn handle_access_request(
    state: &AppState,
    chat_id: i64,
    telegram_id: &str,
    full_name: &str,
    first_name: &str,
) {
    if let Err(e) = issue_and_send(state, chat_id, telegram_id, full_name, first_name).await {
        error!(telegram_id, error = %e, "access request failed");
        if let Err(send_err) = state
            .bot
            .send_message(chat_id, messages::ACCESS_FAILED, None)
            .await
        {
            warn!(chat_id, error = %send_err, "could not deliver failure message");
        }
    }
}

/// Resolve, mint or issue, and send the link message.
async fn issue_and_send(
    state: &AppState,
    chat_id: i64,
    telegram_id: &str,
    full_name: &str,
    first_name: &str,
) -> AppResult<()> {
    if let Some(member) = queries::find_member_by_telegram_id(&state.pool, telegram_id).await? {
        match state.provider.create_login_token(&member.user_id).await {
            Ok(grant) => {
                let url = login_url(&state.config.web_app_url, &grant)?;
                info!(telegram_id, name = %full_name, "issued login link");
                return send_link(state, chat_id, first_name, true, &url).await;
            }
            Err(ProviderError::NotFound) => {
                // Orphan profile: the linked account is gone. Clean up and
                // fall through to signup; cleanup failure must not block the
                // user — the same path just repeats on the next attempt.
                warn!(
                    telegram_id,
                    member_id = %member.id,
                    user_id = %member.user_id,
                    "orphan member profile, deleting"
                );
                if let Err(e) = queries::delete_member(&state.pool, &member.id).await {
                    warn!(member_id = %member.id, error = %e, "orphan cleanup failed");
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    let issued = links::issue_access_link(&state.pool, telegram_id, full_name).await?;
    let url = signup_url(&state.config.web_app_url, &issued.token)?;
    info!(telegram_id, name = %full_name, link_id = %issued.link.id, "issued signup link");
    send_link(state, chat_id, first_name, false, &url).await
}

/// Send the greeting with the link button and the refresh button.
async fn send_link(
    state: &AppState,
    chat_id: i64,
    first_name: &str,
    is_login: bool,
    url: &str,
) -> AppResult<()> {
    let (text, button_text) = if is_login {
        (messages::greeting_login(first_name), messages::BTN_LOGIN)
    } else {
        (messages::greeting_signup(first_name), messages::BTN_SIGNUP)
    };

    let markup = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::web_app(button_text, url)],
            vec![InlineKeyboardButton::callback(
                messages::BTN_REFRESH,
                "refresh_link",
            )],
        ],
    };

    state.bot.send_message(chat_id, &text, Some(markup)).await?;
    Ok(())
}

/// Build the login deep link: `<origin>/telegram-login?userId=…&secret=…`.
fn login_url(web_app_url: &str, grant: &LoginGrant) -> AppResult<String> {
    build_url(
        web_app_url,
        "telegram-login",
        &[("userId", grant.user_id.as_str()), ("secret", &grant.secret)],
    )
}

/// Build the signup deep link: `<origin>/telegram-signup?token=…`.
fn signup_url(web_app_url: &str, token: &str) -> AppResult<String> {
    build_url(web_app_url, "telegram-signup", &[("token", token)])
}

fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> AppResult<String> {
    let full = format!("{}/{path}", base.trim_end_matches('/'));
    let url = Url::parse_with_params(&full, params)
        .map_err(|e| AppError::Internal(format!("bad web app url {base:?}: {e}")))?;
    Ok(url.to_string())
}
