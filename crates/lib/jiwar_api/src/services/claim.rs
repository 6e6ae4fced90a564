//! Claim flows — a browser presenting a magic token or a login grant.
//!
//! Two branches: the login claim exchanges a one-time provider secret for a
//! session; the signup claim turns a pending magic link into an account
//! identity, an approval record, and a membership profile, then consumes
//! the link.

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

use jiwar_core::bridge::{links, queries};
use jiwar_core::models::bridge::{MagicLink, ProviderSession};
use jiwar_core::provider::ProviderError;
use jiwar_core::uuid::uuidv7;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::messages;
use crate::services::cookies::PresentedSession;

/// Highest membership grade selectable at signup.
const GRADE_MAX: i16 = 5;

/// Result of a login claim.
pub enum LoginOutcome {
    /// A fresh session was established; set its cookies.
    Session(ProviderSession),
    /// A session for this account is already active; nothing to set.
    AlreadyActive,
}

/// Login branch: exchange `(user_id, secret)` for a session.
///
/// A session presented for a *different* account is destroyed first; one
/// for the *same* account short-circuits to success. The provider's
/// "session is active" rejection also counts as success.
pub async fn login_with_grant(
    state: &AppState,
    presented: Option<PresentedSession>,
    user_id: &str,
    secret: &str,
) -> AppResult<LoginOutcome> {
    if let Some(current) = presented {
        if current.user_id == user_id {
            match state.provider.get_session(&current.session_id).await {
                Ok(Some(session)) if session.user_id == user_id => {
                    info!(user_id, "session already active, short-circuiting");
                    return Ok(LoginOutcome::AlreadyActive);
                }
                // Stale cookie — fall through to the exchange.
                Ok(_) => {}
                Err(e) => {
                    warn!(user_id, error = %e, "session check failed, attempting exchange");
                }
            }
        } else {
            // A device must not silently retain an unrelated session.
            info!(
                presented = %current.user_id,
                requested = user_id,
                "destroying session for a different account"
            );
            if let Err(e) = state.provider.delete_session(&current.session_id).await {
                warn!(session_id = %current.session_id, error = %e, "could not destroy session");
            }
        }
    }

    match state.provider.create_session(user_id, secret).await {
        Ok(session) => {
            info!(user_id, "login grant exchanged");
            Ok(LoginOutcome::Session(session))
        }
        Err(ProviderError::SessionActive) => {
            info!(user_id, "provider reports an active session");
            Ok(LoginOutcome::AlreadyActive)
        }
        // The grant was consumed or timed out; the user needs a fresh link.
        Err(ProviderError::Unauthorized | ProviderError::NotFound) => {
            Err(AppError::Unauthorized(messages::GRANT_EXPIRED.into()))
        }
        Err(e) => {
            warn!(user_id, error = %e, "login grant exchange failed");
            Err(AppError::Provider(e.to_string()))
        }
    }
}

/// Signup form fields plus the magic token authorizing them.
#[derive(Debug, Clone)]
pub struct SignupSubmission {
    pub token: String,
    pub name: String,
    pub grade: i16,
    pub matricule: Option<i32>,
}

/// Validate a presented signup token without consuming it.
///
/// Read-only: a failed prefill performs no writes. Consumed links read as
/// missing; expiry is reported distinctly.
pub async fn verify_signup_token(state: &AppState, token: &str) -> AppResult<MagicLink> {
    let link = links::find_pending_link(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound(messages::LINK_INVALID.into()))?;

    if link.is_expired(Utc::now()) {
        return Err(AppError::Expired(messages::LINK_EXPIRED.into()));
    }
    Ok(link)
}

/// Signup branch: create identity + approval record + membership profile,
/// consume the link, and open a session.
///
/// The three writes are not one transaction (two live at the provider);
/// each is tagged with a shared `signup_ref` so a partial sequence can be
/// traced. The new profile starts unapproved.
pub async fn complete_signup(
    state: &AppState,
    submission: &SignupSubmission,
) -> AppResult<ProviderSession> {
    let name = submission.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if !(0..=GRADE_MAX).contains(&submission.grade) {
        return Err(AppError::Validation(format!(
            "grade must be between 0 and {GRADE_MAX}"
        )));
    }

    let link = verify_signup_token(state, &submission.token).await?;

    let signup_ref = uuidv7();
    let user_id = uuidv7().to_string();
    let email = synthesized_address(&link.telegram_id);
    let password = generate_password();

    match state
        .provider
        .create_account(&user_id, &email, &password, name)
        .await
    {
        Ok(()) => {}
        Err(ProviderError::Conflict) => {
            // An account for this address exists but no profile does;
            // recovery needs administrative privileges.
            warn!(signup_ref = %signup_ref, telegram_id = %link.telegram_id, "account address already registered");
            return Err(AppError::Conflict(messages::ALREADY_REGISTERED.into()));
        }
        Err(e) => {
            warn!(signup_ref = %signup_ref, error = %e, "account creation failed");
            return Err(AppError::Provider(e.to_string()));
        }
    }
    info!(signup_ref = %signup_ref, user_id = %user_id, "account identity created");

    queries::create_user_record(&state.pool, &user_id, &email).await?;
    info!(signup_ref = %signup_ref, user_id = %user_id, "approval record created");

    let member_id = queries::create_member(
        &state.pool,
        &user_id,
        &link.telegram_id,
        name,
        submission.grade,
        submission.matricule,
    )
    .await?;
    info!(signup_ref = %signup_ref, member_id = %member_id, "member profile created");

    if !links::consume_link(&state.pool, &link.id).await? {
        // A concurrent claim won the conditional update after our check.
        warn!(signup_ref = %signup_ref, link_id = %link.id, "link consumed by a concurrent claim");
        return Err(AppError::NotFound(messages::LINK_INVALID.into()));
    }

    let session = state
        .provider
        .create_email_session(&email, &password)
        .await
        .map_err(|e| {
            warn!(signup_ref = %signup_ref, error = %e, "session creation after signup failed");
            AppError::Provider(e.to_string())
        })?;

    notify_admins(state, name, submission.matricule, submission.grade).await;

    info!(signup_ref = %signup_ref, user_id = %user_id, "signup completed");
    Ok(session)
}

/// Tell the configured admins about a completed signup. Best-effort per
/// recipient; never fails the signup.
async fn notify_admins(state: &AppState, name: &str, matricule: Option<i32>, grade: i16) {
    if state.config.admin_chat_ids.is_empty() {
        return;
    }
    let text = messages::admin_signup_notification(name, matricule, grade);
    for &chat_id in &state.config.admin_chat_ids {
        if let Err(e) = state.bot.send_markdown(chat_id, &text).await {
            warn!(chat_id, error = %e, "admin notification failed");
        }
    }
}

/// Deterministic provider address for a Telegram identity.
fn synthesized_address(telegram_id: &str) -> String {
    format!("telegram_{telegram_id}@jiwar.local")
}

/// Random account password (64 alphanumeric chars); the user never sees it.
fn generate_password() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_address_is_deterministic_per_identity() {
        assert_eq!(
            synthesized_address("12345"),
            "telegram_12345@jiwar.local"
        );
        assert_ne!(synthesized_address("12345"), synthesized_address("12346"));
    }

    #[test]
    fn generated_passwords_are_long_and_unique() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
