//! Claim endpoints — the web client presenting tokens and grants.

use axum::Json;
use axum::extract::{Query, State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppResult;
use crate::services::claim::{self, LoginOutcome, SignupSubmission};
use crate::services::cookies;

/// `GET /api/telegram/signup?token=…` query.
#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

/// Prefill data for the signup form.
#[derive(Serialize)]
pub struct SignupPrefillResponse {
    pub telegram_id: String,
    pub telegram_name: Option<String>,
}

/// `POST /api/telegram/signup` body.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub token: String,
    pub name: String,
    pub grade: i16,
    pub matricule: Option<i32>,
}

/// `POST /api/telegram/login` body — the deep link's query parameters.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub secret: String,
}

/// Terminal claim response; the client navigates to `redirect`.
#[derive(Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub user_id: String,
    pub redirect: String,
}

/// `GET /api/telegram/signup` — validate a token and return form prefill.
pub async fn verify_signup_handler(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<SignupPrefillResponse>> {
    let link = claim::verify_signup_token(&state, &query.token).await?;
    Ok(Json(SignupPrefillResponse {
        telegram_id: link.telegram_id,
        telegram_name: link.telegram_name,
    }))
}

/// `POST /api/telegram/signup` — complete signup and open a session.
pub async fn complete_signup_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> AppResult<(CookieJar, Json<ClaimResponse>)> {
    let submission = SignupSubmission {
        token: body.token,
        name: body.name,
        grade: body.grade,
        matricule: body.matricule,
    };
    let session = claim::complete_signup(&state, &submission).await?;

    let (session_cookie, account_cookie) = cookies::session_cookies(&session.id, &session.user_id);
    let jar = jar.add(session_cookie).add(account_cookie);

    Ok((
        jar,
        Json(ClaimResponse {
            success: true,
            user_id: session.user_id,
            // Lands on the pending-approval screen until an admin approves.
            redirect: "/".into(),
        }),
    ))
}

/// `POST /api/telegram/login` — exchange a login grant for a session.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ClaimResponse>)> {
    let presented = cookies::presented_session(&jar);
    let outcome = claim::login_with_grant(&state, presented, &body.user_id, &body.secret).await?;

    let jar = match outcome {
        LoginOutcome::Session(session) => {
            let (session_cookie, account_cookie) =
                cookies::session_cookies(&session.id, &session.user_id);
            jar.add(session_cookie).add(account_cookie)
        }
        LoginOutcome::AlreadyActive => jar,
    };

    Ok((
        jar,
        Json(ClaimResponse {
            success: true,
            user_id: body.user_id,
            redirect: "/activities".into(),
        }),
    ))
}
