//! Cookie service — set/get/clear httpOnly session cookies.
//!
//! A browser session is the provider session id plus the account it belongs
//! to, split across two cookies: `jiwar_session`, `jiwar_account`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the provider session id.
pub const SESSION_COOKIE: &str = "jiwar_session";
/// Cookie name for the account id the session belongs to.
pub const ACCOUNT_COOKIE: &str = "jiwar_account";

/// Session lifetime mirrored client-side; the provider enforces the real one.
const SESSION_COOKIE_DAYS: i64 = 30;

/// The session a request presented, read from its cookies.
#[derive(Debug, Clone)]
pub struct PresentedSession {
    pub session_id: String,
    pub user_id: String,
}

/// Read the presented session from a cookie jar, if both halves are set.
pub fn presented_session(jar: &CookieJar) -> Option<PresentedSession> {
    let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
    let user_id = jar.get(ACCOUNT_COOKIE)?.value().to_string();
    if session_id.is_empty() || user_id.is_empty() {
        return None;
    }
    Some(PresentedSession {
        session_id,
        user_id,
    })
}

/// Build the httpOnly cookie pair for a fresh session.
pub fn session_cookies(session_id: &str, user_id: &str) -> (Cookie<'static>, Cookie<'static>) {
    (
        build_cookie(SESSION_COOKIE, session_id, Duration::days(SESSION_COOKIE_DAYS)),
        build_cookie(ACCOUNT_COOKIE, user_id, Duration::days(SESSION_COOKIE_DAYS)),
    )
}

/// Build expired cookies to clear session state.
pub fn clear_session_cookies() -> (Cookie<'static>, Cookie<'static>) {
    (
        build_cookie(SESSION_COOKIE, "", Duration::ZERO),
        build_cookie(ACCOUNT_COOKIE, "", Duration::ZERO),
    )
}

fn build_cookie(name: &str, value: &str, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(false) // TODO: set true in production
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(max_age)
        .build()
}
