//! Magic-link store.
//!
//! Single-use, time-boxed signup credentials. Issuance writes one row per
//! request — concurrent requests for the same Telegram identity produce
//! independent links, each valid until its own consumption or expiry.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use super::BridgeError;
use crate::models::bridge::{LinkStatus, MagicLink};
use crate::uuid::uuidv7;

/// Signup link lifetime: 15 minutes.
const ACCESS_LINK_TTL_MINUTES: i64 = 15;

/// Generate a random link token (32 bytes, URL-safe base64).
fn generate_link_token() -> String {
    use base64::Engine;
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hash a link token for storage.
fn hash_link_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A freshly issued link: the plaintext token (for the URL) plus the record.
#[derive(Debug, Clone)]
pub struct IssuedLink {
    pub token: String,
    pub link: MagicLink,
}

/// Issue a new signup link for a Telegram identity.
///
/// Never touches existing links for the same identity — an unconsumed
/// sibling simply expires on its own.
pub async fn issue_access_link(
    pool: &PgPool,
    telegram_id: &str,
    telegram_name: &str,
) -> Result<IssuedLink, BridgeError> {
    let token = generate_link_token();
    let token_hash = hash_link_token(&token);
    let id = uuidv7();
    let expires_at = Utc::now() + Duration::minutes(ACCESS_LINK_TTL_MINUTES);

    let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        "INSERT INTO magic_links (id, token_hash, kind, telegram_id, telegram_name, status, expires_at) \
         VALUES ($1, $2, 'access', $3, $4, 'pending', $5) \
         RETURNING created_at",
    )
    .bind(id)
    .bind(&token_hash)
    .bind(telegram_id)
    .bind(telegram_name)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(IssuedLink {
        token,
        link: MagicLink {
            id: id.to_string(),
            kind: "access".to_string(),
            telegram_id: telegram_id.to_string(),
            telegram_name: Some(telegram_name.to_string()),
            status: LinkStatus::Pending,
            expires_at,
            created_at,
            consumed_at: None,
        },
    })
}

/// Find a pending link by its plaintext token.
///
/// Consumed links are not returned — a replayed token reads as missing.
/// Expiry is NOT filtered here so callers can distinguish an expired link
/// from one that never existed.
pub async fn find_pending_link(
    pool: &PgPool,
    token: &str,
) -> Result<Option<MagicLink>, BridgeError> {
    let token_hash = hash_link_token(token);

    let row = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            Option<String>,
            DateTime<Utc>,
            DateTime<Utc>,
        ),
    >(
        "SELECT id::text, kind, telegram_id, telegram_name, expires_at, created_at \
         FROM magic_links \
         WHERE token_hash = $1 AND status = 'pending'",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, kind, telegram_id, telegram_name, expires_at, created_at)| MagicLink {
            id,
            kind,
            telegram_id,
            telegram_name,
            status: LinkStatus::Pending,
            expires_at,
            created_at,
            consumed_at: None,
        },
    ))
}

/// Consume a link: flip `pending` → `consumed` in one conditional update.
///
/// Returns `false` when the link was already consumed by a racing claim
/// (or never existed) — exactly one caller can ever observe `true`.
pub async fn consume_link(pool: &PgPool, link_id: &str) -> Result<bool, BridgeError> {
    let result = sqlx::query(
        "UPDATE magic_links SET status = 'consumed', consumed_at = now() \
         WHERE id = $1::uuid AND status = 'pending'",
    )
    .bind(link_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
