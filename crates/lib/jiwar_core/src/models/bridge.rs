//! Identity-bridge domain models.
//!
//! These are internal domain models; the API crate defines its own
//! request/response shapes on top of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a magic link. A link is claimable only while `Pending`;
/// consumption flips it to `Consumed` with a single conditional update, so
/// a replayed claim cannot win twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Consumed,
}

impl LinkStatus {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "pending",
            LinkStatus::Consumed => "consumed",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LinkStatus::Pending),
            "consumed" => Some(LinkStatus::Consumed),
            _ => None,
        }
    }
}

/// A single pending signup attempt, stored in `magic_links`.
///
/// The plaintext token never lands in the database — `token_hash` holds its
/// SHA-256. `telegram_name` is a snapshot of the display name at issuance,
/// used to pre-fill the signup form.
#[derive(Debug, Clone)]
pub struct MagicLink {
    pub id: String,
    pub kind: String,
    pub telegram_id: String,
    pub telegram_name: Option<String>,
    pub status: LinkStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl MagicLink {
    /// Whether the link is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Durable link between a Telegram identity and a provider account,
/// stored in `members`.
///
/// `user_id` may reference a provider account that no longer exists; the
/// bridge detects that at login-link time and deletes the row (orphan
/// reconciliation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: String,
    pub user_id: String,
    pub telegram_id: String,
    pub name: String,
    pub grade: i16,
    pub matricule: Option<i32>,
    pub role: String,
    pub join_date: DateTime<Utc>,
}

/// Role/approval record shadowing a provider account, stored in `users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub role: String,
    pub approved: bool,
    pub blocked: bool,
}

/// One-time login secret issued by the account provider for an account.
/// Transient — embedded in a login URL, never stored on our side.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user_id: String,
    pub secret: String,
}

/// A session established at the account provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    pub id: String,
    pub user_id: String,
}
