//! Account-provider client.
//!
//! The provider owns account identities and sessions; we only hold the
//! role/approval shadow rows. The trait seam lets the webhook pipeline and
//! claim flows run against an in-test mock instead of a live provider.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::bridge::{LoginGrant, ProviderSession};

/// Account-provider errors.
///
/// `NotFound` on token minting is the orphan signal — the caller recovers
/// from it locally and never surfaces it. `SessionActive` is the provider's
/// own idempotency signal on session creation and is also not a failure.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Subject not found")]
    NotFound,

    #[error("Account already exists")]
    Conflict,

    #[error("Invalid or expired secret")]
    Unauthorized,

    #[error("A session is already active")]
    SessionActive,

    #[error("Provider request failed: {0}")]
    Http(String),

    #[error("Unexpected provider response: {0}")]
    Unexpected(String),
}

/// Operations the bridge needs from the account provider.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Mint a one-time login secret for an existing account.
    /// `NotFound` means the account no longer exists (orphan profile).
    async fn create_login_token(&self, user_id: &str) -> Result<LoginGrant, ProviderError>;

    /// Create an account identity with a chosen id. `Conflict` when an
    /// account for the address already exists.
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), ProviderError>;

    /// Open a session from address + password (signup flow).
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError>;

    /// Exchange a one-time login secret for a session (login claim).
    async fn create_session(
        &self,
        user_id: &str,
        secret: &str,
    ) -> Result<ProviderSession, ProviderError>;

    /// Look up an existing session. `None` when it no longer exists.
    async fn get_session(&self, session_id: &str)
    -> Result<Option<ProviderSession>, ProviderError>;

    /// Destroy a session. Deleting an already-gone session is not an error.
    async fn delete_session(&self, session_id: &str) -> Result<(), ProviderError>;
}
