//! Identity bridge — magic links and membership resolution.
//!
//! Links a Telegram identity to a provider account: the link store
//! (`links`) issues and consumes single-use signup tokens, and the
//! membership queries (`queries`) resolve/create/delete the durable
//! Telegram→account association.

pub mod links;
pub mod queries;

use thiserror::Error;

/// Identity-bridge errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("A member already exists for this Telegram identity")]
    DuplicateMember,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}
