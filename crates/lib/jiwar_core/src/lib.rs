//! # jiwar_core
//!
//! Core domain logic for Jiwar: the Telegram identity bridge (magic links,
//! membership resolution, account-provider client, bot transport) shared by
//! `jiwar_api` and the server binary.

pub mod bridge;
pub mod migrate;
pub mod models;
pub mod provider;
pub mod telegram;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
