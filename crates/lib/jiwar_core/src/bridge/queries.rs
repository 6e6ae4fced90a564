//! Membership database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::BridgeError;
use crate::models::bridge::MemberProfile;
use crate::uuid::uuidv7;

/// Resolve a Telegram identity to its membership profile, if linked.
pub async fn find_member_by_telegram_id(
    pool: &PgPool,
    telegram_id: &str,
) -> Result<Option<MemberProfile>, BridgeError> {
    let row = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            String,
            i16,
            Option<i32>,
            String,
            DateTime<Utc>,
        ),
    >(
        "SELECT id::text, user_id, telegram_id, name, grade, matricule, role, join_date \
         FROM members \
         WHERE telegram_id = $1",
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, user_id, telegram_id, name, grade, matricule, role, join_date)| MemberProfile {
            id,
            user_id,
            telegram_id,
            name,
            grade,
            matricule,
            role,
            join_date,
        },
    ))
}

/// Delete a membership profile (orphan reconciliation).
pub async fn delete_member(pool: &PgPool, member_id: &str) -> Result<(), BridgeError> {
    sqlx::query("DELETE FROM members WHERE id = $1::uuid")
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Create a membership profile, returning the member ID.
///
/// The unique index on `telegram_id` turns a racing duplicate signup into
/// `DuplicateMember` instead of a second profile.
pub async fn create_member(
    pool: &PgPool,
    user_id: &str,
    telegram_id: &str,
    name: &str,
    grade: i16,
    matricule: Option<i32>,
) -> Result<String, BridgeError> {
    let id = uuidv7();

    let result = sqlx::query(
        "INSERT INTO members (id, user_id, telegram_id, name, grade, matricule, role) \
         VALUES ($1, $2, $3, $4, $5, $6, 'member')",
    )
    .bind(id)
    .bind(user_id)
    .bind(telegram_id)
    .bind(name)
    .bind(grade)
    .bind(matricule)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(id.to_string()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(BridgeError::DuplicateMember)
        }
        Err(e) => Err(e.into()),
    }
}

/// Create the role/approval record for a provider account.
/// New accounts start unapproved; access control gates on `approved`.
pub async fn create_user_record(
    pool: &PgPool,
    user_id: &str,
    email: &str,
) -> Result<(), BridgeError> {
    sqlx::query(
        "INSERT INTO users (id, email, role, approved, blocked) \
         VALUES ($1, $2, 'member', FALSE, FALSE)",
    )
    .bind(user_id)
    .bind(email)
    .execute(pool)
    .await?;
    Ok(())
}
