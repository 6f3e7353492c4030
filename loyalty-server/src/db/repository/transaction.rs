//! Points Transaction Repository
//!
//! The ledger is append-only: this module exposes inserts and reads only.

use super::{RepoError, RepoResult};
use shared::models::{PointsSummary, PointsTransaction, TransactionKind};
use sqlx::SqlitePool;

const TX_SELECT: &str =
    "SELECT id, member_id, kind, amount, description, created_at FROM points_transaction";

pub async fn insert(
    pool: &SqlitePool,
    member_id: i64,
    kind: TransactionKind,
    amount: i64,
    description: &str,
    timestamp: i64,
) -> RepoResult<PointsTransaction> {
    if amount <= 0 {
        return Err(RepoError::Validation(format!(
            "Transaction amount must be positive, got {amount}"
        )));
    }
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO points_transaction (id, member_id, kind, amount, description, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(member_id)
    .bind(kind)
    .bind(amount)
    .bind(description)
    .bind(timestamp)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to insert transaction".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PointsTransaction>> {
    let sql = format!("{TX_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, PointsTransaction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Full history, newest first.
pub async fn find_by_member(
    pool: &SqlitePool,
    member_id: i64,
) -> RepoResult<Vec<PointsTransaction>> {
    let sql = format!("{TX_SELECT} WHERE member_id = ? ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, PointsTransaction>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Both ledger aggregates in one query. Earned counts `earn` rows only;
/// spendable nets spends against earns.
pub async fn summarize(pool: &SqlitePool, member_id: i64) -> RepoResult<PointsSummary> {
    let (earned_total, spendable): (i64, i64) = sqlx::query_as(
        "SELECT
            COALESCE(SUM(CASE WHEN kind = 'earn' THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN kind = 'earn' THEN amount ELSE -amount END), 0)
         FROM points_transaction WHERE member_id = ?",
    )
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(PointsSummary {
        earned_total,
        spendable,
    })
}

/// Count transactions of any kind in the trailing window `[since, now]`.
pub async fn count_since(pool: &SqlitePool, member_id: i64, since: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM points_transaction WHERE member_id = ? AND created_at >= ?",
    )
    .bind(member_id)
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Count earn transactions since a timestamp (visit-credit cap).
pub async fn count_earn_since(pool: &SqlitePool, member_id: i64, since: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM points_transaction WHERE member_id = ? AND kind = 'earn' AND created_at >= ?",
    )
    .bind(member_id)
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
