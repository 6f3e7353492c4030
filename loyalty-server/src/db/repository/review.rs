//! Review Repository

use super::{RepoError, RepoResult};
use shared::models::Review;
use sqlx::SqlitePool;

const REVIEW_SELECT: &str = "SELECT id, member_id, mood, comment, created_at FROM review";

pub async fn insert(
    pool: &SqlitePool,
    member_id: i64,
    mood: i64,
    comment: Option<&str>,
    timestamp: i64,
) -> RepoResult<Review> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO review (id, member_id, mood, comment, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(member_id)
    .bind(mood)
    .bind(comment)
    .bind(timestamp)
    .execute(pool)
    .await?;

    let sql = format!("{REVIEW_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to insert review".into()))
}

pub async fn find_by_member(pool: &SqlitePool, member_id: i64) -> RepoResult<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE member_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Review>(&sql)
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Count reviews in the trailing window `[since, now]`.
pub async fn count_since(pool: &SqlitePool, member_id: i64, since: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE member_id = ? AND created_at >= ?")
            .bind(member_id)
            .bind(since)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
