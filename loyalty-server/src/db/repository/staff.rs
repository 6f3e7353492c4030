//! Staff Account Repository

use super::{RepoError, RepoResult};
use shared::models::{Staff, StaffRole};
use sqlx::SqlitePool;

const STAFF_SELECT: &str =
    "SELECT id, username, display_name, password_hash, role, is_active, created_at, updated_at FROM staff";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{STAFF_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    display_name: &str,
    password_hash: &str,
    role: StaffRole,
) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO staff (id, username, display_name, password_hash, role, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(display_name)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff account".into()))
}
