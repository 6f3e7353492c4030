//! Visit Activity Repository

use super::{RepoError, RepoResult};
use shared::models::{VisitActivity, VisitActivityCreate};
use sqlx::SqlitePool;

const ACTIVITY_SELECT: &str = "SELECT id, name, points, is_active FROM visit_activity";

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<VisitActivity>> {
    let sql = format!("{ACTIVITY_SELECT} WHERE is_active = 1 ORDER BY name ASC");
    let rows = sqlx::query_as::<_, VisitActivity>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_active_by_name(
    pool: &SqlitePool,
    name: &str,
) -> RepoResult<Option<VisitActivity>> {
    let sql = format!("{ACTIVITY_SELECT} WHERE name = ? AND is_active = 1");
    let row = sqlx::query_as::<_, VisitActivity>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: VisitActivityCreate) -> RepoResult<VisitActivity> {
    if data.points <= 0 {
        return Err(RepoError::Validation("points must be positive".into()));
    }
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO visit_activity (id, name, points, is_active) VALUES (?1, ?2, ?3, 1)")
        .bind(id)
        .bind(&data.name)
        .bind(data.points)
        .execute(pool)
        .await?;

    let sql = format!("{ACTIVITY_SELECT} WHERE id = ?");
    sqlx::query_as::<_, VisitActivity>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create activity".into()))
}
