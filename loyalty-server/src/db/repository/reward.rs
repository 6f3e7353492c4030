//! Reward Catalog Repository

use super::{RepoError, RepoResult};
use shared::models::{Reward, RewardCreate, RewardUpdate};
use sqlx::SqlitePool;

const REWARD_SELECT: &str =
    "SELECT id, title, points_required, image_url, is_active, created_at, updated_at FROM reward";

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Reward>> {
    let sql = format!("{REWARD_SELECT} WHERE is_active = 1 ORDER BY points_required ASC");
    let rows = sqlx::query_as::<_, Reward>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reward>> {
    let sql = format!("{REWARD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reward>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: RewardCreate) -> RepoResult<Reward> {
    if data.points_required <= 0 {
        return Err(RepoError::Validation(
            "points_required must be positive".into(),
        ));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reward (id, title, points_required, image_url, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(data.points_required)
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reward".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: RewardUpdate) -> RepoResult<Reward> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reward SET title = COALESCE(?1, title), points_required = COALESCE(?2, points_required), image_url = COALESCE(?3, image_url), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.title)
    .bind(data.points_required)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reward {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reward {id} not found")))
}
