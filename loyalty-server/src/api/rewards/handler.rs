//! Reward Catalog Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::reward;
use crate::loyalty::redemption;
use crate::utils::{AppError, AppResult};

use shared::models::{Reward, RewardCreate, RewardRedemption, RewardUpdate};

/// GET /api/rewards - active catalog, cheapest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reward>>> {
    Ok(Json(reward::find_active(&state.pool).await?))
}

/// POST /api/rewards - add a catalog entry (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RewardCreate>,
) -> AppResult<Json<Reward>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Reward title is required".to_string()));
    }
    let created = reward::create(&state.pool, payload).await?;
    tracing::info!(reward_id = created.id, "Reward created");
    Ok(Json(created))
}

/// PUT /api/rewards/{id} - update or retire a catalog entry (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RewardUpdate>,
) -> AppResult<Json<Reward>> {
    Ok(Json(reward::update(&state.pool, id, payload).await?))
}

/// POST /api/rewards/{id}/redeem - spend points on a reward (member)
///
/// Not idempotent: a second call spends points again (or is rejected by
/// the duplicate-active guard while the first code is live).
pub async fn redeem(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<RewardRedemption>> {
    let member_id = user
        .member_id()
        .ok_or_else(|| AppError::Forbidden("Only members can redeem rewards".to_string()))?;

    let created = redemption::redeem(
        &state.pool,
        state.policy(),
        member_id,
        id,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(created))
}
