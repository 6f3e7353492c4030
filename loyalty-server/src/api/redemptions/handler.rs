//! Redemption Handlers

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::redemption as redemption_repo;
use crate::loyalty::redemption;
use crate::utils::{AppError, AppResult};

use shared::models::{RedemptionDetail, RedemptionStatus, RewardRedemption};

/// GET /api/redemptions/mine - the member's own redemptions, newest first
///
/// Statuses are reported as effective at read time, so a stored `active`
/// row past its deadline comes back `expired` without any write.
pub async fn mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<RedemptionDetail>>> {
    let member_id = user
        .member_id()
        .ok_or_else(|| AppError::Forbidden("Only members have redemptions".to_string()))?;

    let now = shared::util::now_millis();
    let mut rows = redemption_repo::find_by_member(&state.pool, member_id).await?;
    for row in &mut rows {
        if row.status == RedemptionStatus::Active && row.expires_at <= now {
            row.status = RedemptionStatus::Expired;
        }
    }
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    /// Last characters of the code, as read off the member's screen
    pub fragment: String,
}

/// POST /api/redemptions/accept - finalize a code by its tail (staff)
pub async fn accept(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AcceptRequest>,
) -> AppResult<Json<RewardRedemption>> {
    let accepted = redemption::accept_by_fragment(
        &state.pool,
        &user,
        &req.fragment,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(accepted))
}
