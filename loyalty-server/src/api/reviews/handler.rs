//! Review Handlers

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::loyalty::reviews::{self, ReviewEligibility};
use crate::utils::{AppError, AppResult};

use shared::models::{Review, ReviewSubmit};

fn member_id_of(user: &CurrentUser) -> Result<i64, AppError> {
    user.member_id()
        .ok_or_else(|| AppError::Forbidden("Only members can post reviews".to_string()))
}

/// GET /api/reviews/eligibility - can this member review right now?
///
/// Advisory only; submission re-checks the gate.
pub async fn eligibility(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ReviewEligibility>> {
    let member_id = member_id_of(&user)?;
    let result = reviews::eligibility(
        &state.pool,
        state.policy(),
        member_id,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/reviews - submit a mood review
pub async fn submit(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ReviewSubmit>,
) -> AppResult<Json<Review>> {
    let member_id = member_id_of(&user)?;
    let stored = reviews::submit(
        &state.pool,
        state.policy(),
        member_id,
        req.mood,
        req.comment.as_deref(),
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(stored))
}

/// GET /api/reviews/mine - the member's own reviews, newest first
pub async fn mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Review>>> {
    let member_id = member_id_of(&user)?;
    Ok(Json(reviews::history(&state.pool, member_id).await?))
}
