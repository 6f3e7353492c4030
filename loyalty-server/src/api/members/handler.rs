//! Member API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::member;
use crate::loyalty::{Rank, ledger, rank};
use crate::utils::{AppError, AppResult};

use shared::models::{Member, MemberCreate, PointsTransaction};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Everything the member app's home screen needs in one response.
#[derive(Debug, Serialize)]
pub struct MemberSummary {
    pub member: Member,
    pub earned_total: i64,
    pub spendable: i64,
    pub rank: &'static Rank,
    pub next_rank: Option<&'static Rank>,
    pub points_to_next: i64,
    pub transactions: Vec<PointsTransaction>,
}

/// GET /api/members?q= - list members, optionally filtered (staff)
///
/// `q` matches phone, card number or name.
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Member>>> {
    let members = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => member::search(&state.pool, q).await?,
        _ => member::find_all(&state.pool).await?,
    };
    Ok(Json(members))
}

/// POST /api/members - register a member at the door (staff)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Member name is required".to_string()));
    }
    let created = member::create(&state.pool, payload).await?;
    tracing::info!(member_id = created.id, "Member registered");
    Ok(Json(created))
}

/// GET /api/members/{id}/summary - points, rank and history
///
/// Members can read their own summary; staff can read anyone's.
pub async fn summary(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<MemberSummary>> {
    if !user.can_access_member(id) {
        return Err(AppError::Forbidden(
            "Cannot access another member's data".to_string(),
        ));
    }

    let member = member::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;

    let points = ledger::summary(&state.pool, id).await?;
    let transactions = ledger::history(&state.pool, id).await?;

    Ok(Json(MemberSummary {
        member,
        earned_total: points.earned_total,
        spendable: points.spendable,
        rank: rank::rank_for(points.earned_total),
        next_rank: rank::next_rank(points.earned_total),
        points_to_next: rank::points_to_next(points.earned_total),
        transactions,
    }))
}

#[derive(Debug, Serialize)]
pub struct MemberTokenResponse {
    pub token: String,
    pub member: Member,
}

/// POST /api/members/{id}/token - issue the member app's token (staff)
///
/// Called at sign-up; the long-lived token is handed to the member's
/// device and is their only credential.
pub async fn issue_token(
    State(state): State<ServerState>,
    Extension(staff): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<MemberTokenResponse>> {
    let member = member::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;
    if !member.is_active {
        return Err(AppError::Forbidden("Member is deactivated".to_string()));
    }

    let token = state
        .get_jwt_service()
        .generate_member_token(member.id, &member.name)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    crate::security_log!(
        "INFO",
        "member_token_issued",
        staff_id = staff.id.clone(),
        member_id = member.id
    );

    Ok(Json(MemberTokenResponse { token, member }))
}
