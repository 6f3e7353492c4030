//! Visit Check-in Handlers

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::activity;
use crate::loyalty::visits::{self, VisitAccepted};
use crate::utils::{AppError, AppResult};

use shared::models::{VisitActivity, VisitActivityCreate, VisitQrCode};

/// GET /api/visits/code - the member's current QR payload
///
/// Rotates transparently once the stored code ages out; the app just
/// renders whatever comes back.
pub async fn code(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<VisitQrCode>> {
    let member_id = user
        .member_id()
        .ok_or_else(|| AppError::Forbidden("Only members have visit codes".to_string()))?;

    let code = visits::current_code(
        &state.pool,
        state.policy(),
        member_id,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(code))
}

/// GET /api/visits/activities - active check-in activities
pub async fn activities(State(state): State<ServerState>) -> AppResult<Json<Vec<VisitActivity>>> {
    Ok(Json(activity::find_active(&state.pool).await?))
}

/// POST /api/visits/activities - define an activity (admin)
pub async fn create_activity(
    State(state): State<ServerState>,
    Json(payload): Json<VisitActivityCreate>,
) -> AppResult<Json<VisitActivity>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Activity name is required".to_string()));
    }
    let created = activity::create(&state.pool, payload).await?;
    tracing::info!(activity_id = created.id, name = %created.name, "Activity created");
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct AcceptVisitRequest {
    /// Scanned QR payload
    pub code: String,
    /// Activity name picked on the staff terminal
    pub activity: String,
}

/// POST /api/visits/accept - scan a member in (staff)
pub async fn accept(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AcceptVisitRequest>,
) -> AppResult<Json<VisitAccepted>> {
    let accepted = visits::accept_visit(
        &state.pool,
        state.policy(),
        &user,
        &req.code,
        &req.activity,
        shared::util::now_millis(),
    )
    .await?;
    Ok(Json(accepted))
}
