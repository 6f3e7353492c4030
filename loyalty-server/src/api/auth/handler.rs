//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::staff;
use crate::security_log;
use crate::utils::{AppError, AppResult};

use shared::models::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - staff login
///
/// Verifies credentials and returns a staff session token. Rejections use
/// one unified message to prevent username enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = staff::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(a) => {
            if !a.is_active {
                return Err(AppError::Forbidden("Account has been disabled".to_string()));
            }
            if !verify_password(&req.password, &a.password_hash) {
                security_log!("WARN", "login_failed", username = req.username.clone());
                return Err(AppError::invalid_credentials());
            }
            a
        }
        None => {
            security_log!("WARN", "login_failed", username = req.username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    let role = match account.role {
        shared::models::StaffRole::Admin => "admin",
        shared::models::StaffRole::Staff => "staff",
    };
    let token = state
        .get_jwt_service()
        .generate_staff_token(account.id, &account.display_name, role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

    security_log!(
        "INFO",
        "login_success",
        user_id = account.id,
        username = account.username.clone(),
        role = role
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: account.id.to_string(),
            username: account.username,
            display_name: account.display_name,
            role: role.to_string(),
        },
    }))
}

/// GET /api/auth/me - current session info
pub async fn me(Extension(user): Extension<CurrentUser>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: user.id.clone(),
        username: user.name.clone(),
        display_name: user.name,
        role: user.role,
    }))
}
