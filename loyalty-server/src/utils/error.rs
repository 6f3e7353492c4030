//! Unified Error Handling
//!
//! Application-level error enum plus the response envelope every error is
//! returned in. Success payloads are plain `Json<T>` bodies.
//!
//! # Error code prefixes
//!
//! | Prefix | Category |
//! |--------|----------|
//! | E2xxx  | Authorization |
//! | E3xxx  | Authentication / tokens |
//! | E4xxx  | Loyalty business rules |
//! | E9xxx  | System |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::loyalty::LoyaltyError;

/// Error response structure
///
/// ```json
/// {
///   "code": "E4004",
///   "message": "Insufficient points: need 100, have 50"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Loyalty engine rejection, carried whole so the HTTP layer can map
    /// each taxonomy entry to its own code.
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl AppError {
    /// Unified message to prevent username enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid username or password".to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Map a loyalty-engine rejection to HTTP status + stable code.
///
/// Every business rejection carries its human-readable reason through to
/// the response body; nothing is collapsed into a generic failure.
fn loyalty_response(err: &LoyaltyError) -> (StatusCode, &'static str, String) {
    let msg = err.to_string();
    match err {
        LoyaltyError::Unauthorized => (StatusCode::FORBIDDEN, "E2002", msg),
        LoyaltyError::NotFound(_) => (StatusCode::NOT_FOUND, "E4001", msg),
        LoyaltyError::AmbiguousFragment { .. } => (StatusCode::CONFLICT, "E4002", msg),
        LoyaltyError::AlreadyRedeemed => (StatusCode::CONFLICT, "E4003", msg),
        LoyaltyError::InsufficientPoints { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E4004", msg),
        LoyaltyError::DuplicateActiveRedemption => (StatusCode::CONFLICT, "E4005", msg),
        LoyaltyError::RewardUnavailable => (StatusCode::UNPROCESSABLE_ENTITY, "E4006", msg),
        LoyaltyError::InvalidOrExpiredCode => (StatusCode::UNPROCESSABLE_ENTITY, "E4007", msg),
        LoyaltyError::UnknownActivity(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E4008", msg),
        LoyaltyError::NoRecentVisit => (StatusCode::UNPROCESSABLE_ENTITY, "E4009", msg),
        LoyaltyError::AlreadyReviewed => (StatusCode::UNPROCESSABLE_ENTITY, "E4010", msg),
        LoyaltyError::VisitLimitReached => (StatusCode::UNPROCESSABLE_ENTITY, "E4011", msg),
        LoyaltyError::InvalidMood(_) => (StatusCode::BAD_REQUEST, "E4012", msg),
        LoyaltyError::RedemptionUpdateFailed => {
            error!(target: "loyalty", "Redemption post-write verification failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "E4013", msg)
        }
        LoyaltyError::Database(inner) => {
            error!(target: "database", error = %inner, "Loyalty operation hit database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9002",
                "Database error".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".to_string(),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "E3003",
                "Token expired".to_string(),
            ),
            AppError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "E3002",
                "Invalid token".to_string(),
            ),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            // Loyalty business rules
            AppError::Loyalty(err) => loyalty_response(err),

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.clone()),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}
