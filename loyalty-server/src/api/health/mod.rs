//! Health Check Routes

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Public, no auth required.
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(handler::health))
}
