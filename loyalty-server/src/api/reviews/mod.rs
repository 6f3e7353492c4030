//! Review Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// All member-only; handlers reject staff sessions.
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit))
        .route("/mine", get(handler::mine))
        .route("/eligibility", get(handler::eligibility))
}
