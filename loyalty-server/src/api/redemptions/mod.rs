//! Redemption Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/redemptions", routes())
}

fn routes() -> Router<ServerState> {
    let member_routes = Router::new().route("/mine", get(handler::mine));

    let staff_routes = Router::new()
        .route("/accept", post(handler::accept))
        .layer(middleware::from_fn(require_staff));

    member_routes.merge(staff_routes)
}
