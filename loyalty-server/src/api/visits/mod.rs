//! Visit Check-in Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/visits", routes())
}

fn routes() -> Router<ServerState> {
    let member_routes = Router::new()
        .route("/code", get(handler::code))
        .route("/activities", get(handler::activities));

    let staff_routes = Router::new()
        .route("/accept", post(handler::accept))
        .layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/activities", post(handler::create_activity))
        .layer(middleware::from_fn(require_admin));

    member_routes.merge(staff_routes).merge(admin_routes)
}
