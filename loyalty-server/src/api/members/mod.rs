//! Member API Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/members", routes())
}

fn routes() -> Router<ServerState> {
    // Summary is self-or-staff; the handler does the ownership check.
    let member_routes = Router::new().route("/{id}/summary", get(handler::summary));

    let staff_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}/token", post(handler::issue_token))
        .layer(middleware::from_fn(require_staff));

    member_routes.merge(staff_routes)
}
