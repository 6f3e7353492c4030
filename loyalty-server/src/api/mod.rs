//! API Route Modules
//!
//! One module per resource, each exposing a `router()`:
//!
//! - [`health`] - liveness probe
//! - [`auth`] - staff login and session info
//! - [`members`] - member administration, summaries, token issuance
//! - [`rewards`] - reward catalog and redemption
//! - [`redemptions`] - redemption history and staff code acceptance
//! - [`visits`] - visit QR codes, activities and staff check-in
//! - [`reviews`] - review eligibility and submission

pub mod auth;
pub mod health;
pub mod members;
pub mod redemptions;
pub mod reviews;
pub mod rewards;
pub mod visits;

use axum::Router;

use crate::core::ServerState;

// Re-export the handler result type
pub use crate::utils::AppResult;

/// Assemble all resource routers (state not yet applied).
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(members::router())
        .merge(rewards::router())
        .merge(redemptions::router())
        .merge(visits::router())
        .merge(reviews::router())
}
