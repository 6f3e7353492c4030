//! Loyalty Edge Server - single-venue loyalty program backend
//!
//! # Architecture
//!
//! - **Auth** (`auth`): JWT sessions + argon2 staff credentials, role-based
//!   access (member / staff / admin)
//! - **Database** (`db`): embedded SQLite via sqlx, repository functions
//! - **Loyalty engine** (`loyalty`): points ledger, rank tiers, reward
//!   redemption lifecycle, visit crediting, review eligibility
//! - **HTTP API** (`api`): RESTful axum handlers, one module per resource
//!
//! # Module structure
//!
//! ```text
//! loyalty-server/src/
//! ├── core/          # Config, state, server bootstrap
//! ├── auth/          # JWT sessions, middleware, passwords
//! ├── db/            # Pool, schema, repositories
//! ├── loyalty/       # The engine: ledger, rank, redemption, visits, reviews
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, responses, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod loyalty;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use loyalty::LoyaltyError;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events for auth decisions
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __                      __ __
   / /   ____  __  ______ _/ // /___  __
  / /   / __ \/ / / / __ `/ // __/ / / /
 / /___/ /_/ / /_/ / /_/ / // /_/ /_/ /
/_____/\____/\__, /\__,_/_/ \__/\__, /
            /____/             /____/
    "#
    );
}
