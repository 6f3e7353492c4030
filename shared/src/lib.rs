//! Shared models and utilities for the loyalty platform.
//!
//! Kept free of web-framework and database-engine code so both the server
//! and any future terminal client can depend on it. The optional `db`
//! feature adds `sqlx::FromRow` derives for server-side row mapping.

pub mod models;
pub mod util;

pub use models::*;
