//! Repository Module
//!
//! Free functions over `&SqlitePool`, one module per table. Timestamps are
//! `i64` Unix millis supplied by the caller; repositories never read the
//! clock themselves, which keeps time-window queries testable.

pub mod activity;
pub mod member;
pub mod redemption;
pub mod review;
pub mod reward;
pub mod staff;
pub mod transaction;
pub mod visit_code;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
