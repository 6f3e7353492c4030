//! Loyalty Error Taxonomy
//!
//! Every business rejection the engine can produce, each with a
//! human-readable reason. Mutating operations surface these to the caller
//! and are never auto-retried; `Database` is the transient category and
//! safe to retry for reads only.

use crate::db::repository::RepoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoyaltyError {
    #[error("Not authorized to perform this operation")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fragment '{fragment}' matches {matches} active codes, more characters needed")]
    AmbiguousFragment { fragment: String, matches: usize },

    #[error("Code has already been redeemed")]
    AlreadyRedeemed,

    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("An active redemption for this reward already exists")]
    DuplicateActiveRedemption,

    #[error("Reward is not available")]
    RewardUnavailable,

    #[error("Invalid or expired visit code")]
    InvalidOrExpiredCode,

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("No qualifying visit within the review window")]
    NoRecentVisit,

    #[error("A review was already submitted within the review window")]
    AlreadyReviewed,

    #[error("Visit credit limit reached for the current code window")]
    VisitLimitReached,

    #[error("Invalid mood value: {0} (expected 1-5)")]
    InvalidMood(i64),

    #[error("Redemption status update could not be verified")]
    RedemptionUpdateFailed,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for LoyaltyError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => LoyaltyError::NotFound(msg),
            RepoError::Validation(msg) => LoyaltyError::Database(msg),
            RepoError::Duplicate(msg) | RepoError::Database(msg) => LoyaltyError::Database(msg),
        }
    }
}

pub type LoyaltyResult<T> = Result<T, LoyaltyError>;
